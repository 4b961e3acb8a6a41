//! Thin wrapper over the quick-xml writer used for every package part.

use std::borrow::Cow;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{OutputError, Result};

pub(crate) const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub(crate) const RELATIONSHIP_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const PACKAGE_RELATIONSHIP_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

/// Writes one XML part into memory, tagging errors with the part name.
pub(crate) struct XmlWriter {
    part: &'static str,
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub(crate) fn new(part: &'static str) -> Self {
        Self {
            part,
            writer: Writer::new(Vec::new()),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        let part = self.part;
        self.writer
            .write_event(event)
            .map_err(|err| OutputError::Xml {
                part: part.to_string(),
                message: err.to_string(),
            })
    }

    pub(crate) fn decl(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.write(Event::Start(element(name, attrs)))
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.write(Event::Empty(element(name, attrs)))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Escaped text content. Characters XML 1.0 cannot carry are dropped.
    pub(crate) fn text(&mut self, text: &str) -> Result<()> {
        let text: Cow<'_, str> = if text.chars().any(is_xml_forbidden) {
            Cow::Owned(text.chars().filter(|ch| !is_xml_forbidden(*ch)).collect())
        } else {
            Cow::Borrowed(text)
        };
        self.write(Event::Text(BytesText::new(&text)))
    }

    /// `<name attrs>text</name>`
    pub(crate) fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Control characters and non-characters outside the XML 1.0 `Char` range.
pub(crate) fn is_xml_forbidden(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

/// Cell text in the OOXML string form: forbidden characters become
/// `_xHHHH_`, and text that already looks like such an escape gets its
/// underscore escaped as `_x005F_` so it reads back unchanged.
pub(crate) fn escape_cell_text(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_xml_forbidden) && !text.contains("_x") {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for (idx, ch) in text.char_indices() {
        if is_xml_forbidden(ch) {
            out.push_str(&format!("_x{:04X}_", u32::from(ch)));
        } else if ch == '_' && looks_like_escape(&text[idx..]) {
            out.push_str("_x005F_");
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

fn looks_like_escape(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    bytes.len() >= 7
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for attr in attrs {
        start.push_attribute(*attr);
    }
    start
}
