//! Cell style registry and the `xl/styles.xml` part.

use std::collections::HashMap;

use crate::error::Result;
use crate::workbook::{CellStyle, FontStyle, Workbook};
use crate::xml::{SPREADSHEET_NS, XmlWriter};

/// First id available for custom number formats.
const FIRST_CUSTOM_NUM_FMT: u32 = 164;

const FONT_NAME: &str = "Calibri";

/// (bold, italic, size) in the order of [`font_id`].
const FONTS: [(bool, bool, &str); 4] = [
    (false, false, "11"),
    (true, false, "11"),
    (true, false, "14"),
    (false, true, "11"),
];

/// Built-in number format ids that need no `<numFmt>` declaration.
fn builtin_num_fmt(code: &str) -> Option<u32> {
    match code {
        "General" => Some(0),
        "0" => Some(1),
        "0.00" => Some(2),
        "#,##0" => Some(3),
        "#,##0.00" => Some(4),
        _ => None,
    }
}

fn font_id(font: FontStyle) -> u32 {
    match font {
        FontStyle::Regular => 0,
        FontStyle::Bold => 1,
        FontStyle::Heading => 2,
        FontStyle::Italic => 3,
    }
}

/// Assigns cell format (`xf`) indices to distinct styles.
///
/// Index 0 is always the default style, so unstyled cells need no `s`
/// attribute.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: Vec<CellStyle>,
    index: HashMap<CellStyle, u32>,
    custom_formats: Vec<String>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        let default_style = CellStyle::default();
        Self {
            index: HashMap::from([(default_style.clone(), 0)]),
            styles: vec![default_style],
            custom_formats: Vec::new(),
        }
    }
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every style used in the workbook.
    pub fn from_workbook(workbook: &Workbook) -> Self {
        let mut registry = Self::new();
        for sheet in workbook.sheets() {
            for (_, cells) in sheet.rows() {
                for cell in cells.values() {
                    registry.register(&cell.style);
                }
            }
        }
        registry
    }

    /// Index of the style, registering it on first use.
    pub fn register(&mut self, style: &CellStyle) -> u32 {
        if let Some(idx) = self.index.get(style) {
            return *idx;
        }
        if let Some(code) = &style.number_format
            && builtin_num_fmt(code).is_none()
            && !self.custom_formats.contains(code)
        {
            self.custom_formats.push(code.clone());
        }
        let idx = self.styles.len() as u32;
        self.styles.push(style.clone());
        self.index.insert(style.clone(), idx);
        idx
    }

    /// Index of an already registered style; 0 when unknown.
    pub fn index_of(&self, style: &CellStyle) -> u32 {
        self.index.get(style).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    fn num_fmt_id(&self, code: Option<&str>) -> u32 {
        let Some(code) = code else {
            return 0;
        };
        builtin_num_fmt(code).unwrap_or_else(|| {
            let position = self
                .custom_formats
                .iter()
                .position(|known| known == code)
                .unwrap_or(0);
            FIRST_CUSTOM_NUM_FMT + position as u32
        })
    }

    /// Serialize the registry as `xl/styles.xml`.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::new("xl/styles.xml");
        xml.decl()?;
        xml.start("styleSheet", &[("xmlns", SPREADSHEET_NS)])?;

        if !self.custom_formats.is_empty() {
            let count = self.custom_formats.len().to_string();
            xml.start("numFmts", &[("count", count.as_str())])?;
            for (offset, code) in self.custom_formats.iter().enumerate() {
                let id = (FIRST_CUSTOM_NUM_FMT + offset as u32).to_string();
                xml.empty(
                    "numFmt",
                    &[("numFmtId", id.as_str()), ("formatCode", code.as_str())],
                )?;
            }
            xml.end("numFmts")?;
        }

        let font_count = FONTS.len().to_string();
        xml.start("fonts", &[("count", font_count.as_str())])?;
        for (bold, italic, size) in FONTS {
            xml.start("font", &[])?;
            if bold {
                xml.empty("b", &[])?;
            }
            if italic {
                xml.empty("i", &[])?;
            }
            xml.empty("sz", &[("val", size)])?;
            xml.empty("name", &[("val", FONT_NAME)])?;
            xml.end("font")?;
        }
        xml.end("fonts")?;

        xml.start("fills", &[("count", "2")])?;
        for pattern in ["none", "gray125"] {
            xml.start("fill", &[])?;
            xml.empty("patternFill", &[("patternType", pattern)])?;
            xml.end("fill")?;
        }
        xml.end("fills")?;

        xml.start("borders", &[("count", "2")])?;
        xml.start("border", &[])?;
        for side in ["left", "right", "top", "bottom", "diagonal"] {
            xml.empty(side, &[])?;
        }
        xml.end("border")?;
        xml.start("border", &[])?;
        for side in ["left", "right", "top", "bottom"] {
            xml.start(side, &[("style", "thin")])?;
            xml.empty("color", &[("auto", "1")])?;
            xml.end(side)?;
        }
        xml.empty("diagonal", &[])?;
        xml.end("border")?;
        xml.end("borders")?;

        xml.start("cellStyleXfs", &[("count", "1")])?;
        xml.empty(
            "xf",
            &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")],
        )?;
        xml.end("cellStyleXfs")?;

        let count = self.styles.len().to_string();
        xml.start("cellXfs", &[("count", count.as_str())])?;
        for style in &self.styles {
            let num_fmt = self.num_fmt_id(style.number_format.as_deref()).to_string();
            let font = font_id(style.font).to_string();
            let border = if style.bordered { "1" } else { "0" };
            let mut attrs = vec![
                ("numFmtId", num_fmt.as_str()),
                ("fontId", font.as_str()),
                ("fillId", "0"),
                ("borderId", border),
                ("xfId", "0"),
            ];
            if style.number_format.is_some() {
                attrs.push(("applyNumberFormat", "1"));
            }
            if style.font != FontStyle::Regular {
                attrs.push(("applyFont", "1"));
            }
            if style.bordered {
                attrs.push(("applyBorder", "1"));
            }
            xml.empty("xf", &attrs)?;
        }
        xml.end("cellXfs")?;

        xml.start("cellStyles", &[("count", "1")])?;
        xml.empty(
            "cellStyle",
            &[("name", "Normal"), ("xfId", "0"), ("builtinId", "0")],
        )?;
        xml.end("cellStyles")?;

        xml.end("styleSheet")?;
        Ok(xml.into_inner())
    }
}
