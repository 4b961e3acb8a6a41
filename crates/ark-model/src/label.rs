//! Column labels used to join declared schema names with observed headers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A header label as it appeared in the source, plus its lookup key.
///
/// Two labels are equal when their keys are equal: comparison ignores case,
/// punctuation and whitespace, so `"I alt, kr"`, `"i alt kr"` and
/// `" I ALT,kr "` all name the same column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnLabel {
    text: String,
    key: String,
}

impl ColumnLabel {
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let text = text.trim().trim_matches('\u{feff}').trim().to_string();
        let key = normalize_label(&text);
        Self { text, key }
    }

    /// Synthetic label for a cell without a header (1-based position).
    pub fn positional(position: usize) -> Self {
        Self::new(format!("Kolonne {position}"))
    }

    /// The label text as written in the source (trimmed).
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The case- and punctuation-insensitive lookup key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// True when `other` names this column under the lenient comparison.
    pub fn matches(&self, other: &str) -> bool {
        self.key == normalize_label(other)
    }
}

impl PartialEq for ColumnLabel {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ColumnLabel {}

impl std::hash::Hash for ColumnLabel {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl From<&str> for ColumnLabel {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for ColumnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Lowercases and keeps only letters and digits.
///
/// Letters from any script are kept, so `Øko-ID` becomes `økoid`.
pub fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
