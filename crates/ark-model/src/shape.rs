//! Inferred structure of one delimited document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Candidate field delimiters, in detection preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Semicolon,
    Comma,
    Tab,
}

impl Delimiter {
    /// All candidates; ties during detection keep the earliest entry.
    pub const CANDIDATES: [Delimiter; 3] = [Delimiter::Semicolon, Delimiter::Comma, Delimiter::Tab];

    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Semicolon => b';',
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Delimiter::Semicolon => "semicolon",
            Delimiter::Comma => "comma",
            Delimiter::Tab => "tab",
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How sure the detector is about the header row it picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionConfidence {
    /// Expected labels found in the chosen header row.
    pub matched: usize,
    /// Number of expected labels the detector scored against.
    pub expected: usize,
}

impl DetectionConfidence {
    /// True when no candidate row matched any label and row 0 was assumed.
    pub fn is_fallback(&self) -> bool {
        self.matched == 0
    }

    /// Share of expected labels present in the header row (0.0 ..= 1.0).
    pub fn ratio(&self) -> f64 {
        if self.expected == 0 {
            0.0
        } else {
            self.matched as f64 / self.expected as f64
        }
    }
}

/// Delimiter, header position and decorative lines of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    pub delimiter: Delimiter,
    /// Zero-based index of the header row within the split rows.
    pub header_row_index: usize,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub confidence: DetectionConfidence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_follow_preference_order() {
        let bytes: Vec<u8> = Delimiter::CANDIDATES
            .iter()
            .map(|delimiter| delimiter.as_byte())
            .collect();
        assert_eq!(bytes, vec![b';', b',', b'\t']);
    }

    #[test]
    fn zero_matches_is_a_fallback() {
        let confidence = DetectionConfidence {
            matched: 0,
            expected: 10,
        };
        assert!(confidence.is_fallback());
        assert_eq!(confidence.ratio(), 0.0);

        let confident = DetectionConfidence {
            matched: 5,
            expected: 10,
        };
        assert!(!confident.is_fallback());
        assert!((confident.ratio() - 0.5).abs() < 1e-9);
    }
}
