//! Numeric resolution for locale-ambiguous tokens.
//!
//! Danish/European (`1.234,56`) and US (`1,234.56`) conventions coexist in
//! the same input, so the separators in a token have to be classified before
//! it can be converted. The rules run in a fixed order and the first match
//! wins:
//!
//! 1. Empty or whitespace-only tokens are not numbers (absence, not zero).
//! 2. A text-prefix apostrophe, a sign and grouping glyphs (spaces,
//!    apostrophes) are stripped; stripping a glyph counts as grouping.
//! 3. When both `.` and `,` appear, the one occurring last is the decimal
//!    separator and the other is grouping.
//! 4. A single `,` is a decimal comma. Repeated commas are grouping.
//! 5. Dots that form a thousands pattern (`1.234`, `12.345.678`) are
//!    grouping. Otherwise a single dot followed by 1-3 digits is a decimal
//!    point, and anything else is grouping (`1.23456` is 123456).
//! 6. No separators: integer.
//! 7. The result must convert to a finite decimal.
//!
//! The order matters: rule 3 encodes the last-separator-wins tie-break,
//! which general purpose number parsers do not implement.

use std::str::FromStr;

use ark_model::ParsedNumber;
use rust_decimal::Decimal;

/// Glyphs used for digit grouping besides `.` and `,`.
const GROUPING_GLYPHS: [char; 6] = [' ', '\u{a0}', '\u{202f}', '\u{2009}', '\'', '\u{2019}'];

/// Resolve a raw cell token to a canonical number.
///
/// Returns `None` when the token is not a number; callers keep the original
/// text in that case instead of treating it as zero.
pub fn resolve(token: &str) -> Option<ParsedNumber> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return None;
    }
    let trimmed = trimmed.strip_prefix('\'').unwrap_or(trimmed).trim();
    let (negative, unsigned) = split_sign(trimmed);

    let mut grouping_observed = false;
    let mut body = String::with_capacity(unsigned.len());
    for ch in unsigned.chars() {
        if GROUPING_GLYPHS.contains(&ch) {
            grouping_observed = true;
        } else {
            body.push(ch);
        }
    }
    if !body.bytes().any(|b| b.is_ascii_digit())
        || !body
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b'.' || b == b',')
    {
        return None;
    }

    let split = split_separators(&body)?;
    grouping_observed |= split.grouping;

    let integer = if split.integer.is_empty() {
        "0"
    } else {
        split.integer.as_str()
    };
    let canonical = if split.fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{}", split.fraction)
    };
    let mut value = Decimal::from_str(&canonical).ok()?;
    // More digits than a Decimal holds are rounded by the parser; keep such tokens as text.
    if value.scale() as usize != split.fraction.len() {
        return None;
    }
    if negative && !value.is_zero() {
        value = -value;
    }

    Some(ParsedNumber::new(
        value,
        split.fraction.len() as u32,
        grouping_observed,
    ))
}

/// Check if a token resolves to a number.
pub fn is_numeric(token: &str) -> bool {
    resolve(token).is_some()
}

/// Digits before and after the decimal separator, separators removed.
#[derive(Debug, PartialEq, Eq)]
struct Split {
    integer: String,
    fraction: String,
    grouping: bool,
}

impl Split {
    fn integer(digits: &str) -> Self {
        Self {
            integer: digits.to_string(),
            fraction: String::new(),
            grouping: false,
        }
    }

    fn grouped(body: &str, separator: char) -> Self {
        Self {
            integer: body.replace(separator, ""),
            fraction: String::new(),
            grouping: true,
        }
    }

    fn decimal(integer: &str, fraction: &str) -> Self {
        Self {
            integer: integer.to_string(),
            fraction: fraction.to_string(),
            grouping: false,
        }
    }
}

/// Leading `-`, `+`, `−` or a trailing `-` (SAP style).
fn split_sign(token: &str) -> (bool, &str) {
    if let Some(rest) = token
        .strip_prefix('-')
        .or_else(|| token.strip_prefix('\u{2212}'))
    {
        return (true, rest.trim_start());
    }
    if let Some(rest) = token.strip_prefix('+') {
        return (false, rest.trim_start());
    }
    if let Some(rest) = token.strip_suffix('-') {
        return (true, rest.trim_end());
    }
    (false, token)
}

/// Classify separators. `body` holds only ASCII digits, `.` and `,`.
fn split_separators(body: &str) -> Option<Split> {
    match (body.rfind('.'), body.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal_at, decimal, grouping) = if dot > comma {
                (dot, '.', ',')
            } else {
                (comma, ',', '.')
            };
            let head = &body[..decimal_at];
            if head.contains(decimal) {
                return None;
            }
            Some(Split {
                integer: head.replace(grouping, ""),
                fraction: body[decimal_at + 1..].to_string(),
                grouping: true,
            })
        }
        (None, Some(comma)) => Some(split_commas(body, comma)),
        (Some(dot), None) => Some(split_dots(body, dot)),
        (None, None) => Some(Split::integer(body)),
    }
}

fn split_commas(body: &str, comma: usize) -> Split {
    let tail = &body[comma + 1..];
    if body.matches(',').count() == 1 && !tail.is_empty() {
        return Split::decimal(&body[..comma], tail);
    }
    Split::grouped(body, ',')
}

fn split_dots(body: &str, dot: usize) -> Split {
    if is_thousands_pattern(body, '.') {
        return Split::grouped(body, '.');
    }
    let tail = &body[dot + 1..];
    if body.matches('.').count() == 1 && (1..=3).contains(&tail.len()) {
        return Split::decimal(&body[..dot], tail);
    }
    Split::grouped(body, '.')
}

/// `^\d{1,3}(S\d{3})+$` for separator `S`.
fn is_thousands_pattern(body: &str, separator: char) -> bool {
    let mut groups = body.split(separator);
    let Some(lead) = groups.next() else {
        return false;
    };
    if lead.is_empty() || lead.len() > 3 {
        return false;
    }
    let mut count = 0usize;
    for group in groups {
        if group.len() != 3 {
            return false;
        }
        count += 1;
    }
    count > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn resolved(token: &str) -> ParsedNumber {
        resolve(token).unwrap_or_else(|| panic!("expected {token:?} to resolve"))
    }

    #[test]
    fn test_empty_is_not_a_number() {
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("   "), None);
        assert_eq!(resolve("\t"), None);
    }

    #[test]
    fn test_danish_grouping_and_decimal() {
        let number = resolved("1.234,56");
        assert_eq!(number.value, dec("1234.56"));
        assert_eq!(number.decimal_digits, 2);
        assert!(number.grouping_observed);
    }

    #[test]
    fn test_us_grouping_and_decimal() {
        let number = resolved("1,234,567.89");
        assert_eq!(number.value, dec("1234567.89"));
        assert_eq!(number.decimal_digits, 2);
        assert!(number.grouping_observed);
    }

    #[test]
    fn test_last_separator_is_decimal() {
        assert_eq!(resolved("1,234.5").value, dec("1234.5"));
        assert_eq!(resolved("1.234,5").value, dec("1234.5"));
        assert_eq!(resolved("12.345.678,9").value, dec("12345678.9"));
    }

    #[test]
    fn test_mixed_with_repeated_decimal_separator_is_rejected() {
        assert_eq!(resolve("1.2.3,4.5"), None);
        assert_eq!(resolve("1,2.3,4"), None);
    }

    #[test]
    fn test_single_comma_is_decimal() {
        let number = resolved("1,5");
        assert_eq!(number.value, dec("1.5"));
        assert_eq!(number.decimal_digits, 1);
        assert!(!number.grouping_observed);

        assert_eq!(resolved("1,234").value, dec("1.234"));
        assert_eq!(resolved("0,2345").decimal_digits, 4);
    }

    #[test]
    fn test_repeated_commas_are_grouping() {
        let number = resolved("1,234,567");
        assert_eq!(number.value, dec("1234567"));
        assert_eq!(number.decimal_digits, 0);
        assert!(number.grouping_observed);
    }

    #[test]
    fn test_thousand_dot_is_grouping() {
        let number = resolved("1.234");
        assert_eq!(number.value, dec("1234"));
        assert_eq!(number.decimal_digits, 0);
        assert!(number.grouping_observed);
        assert_eq!(resolved("12.345.678").value, dec("12345678"));
    }

    #[test]
    fn test_short_dot_tail_is_decimal() {
        let number = resolved("12.50");
        assert_eq!(number.value, dec("12.50"));
        assert_eq!(number.decimal_digits, 2);
        assert!(!number.grouping_observed);
        assert_eq!(resolved("1.2").value, dec("1.2"));
        assert_eq!(resolved("1234.567").value, dec("1234.567"));
    }

    #[test]
    fn test_long_dot_tail_is_grouping() {
        let number = resolved("1.23456");
        assert_eq!(number.value, dec("123456"));
        assert_eq!(number.decimal_digits, 0);
        assert!(number.grouping_observed);
    }

    #[test]
    fn test_space_grouping() {
        let number = resolved("1 234 567,50");
        assert_eq!(number.value, dec("1234567.50"));
        assert_eq!(number.decimal_digits, 2);
        assert!(number.grouping_observed);
        assert!(resolved("1\u{a0}234").grouping_observed);
        assert_eq!(resolved("1'234.5").value, dec("1234.5"));
    }

    #[test]
    fn test_integer() {
        let number = resolved("  42 ");
        assert_eq!(number.value, dec("42"));
        assert_eq!(number.decimal_digits, 0);
        assert!(!number.grouping_observed);
    }

    #[test]
    fn test_signs() {
        assert_eq!(resolved("-1.234,50").value, dec("-1234.50"));
        assert_eq!(resolved("1.234,50-").value, dec("-1234.50"));
        assert_eq!(resolved("\u{2212}12").value, dec("-12"));
        assert_eq!(resolved("+7").value, dec("7"));
        assert_eq!(resolved("- 5").value, dec("-5"));
        assert!(!resolved("- 5").grouping_observed);
        assert!(!resolved("-0").value.is_sign_negative());
        assert_eq!(resolve("-"), None);
        assert_eq!(resolve("--5"), None);
    }

    #[test]
    fn test_text_prefix_apostrophe() {
        let number = resolved("'00123");
        assert_eq!(number.value, dec("123"));
        assert!(!number.grouping_observed);
    }

    #[test]
    fn test_leading_separator() {
        assert_eq!(resolved(",5").value, dec("0.5"));
        assert_eq!(resolved(".25").value, dec("0.25"));
    }

    #[test]
    fn test_invalid() {
        assert_eq!(resolve("abc"), None);
        assert_eq!(resolve("12a"), None);
        assert_eq!(resolve("1e5"), None);
        assert_eq!(resolve("kr. 12"), None);
        assert_eq!(resolve(",."), None);
        assert_eq!(resolve("F"), None);
    }

    #[test]
    fn test_not_finite_is_rejected() {
        assert_eq!(resolve("99999999999999999999999999999999999"), None);
    }

    #[test]
    fn test_precision_beyond_decimal_stays_text() {
        assert_eq!(resolve("0,12345678901234567890123456789012"), None);
        assert_eq!(resolve("12345678901234567890123456.123"), None);
        let widest = resolve("0,1234567890123456789012345678").unwrap();
        assert_eq!(widest.decimal_digits, 28);
    }

    #[test]
    fn test_thousands_pattern() {
        assert!(is_thousands_pattern("1.234", '.'));
        assert!(is_thousands_pattern("123.456.789", '.'));
        assert!(!is_thousands_pattern("1234.567", '.'));
        assert!(!is_thousands_pattern("1.23", '.'));
        assert!(!is_thousands_pattern(".234", '.'));
        assert!(!is_thousands_pattern("123", '.'));
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("1.234,56"));
        assert!(!is_numeric("S"));
        assert!(!is_numeric(""));
    }
}
