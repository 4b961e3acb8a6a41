//! Per-column aggregation used to pick display formats and totals.

use std::collections::BTreeMap;

use ark_model::{ColumnFormat, ColumnLabel, ColumnSpec, ParsedNumber};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parse-failure share above which a numeric column is reported.
pub const PARSE_FAILURE_WARN_RATIO: f64 = 0.1;

/// Running aggregate for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub max_decimal_digits: u32,
    pub any_grouping_observed: bool,
    pub running_sum: Decimal,
    /// Cells that resolved to a number.
    pub parsed: usize,
    /// Non-empty cells in a numeric column that did not resolve.
    pub failed: usize,
    pub empty: usize,
}

impl ColumnStats {
    pub fn observe(&mut self, number: &ParsedNumber) {
        self.max_decimal_digits = self.max_decimal_digits.max(number.decimal_digits);
        self.any_grouping_observed |= number.grouping_observed;
        // Overflowing rows are left out of the total like unparsable ones.
        if let Some(sum) = self.running_sum.checked_add(number.value) {
            self.running_sum = sum;
        } else {
            tracing::warn!(value = %number.value, "total overflow, value skipped");
        }
        self.parsed += 1;
    }

    pub fn observe_failure(&mut self) {
        self.failed += 1;
    }

    pub fn observe_empty(&mut self) {
        self.empty += 1;
    }

    /// Share of non-empty cells that failed to parse.
    pub fn failure_ratio(&self) -> f64 {
        let attempted = self.parsed + self.failed;
        if attempted == 0 {
            0.0
        } else {
            self.failed as f64 / attempted as f64
        }
    }

    /// The single display format for every cell and the total of the column.
    pub fn format(&self) -> ColumnFormat {
        ColumnFormat::new(self.max_decimal_digits, self.any_grouping_observed)
    }

    /// Column total, only for summed columns.
    pub fn total(&self, spec: &ColumnSpec) -> Option<Decimal> {
        spec.summed.then_some(self.running_sum)
    }
}

/// Request-scoped statistics keyed by column label.
///
/// Threaded through the row pass and finalized once; nothing here outlives
/// the conversion of one document.
#[derive(Debug, Default)]
pub struct ColumnStatsSet {
    stats: BTreeMap<String, ColumnStats>,
}

impl ColumnStatsSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&mut self, label: &ColumnLabel) -> &mut ColumnStats {
        self.stats.entry(label.key().to_string()).or_default()
    }

    pub fn get(&self, label: &ColumnLabel) -> Option<&ColumnStats> {
        self.stats.get(label.key())
    }

    /// Removes and returns the final statistics of a column.
    pub fn finish(&mut self, label: &ColumnLabel) -> ColumnStats {
        self.stats.remove(label.key()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_model::ColumnRole;
    use std::str::FromStr;

    fn number(text: &str, decimals: u32, grouping: bool) -> ParsedNumber {
        ParsedNumber::new(Decimal::from_str(text).unwrap(), decimals, grouping)
    }

    #[test]
    fn format_uses_max_precision_and_any_grouping() {
        let mut stats = ColumnStats::default();
        stats.observe(&number("1.5", 1, false));
        stats.observe(&number("1234.567", 3, true));
        stats.observe(&number("2", 0, false));
        assert_eq!(stats.format(), ColumnFormat::new(3, true));
        assert_eq!(stats.running_sum, Decimal::from_str("1238.067").unwrap());
    }

    #[test]
    fn failures_do_not_touch_the_sum() {
        let mut stats = ColumnStats::default();
        stats.observe(&number("10", 0, false));
        stats.observe_failure();
        assert_eq!(stats.running_sum, Decimal::from(10));
        assert!((stats.failure_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn total_only_for_summed_columns() {
        let mut stats = ColumnStats::default();
        stats.observe(&number("3", 0, false));
        let summed = ColumnSpec::summed("Antal", ColumnRole::Count);
        let plain = ColumnSpec::new("Gns. pris, kr", ColumnRole::AveragePrice);
        assert_eq!(stats.total(&summed), Some(Decimal::from(3)));
        assert_eq!(stats.total(&plain), None);
    }

    #[test]
    fn set_is_keyed_leniently() {
        let mut set = ColumnStatsSet::new();
        set.entry(&ColumnLabel::new("I alt, kr")).observe_empty();
        set.entry(&ColumnLabel::new("i alt kr")).observe_empty();
        assert_eq!(set.get(&ColumnLabel::new("I ALT KR")).map(|s| s.empty), Some(2));
        assert_eq!(set.finish(&ColumnLabel::new("I alt, kr")).empty, 2);
        assert!(set.get(&ColumnLabel::new("I alt, kr")).is_none());
    }
}
