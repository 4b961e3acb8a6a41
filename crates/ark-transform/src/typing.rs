//! Column typing and display-format selection.
//!
//! Every declared column gets a role. Text-like roles pass values through;
//! numeric roles go through [`resolve`] and feed the column's
//! [`ColumnStats`]. Formats are picked only after the last row so a late
//! row with more decimals widens the whole column instead of being
//! truncated to an earlier row's precision.

use ark_model::{ColumnRole, ColumnSpec, Record, SheetSchema, day_number};
use tracing::{debug, warn};

use crate::normalization::numeric::resolve;
use crate::stats::{ColumnStats, ColumnStatsSet, PARSE_FAILURE_WARN_RATIO};
use crate::types::{TypedCell, TypedColumn, TypedRow, TypedTable};

/// Type all records against a declared schema.
///
/// Row order is preserved. Totals are only produced for summed columns and
/// only when at least one record exists.
pub fn type_records(records: &[Record], schema: &SheetSchema) -> TypedTable {
    let _span = tracing::debug_span!("type_records", sheet = %schema.kind).entered();
    let roles: Vec<ColumnRole> = schema.columns.iter().map(effective_role).collect();

    let mut stats = ColumnStatsSet::new();
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let cells = schema
            .columns
            .iter()
            .zip(&roles)
            .map(|(spec, role)| type_cell(record.get(&spec.label), *role, stats.entry(&spec.label)))
            .collect();
        rows.push(TypedRow {
            source_row: record.source_row,
            cells,
        });
    }

    let has_rows = !rows.is_empty();
    let columns: Vec<TypedColumn> = schema
        .columns
        .iter()
        .map(|spec| {
            let column_stats = stats.finish(&spec.label);
            report_parse_failures(spec, &column_stats);
            TypedColumn {
                spec: spec.clone(),
                format: column_stats.format(),
                total: if has_rows {
                    column_stats.total(spec)
                } else {
                    None
                },
                stats: column_stats,
            }
        })
        .collect();

    debug!(
        rows = rows.len(),
        columns = columns.len(),
        "typed records"
    );
    TypedTable {
        kind: schema.kind,
        columns,
        rows,
    }
}

/// Day-labelled columns are status codes whatever the declaration says.
fn effective_role(spec: &ColumnSpec) -> ColumnRole {
    if day_number(spec.label.as_str()).is_some() {
        ColumnRole::DayMarker
    } else {
        spec.role
    }
}

fn type_cell(raw: Option<&str>, role: ColumnRole, stats: &mut ColumnStats) -> TypedCell {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        stats.observe_empty();
        return TypedCell::Empty;
    }
    if !role.is_numeric() {
        return TypedCell::Text(text.to_string());
    }
    match resolve(text) {
        Some(number) => {
            stats.observe(&number);
            TypedCell::Number(number.value)
        }
        None => {
            stats.observe_failure();
            TypedCell::Text(text.to_string())
        }
    }
}

fn report_parse_failures(spec: &ColumnSpec, stats: &ColumnStats) {
    if spec.role.is_numeric() && stats.failure_ratio() > PARSE_FAILURE_WARN_RATIO {
        warn!(
            column = %spec.label,
            failed = stats.failed,
            parsed = stats.parsed,
            "numeric column has unparsable values, kept as text and left out of totals"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_model::ColumnLabel;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn record(row: usize, pairs: &[(&str, &str)]) -> Record {
        Record::new(
            row,
            pairs
                .iter()
                .map(|(label, value)| (ColumnLabel::new(*label), (*value).to_string()))
                .collect(),
        )
    }

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_text_roles_are_never_parsed() {
        let schema = SheetSchema::summary();
        let records = vec![record(1, &[("Kontonr.", "1.234"), ("Tekst", "12,5")])];
        let table = type_records(&records, &schema);
        let konto = table.column_index("Kontonr.").unwrap();
        let tekst = table.column_index("Tekst").unwrap();
        assert_eq!(table.rows[0].cells[konto], TypedCell::Text("1.234".into()));
        assert_eq!(table.rows[0].cells[tekst], TypedCell::Text("12,5".into()));
    }

    #[test]
    fn test_day_columns_stay_text() {
        let schema = SheetSchema::detail().with_day_columns(&[1, 2]);
        let records = vec![record(1, &[("1", "8"), ("2", "1,5")])];
        let table = type_records(&records, &schema);
        let day_one = table.column_index("1").unwrap();
        let day_two = table.column_index("2").unwrap();
        assert_eq!(table.rows[0].cells[day_one], TypedCell::Text("8".into()));
        assert_eq!(table.rows[0].cells[day_two], TypedCell::Text("1,5".into()));
        assert_eq!(table.columns[day_one].total, None);
    }

    #[test]
    fn test_declared_numeric_day_label_is_still_text() {
        let schema = SheetSchema {
            kind: ark_model::SheetKind::Detail,
            columns: vec![ColumnSpec::summed("7", ColumnRole::Money)],
        };
        let table = type_records(&[record(1, &[("7", "100")])], &schema);
        assert_eq!(table.rows[0].cells[0], TypedCell::Text("100".into()));
    }

    #[test]
    fn test_unparsable_money_is_kept_as_text_and_skipped_in_total() {
        let schema = SheetSchema::summary();
        let records = vec![
            record(1, &[("Beløb, kr", "1.000,00")]),
            record(2, &[("Beløb, kr", "n/a")]),
            record(3, &[("Beløb, kr", "250,5")]),
        ];
        let table = type_records(&records, &schema);
        let belob = table.column_index("Beløb, kr").unwrap();
        assert_eq!(table.rows[1].cells[belob], TypedCell::Text("n/a".into()));
        assert_eq!(table.columns[belob].total, Some(dec("1250.50")));
        assert_eq!(table.columns[belob].stats.failed, 1);
        assert_eq!(table.parse_failures(), 1);
    }

    #[test]
    fn test_format_is_widest_precision_and_any_grouping() {
        let schema = SheetSchema::summary();
        let records = vec![
            record(1, &[("Gns. pris, kr", "12,5")]),
            record(2, &[("Gns. pris, kr", "1.234,567")]),
            record(3, &[("Gns. pris, kr", "3")]),
        ];
        let table = type_records(&records, &schema);
        let price = table.column_index("Gns. pris, kr").unwrap();
        assert_eq!(table.columns[price].format.decimals, 3);
        assert!(table.columns[price].format.grouping);
        assert_eq!(table.columns[price].total, None);
    }

    #[test]
    fn test_count_defaults_to_integer_format() {
        let schema = SheetSchema::summary();
        let records = vec![record(1, &[("Antal", "4")]), record(2, &[("Antal", "6")])];
        let table = type_records(&records, &schema);
        let antal = table.column_index("Antal").unwrap();
        assert_eq!(table.columns[antal].format.decimals, 0);
        assert!(!table.columns[antal].format.grouping);
        assert_eq!(table.columns[antal].total, Some(dec("10")));
    }

    #[test]
    fn test_empty_document_has_no_totals() {
        let table = type_records(&[], &SheetSchema::summary());
        assert!(table.rows.is_empty());
        assert!(!table.has_totals());
    }

    #[test]
    fn test_missing_cells_are_empty() {
        let table = type_records(&[record(1, &[("Tekst", "  ")])], &SheetSchema::summary());
        assert!(table.rows[0].cells.iter().all(TypedCell::is_empty));
        let antal = table.column_index("Antal").unwrap();
        assert_eq!(table.columns[antal].total, Some(Decimal::ZERO));
    }

    #[test]
    fn test_row_order_is_preserved() {
        let records = vec![
            record(9, &[("Tekst", "c")]),
            record(4, &[("Tekst", "a")]),
            record(6, &[("Tekst", "b")]),
        ];
        let table = type_records(&records, &SheetSchema::summary());
        let order: Vec<usize> = table.rows.iter().map(|row| row.source_row).collect();
        assert_eq!(order, vec![9, 4, 6]);
    }
}
