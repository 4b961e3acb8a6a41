//! Whole-document ingestion: detect, normalize, resolve the schema.

use ark_model::{Record, SheetKind, SheetSchema, ShapeDescriptor, day_number};

use crate::error::Result;
use crate::normalize::normalize;
use crate::shape::detect_shape;

/// One input document reduced to ordered records and its final schema.
#[derive(Debug, Clone)]
pub struct IngestedDocument {
    pub kind: SheetKind,
    pub shape: ShapeDescriptor,
    /// Declared columns, plus observed day columns for the detail sheet.
    pub schema: SheetSchema,
    pub records: Vec<Record>,
    pub dropped_rows: usize,
}

/// Day numbers named by header cells, ascending and deduplicated.
pub fn day_columns(header_row: &[String]) -> Vec<u8> {
    let mut days: Vec<u8> = header_row.iter().filter_map(|cell| day_number(cell)).collect();
    days.sort_unstable();
    days.dedup();
    days
}

/// Detect the shape of `text`, normalize its rows and resolve the schema.
pub fn ingest_document(text: &str, kind: SheetKind) -> Result<IngestedDocument> {
    let _span = tracing::info_span!("ingest_document", sheet = %kind).entered();
    let base = kind.schema();
    let detected = detect_shape(text, &base.expected_labels())?;
    let header_row_index = detected.shape.header_row_index;
    let normalized = normalize(&detected.rows, header_row_index);

    let schema = if kind.accepts_day_columns() {
        let header_row = detected
            .rows
            .get(header_row_index)
            .map(Vec::as_slice)
            .unwrap_or_default();
        base.with_day_columns(&day_columns(header_row))
    } else {
        base
    };

    tracing::info!(
        delimiter = %detected.shape.delimiter,
        header_row = header_row_index,
        matched = detected.shape.confidence.matched,
        records = normalized.records.len(),
        dropped = normalized.dropped,
        columns = schema.len(),
        "ingested document"
    );
    Ok(IngestedDocument {
        kind,
        shape: detected.shape,
        schema,
        records: normalized.records,
        dropped_rows: normalized.dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_columns_from_header() {
        let header: Vec<String> = ["Øko-ID", "15", "1", "02", "32", "1", "x"]
            .iter()
            .map(|cell| (*cell).to_string())
            .collect();
        assert_eq!(day_columns(&header), vec![1, 2, 15]);
    }

    #[test]
    fn test_summary_schema_ignores_day_headers() {
        let text = "Bilagsdato;Tekst;Beløb, kr;1\n01-01-2024;Kaffe;12,50;x\n";
        let document = ingest_document(text, SheetKind::Summary).unwrap();
        assert_eq!(document.schema.len(), 10);
        assert_eq!(document.records.len(), 1);
    }

    #[test]
    fn test_detail_schema_gains_day_columns() {
        let text = "Øko-ID;I alt, kr;15;1;2\n100;1.234,50;;F;\n";
        let document = ingest_document(text, SheetKind::Detail).unwrap();
        assert_eq!(document.schema.len(), 26);
        let tail: Vec<&str> = document.schema.columns[23..]
            .iter()
            .map(|column| column.label.as_str())
            .collect();
        assert_eq!(tail, vec!["1", "2", "15"]);
    }
}
