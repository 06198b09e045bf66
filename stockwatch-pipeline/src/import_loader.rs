//! Lenient loader for proposed import rows.
//!
//! Expected columns: sku, name, stock_packs, pack_size
//!
//! Unlike the catalog loader, a malformed row here must not abort the batch:
//! import files come straight from suppliers and routinely contain junk rows.
//! Bad rows are collected as skipped-row records with their line numbers so
//! the analysis report can surface them.

use std::io::Read;

use serde::{Deserialize, Serialize};

/// One proposed catalog row from an import file.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProposedRow {
    pub sku: String,
    #[serde(default)]
    pub name: String,
    pub stock_packs: f64,
    pub pack_size: f64,
}

impl ProposedRow {
    pub fn stock_units(&self) -> f64 {
        self.stock_packs * self.pack_size
    }
}

/// A row the loader could not parse, kept for the report.
#[derive(Clone, Debug, Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the source file, counting the header.
    pub line: usize,
    pub reason: String,
}

/// A parsed import batch: usable rows plus whatever had to be skipped.
#[derive(Clone, Debug, Default)]
pub struct ImportBatch {
    pub rows: Vec<ProposedRow>,
    pub skipped: Vec<SkippedRow>,
}

impl ImportBatch {
    pub fn from_rows(rows: Vec<ProposedRow>) -> Self {
        Self {
            rows,
            skipped: Vec::new(),
        }
    }
}

/// Load proposed rows from a CSV reader, isolating malformed rows.
pub fn load_import<R: Read>(reader: R) -> Result<ImportBatch, String> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut batch = ImportBatch::default();
    for (line_num, result) in csv_reader.deserialize::<ProposedRow>().enumerate() {
        let line = line_num + 2;
        match result {
            Ok(row) if row.sku.is_empty() => batch.skipped.push(SkippedRow {
                line,
                reason: "missing sku".to_string(),
            }),
            Ok(row) => batch.rows.push(row),
            Err(e) => batch.skipped.push(SkippedRow {
                line,
                reason: e.to_string(),
            }),
        }
    }
    Ok(batch)
}

/// Load proposed rows from a CSV file path.
pub fn load_import_file(path: &str) -> Result<ImportBatch, String> {
    let file =
        std::fs::File::open(path).map_err(|e| format!("Failed to open '{}': {}", path, e))?;
    load_import(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_rows_are_isolated_not_fatal() {
        let csv_data = "\
sku,name,stock_packs,pack_size
WID-100,Widget,12,6
GAD-200,Gadget,not-a-number,1
,Nameless,5,1
HRD-300,Bracket,40,2
";
        let batch = load_import(csv_data.as_bytes()).unwrap();
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.rows[0].sku, "WID-100");
        assert_eq!(batch.rows[1].sku, "HRD-300");

        assert_eq!(batch.skipped.len(), 2);
        assert_eq!(batch.skipped[0].line, 3);
        assert_eq!(batch.skipped[1].line, 4);
        assert!(batch.skipped[1].reason.contains("sku"));
    }

    #[test]
    fn missing_name_defaults_to_empty() {
        let csv_data = "\
sku,name,stock_packs,pack_size
WID-100,,12,6
";
        let batch = load_import(csv_data.as_bytes()).unwrap();
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.rows[0].name, "");
        assert!((batch.rows[0].stock_units() - 72.0).abs() < 0.01);
    }
}
