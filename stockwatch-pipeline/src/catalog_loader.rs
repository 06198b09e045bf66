//! CSV catalog and transaction loaders.
//!
//! Expected catalog columns:
//!   id, sku, name, stock_packs, pack_size, reorder_point, notification_point,
//!   avg_daily_units, avg_monthly_units, calculation_basis
//! Expected transaction columns:
//!   product_id, submitted_at (RFC 3339), quantity_units, status
//!
//! These loaders are strict: the catalog and transaction history are the
//! system of record, so a malformed row aborts the load with its line number.
//! Proposed import rows go through the lenient loader in
//! [`crate::import_loader`] instead.

use std::io::Read;

use serde::Deserialize;

use stockwatch_core::types::{CalculationBasis, ProductSnapshot, TransactionRecord};

#[derive(Debug, Clone, Deserialize)]
struct CatalogRow {
    id: String,
    sku: String,
    name: String,
    stock_packs: f64,
    pack_size: f64,
    reorder_point: f64,
    notification_point: f64,
    avg_daily_units: f64,
    avg_monthly_units: f64,
    #[serde(deserialize_with = "deserialize_basis")]
    calculation_basis: CalculationBasis,
}

impl From<CatalogRow> for ProductSnapshot {
    fn from(row: CatalogRow) -> Self {
        ProductSnapshot {
            id: row.id,
            sku: row.sku,
            name: row.name,
            stock_packs: row.stock_packs,
            pack_size: row.pack_size,
            reorder_point: row.reorder_point,
            notification_point: row.notification_point,
            avg_daily_units: row.avg_daily_units,
            avg_monthly_units: row.avg_monthly_units,
            calculation_basis: row.calculation_basis,
        }
    }
}

/// Load product snapshots from a CSV reader.
pub fn load_catalog<R: Read>(reader: R) -> Result<Vec<ProductSnapshot>, String> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut products = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let row: CatalogRow =
            result.map_err(|e| format!("CSV parse error at line {}: {}", line_num + 2, e))?;
        products.push(row.into());
    }
    Ok(products)
}

/// Load product snapshots from a CSV file path.
pub fn load_catalog_file(path: &str) -> Result<Vec<ProductSnapshot>, String> {
    let file =
        std::fs::File::open(path).map_err(|e| format!("Failed to open '{}': {}", path, e))?;
    load_catalog(file)
}

/// Load transaction history from a CSV reader.
pub fn load_transactions<R: Read>(reader: R) -> Result<Vec<TransactionRecord>, String> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let record: TransactionRecord =
            result.map_err(|e| format!("CSV parse error at line {}: {}", line_num + 2, e))?;
        records.push(record);
    }
    Ok(records)
}

/// Load transaction history from a CSV file path.
pub fn load_transactions_file(path: &str) -> Result<Vec<TransactionRecord>, String> {
    let file =
        std::fs::File::open(path).map_err(|e| format!("Failed to open '{}': {}", path, e))?;
    load_transactions(file)
}

/// Flexible basis deserializer: accepts "weekly"/"transactional" in any case,
/// with "transaction"/"txn" as aliases for historical exports.
fn deserialize_basis<'de, D>(deserializer: D) -> Result<CalculationBasis, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.to_lowercase().trim() {
        "weekly" => Ok(CalculationBasis::Weekly),
        "transactional" | "transaction" | "txn" => Ok(CalculationBasis::Transactional),
        other => Err(serde::de::Error::custom(format!(
            "expected calculation basis, got '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use stockwatch_core::types::OrderStatus;

    const CATALOG_CSV: &str = "\
id,sku,name,stock_packs,pack_size,reorder_point,notification_point,avg_daily_units,avg_monthly_units,calculation_basis
p-1,WID-100,Widget,12,6,40,20,2.5,75,weekly
p-2,GAD-200,Gadget,0,1,10,5,0.8,24,transactional
";

    const TXN_CSV: &str = "\
product_id,submitted_at,quantity_units,status
p-1,2025-04-01T09:30:00Z,12,fulfilled
p-1,2025-04-15T10:00:00Z,6,cancelled
p-2,2025-05-02T08:00:00Z,3,submitted
";

    #[test]
    fn load_sample_catalog() {
        let products = load_catalog(CATALOG_CSV.as_bytes()).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].sku, "WID-100");
        assert!((products[0].stock_units() - 72.0).abs() < 0.01);
        assert_eq!(products[0].calculation_basis, CalculationBasis::Weekly);
        assert_eq!(products[1].calculation_basis, CalculationBasis::Transactional);
    }

    #[test]
    fn load_sample_transactions() {
        let txns = load_transactions(TXN_CSV.as_bytes()).unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].product_id, "p-1");
        assert_eq!(txns[0].submitted_at.month(), 4);
        assert_eq!(txns[0].submitted_at.hour(), 9);
        assert_eq!(txns[1].status, OrderStatus::Cancelled);
        assert!((txns[2].quantity_units - 3.0).abs() < 0.01);
    }

    #[test]
    fn malformed_catalog_row_reports_line() {
        let bad = "\
id,sku,name,stock_packs,pack_size,reorder_point,notification_point,avg_daily_units,avg_monthly_units,calculation_basis
p-1,WID-100,Widget,not-a-number,6,40,20,2.5,75,weekly
";
        let err = load_catalog(bad.as_bytes()).unwrap_err();
        assert!(err.contains("line 2"), "got: {err}");
    }

    #[test]
    fn unknown_basis_is_rejected() {
        let bad = "\
id,sku,name,stock_packs,pack_size,reorder_point,notification_point,avg_daily_units,avg_monthly_units,calculation_basis
p-1,WID-100,Widget,12,6,40,20,2.5,75,fortnightly
";
        assert!(load_catalog(bad.as_bytes()).is_err());
    }
}
