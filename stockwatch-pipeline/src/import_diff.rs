//! Per-field diff view of a proposed import.
//!
//! Same underlying comparison as [`crate::import_analysis`], different shape:
//! review UIs want field-level before/after pairs with a significance bucket
//! rather than the projected operational impact. Both views share
//! [`crate::import_analysis::FIELD_EPSILON`], so they always agree on which
//! products changed.

use std::collections::HashMap;

use serde::Serialize;

use stockwatch_core::types::ProductSnapshot;

use crate::import_analysis::{percent_change, ChangeKind, FIELD_EPSILON};
use crate::import_loader::ProposedRow;

/// Percent delta at or above which a field change is high significance.
pub const HIGH_SIGNIFICANCE_PERCENT: f64 = 50.0;
/// Percent delta at or above which a field change is medium significance.
pub const MEDIUM_SIGNIFICANCE_PERCENT: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    High,
    Medium,
    Low,
}

impl Significance {
    pub fn from_percent(percent: f64) -> Self {
        let magnitude = percent.abs();
        if magnitude >= HIGH_SIGNIFICANCE_PERCENT {
            Significance::High
        } else if magnitude >= MEDIUM_SIGNIFICANCE_PERCENT {
            Significance::Medium
        } else {
            Significance::Low
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub before: f64,
    pub after: f64,
    pub percent_change: f64,
    pub significance: Significance,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductDiff {
    pub sku: String,
    pub name: String,
    pub kind: ChangeKind,
    pub fields: Vec<FieldChange>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DiffSummary {
    pub total_rows: usize,
    pub new_products: usize,
    pub changed_products: usize,
    pub unchanged_products: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportDiff {
    pub products: Vec<ProductDiff>,
    pub summary: DiffSummary,
}

/// Diff proposed rows against the current catalog, field by field.
pub fn generate_import_diff(current: &[ProductSnapshot], rows: &[ProposedRow]) -> ImportDiff {
    let by_sku: HashMap<&str, &ProductSnapshot> =
        current.iter().map(|p| (p.sku.as_str(), p)).collect();

    let mut products = Vec::with_capacity(rows.len());
    let mut new_products = 0;
    let mut changed_products = 0;
    let mut unchanged_products = 0;

    for row in rows {
        let Some(product) = by_sku.get(row.sku.as_str()) else {
            new_products += 1;
            products.push(ProductDiff {
                sku: row.sku.clone(),
                name: row.name.clone(),
                kind: ChangeKind::New,
                fields: Vec::new(),
            });
            continue;
        };

        let mut fields = Vec::new();
        push_field(
            &mut fields,
            "stock_units",
            product.stock_units(),
            row.stock_units(),
        );
        push_field(&mut fields, "pack_size", product.pack_size, row.pack_size);

        let kind = if fields.is_empty() {
            unchanged_products += 1;
            ChangeKind::Unchanged
        } else {
            changed_products += 1;
            ChangeKind::Updated
        };
        products.push(ProductDiff {
            sku: row.sku.clone(),
            name: product.name.clone(),
            kind,
            fields,
        });
    }

    ImportDiff {
        products,
        summary: DiffSummary {
            total_rows: rows.len(),
            new_products,
            changed_products,
            unchanged_products,
        },
    }
}

fn push_field(fields: &mut Vec<FieldChange>, field: &'static str, before: f64, after: f64) {
    if (after - before).abs() <= FIELD_EPSILON {
        return;
    }
    let percent = percent_change(before, after);
    fields.push(FieldChange {
        field,
        before,
        after,
        percent_change: percent,
        significance: Significance::from_percent(percent),
    });
}
