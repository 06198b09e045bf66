//! Pre-import impact analysis.
//!
//! Given the current catalog, a proposed import batch, and the open alerts,
//! project what applying the import would do: per-product stock changes,
//! status transitions, data anomalies, alert creation/resolution, and a
//! reorder shortlist. Strictly read-only; the caller decides whether to
//! apply the import, and the notification layer owns actually creating or
//! resolving alerts.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use stockwatch_core::thresholds::UNBOUNDED_WEEKS;
use stockwatch_core::types::ProductSnapshot;

use crate::import_loader::{ImportBatch, ProposedRow};

// ---- anomaly and significance thresholds ----

/// Proposed stock above this multiple of prior stock is a spike.
pub const SPIKE_RATIO: f64 = 2.0;
/// Proposed stock below this fraction of prior stock is a drop.
pub const DROP_RATIO: f64 = 0.2;
/// Relative pack-size change above this fraction is anomalous.
pub const PACK_CHANGE_RATIO: f64 = 0.5;
/// Absolute percent delta counting as a "significant change" in the summary.
pub const SIGNIFICANT_CHANGE_PERCENT: f64 = 50.0;
/// Percent delta counting as a "large change" for the bulk-change warning.
pub const LARGE_CHANGE_PERCENT: f64 = 100.0;
/// More than this many large changes triggers the bulk-change warning.
pub const LARGE_CHANGE_PRODUCT_LIMIT: usize = 5;
/// Maximum entries in the reorder-needed list.
pub const REORDER_LIST_CAP: usize = 20;
/// Weeks of supply at or under which a reorder is urgent.
pub const URGENT_REORDER_WEEKS: f64 = 2.0;
/// Equality tolerance for imported numeric fields. The diff view uses the
/// same tolerance so both agree on which products changed.
pub const FIELD_EPSILON: f64 = 1e-9;

// ---- projected status (import-time classifier variant) ----

/// Status projected for an imported stock level.
///
/// Distinct from the live classifier: thresholds here are absolute weeks of
/// supply against weekly usage, with a notification-point fallback when no
/// usage data exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectedStatus {
    OutOfStock,
    Critical,
    Low,
    Watch,
    Healthy,
}

impl ProjectedStatus {
    /// Statuses that warrant an alert.
    pub fn is_risky(self) -> bool {
        matches!(
            self,
            ProjectedStatus::OutOfStock | ProjectedStatus::Critical | ProjectedStatus::Low
        )
    }
}

impl fmt::Display for ProjectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectedStatus::OutOfStock => write!(f, "OUT_OF_STOCK"),
            ProjectedStatus::Critical => write!(f, "CRITICAL"),
            ProjectedStatus::Low => write!(f, "LOW"),
            ProjectedStatus::Watch => write!(f, "WATCH"),
            ProjectedStatus::Healthy => write!(f, "HEALTHY"),
        }
    }
}

/// Classify a unit stock level for import projection.
///
/// Returns the status and the projected weeks of supply (999 when usage is
/// unknown and the notification-point fallback was used).
pub fn project_status(product: &ProductSnapshot, stock_units: f64) -> (ProjectedStatus, f64) {
    let weekly_usage = product.avg_daily_units * 7.0;
    if weekly_usage > 0.0 {
        let weeks = stock_units / weekly_usage;
        let status = if weeks <= 0.0 {
            ProjectedStatus::OutOfStock
        } else if weeks <= 2.0 {
            ProjectedStatus::Critical
        } else if weeks <= 4.0 {
            ProjectedStatus::Low
        } else if weeks <= 8.0 {
            ProjectedStatus::Watch
        } else {
            ProjectedStatus::Healthy
        };
        (status, weeks)
    } else {
        let np = product.notification_point;
        let status = if stock_units <= 0.0 {
            ProjectedStatus::OutOfStock
        } else if stock_units < 0.5 * np {
            ProjectedStatus::Critical
        } else if stock_units < np {
            ProjectedStatus::Low
        } else if stock_units < 2.0 * np {
            ProjectedStatus::Watch
        } else {
            ProjectedStatus::Healthy
        };
        (status, UNBOUNDED_WEEKS)
    }
}

// ---- report types ----

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    New,
    Updated,
    Unchanged,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductChange {
    pub sku: String,
    pub name: String,
    pub kind: ChangeKind,
    /// None for products not in the current catalog.
    pub stock_units_before: Option<f64>,
    pub stock_units_after: f64,
    /// None for new products.
    pub percent_change: Option<f64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StatusTransition {
    pub sku: String,
    pub before: ProjectedStatus,
    pub after: ProjectedStatus,
    pub projected_weeks_remaining: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Negative stock or pack size.
    Negative,
    /// Stock dropping to zero from a positive value.
    ZeroStock,
    /// Stock rising past the spike ratio.
    Spike,
    /// Stock falling past the drop ratio.
    Drop,
    /// Pack size at or below zero.
    PackSize,
    /// Pack size changing past the pack-change ratio.
    PackChange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
}

#[derive(Clone, Debug, Serialize)]
pub struct DataAnomaly {
    pub sku: String,
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub detail: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    OutOfStock,
    LowStock,
}

/// An alert currently open for a product, as read from the alerting layer.
#[derive(Clone, Debug)]
pub struct OpenAlert {
    pub sku: String,
    pub alert_type: AlertType,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProjectedAlert {
    pub sku: String,
    pub alert_type: AlertType,
}

#[derive(Clone, Debug, Serialize)]
pub struct AlertResolution {
    pub sku: String,
    pub alert_type: AlertType,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReorderItem {
    pub sku: String,
    pub name: String,
    pub status: ProjectedStatus,
    pub projected_weeks_remaining: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct AlertImpact {
    pub projected_alerts: Vec<ProjectedAlert>,
    pub projected_resolutions: Vec<AlertResolution>,
    /// Products entering critical/low, soonest stockout first.
    pub reorder_needed: Vec<ReorderItem>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub new_products: usize,
    pub updated_products: usize,
    pub unchanged_products: usize,
    pub significant_changes: usize,
    pub skipped_rows: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportAnalysisReport {
    pub summary: ImportSummary,
    pub stock_changes: Vec<ProductChange>,
    pub status_transitions: Vec<StatusTransition>,
    pub anomalies: Vec<DataAnomaly>,
    pub alert_impact: AlertImpact,
    pub recommendations: Vec<String>,
}

// ---- analyzer ----

#[derive(Clone, Debug, Default)]
pub struct ImportImpactAnalyzer;

impl ImportImpactAnalyzer {
    /// Analyze a proposed import against the current catalog and open alerts.
    pub fn analyze(
        &self,
        current: &[ProductSnapshot],
        batch: &ImportBatch,
        open_alerts: &[OpenAlert],
    ) -> ImportAnalysisReport {
        let by_sku: HashMap<&str, &ProductSnapshot> =
            current.iter().map(|p| (p.sku.as_str(), p)).collect();

        let mut stock_changes = Vec::new();
        let mut status_transitions = Vec::new();
        let mut anomalies = Vec::new();
        let mut projected_alerts = Vec::new();
        let mut projected_resolutions = Vec::new();
        let mut reorder_needed = Vec::new();

        let mut new_products = 0;
        let mut updated_products = 0;
        let mut unchanged_products = 0;
        let mut significant_changes = 0;

        for row in &batch.rows {
            let Some(product) = by_sku.get(row.sku.as_str()) else {
                // Unknown SKU: recorded as new, no history to check against.
                new_products += 1;
                stock_changes.push(ProductChange {
                    sku: row.sku.clone(),
                    name: row.name.clone(),
                    kind: ChangeKind::New,
                    stock_units_before: None,
                    stock_units_after: row.stock_units(),
                    percent_change: None,
                });
                continue;
            };

            let before_units = product.stock_units();
            let after_units = row.stock_units();
            self.check_anomalies(product, row, before_units, after_units, &mut anomalies);

            let percent_change = percent_change(before_units, after_units);
            let changed = (after_units - before_units).abs() > FIELD_EPSILON
                || (row.pack_size - product.pack_size).abs() > FIELD_EPSILON;
            if changed {
                updated_products += 1;
                if percent_change.abs() >= SIGNIFICANT_CHANGE_PERCENT {
                    significant_changes += 1;
                }
            } else {
                unchanged_products += 1;
            }
            stock_changes.push(ProductChange {
                sku: row.sku.clone(),
                name: product.name.clone(),
                kind: if changed {
                    ChangeKind::Updated
                } else {
                    ChangeKind::Unchanged
                },
                stock_units_before: Some(before_units),
                stock_units_after: after_units,
                percent_change: Some(percent_change),
            });

            let (before_status, _) = project_status(product, before_units);
            let (after_status, after_weeks) = project_status(product, after_units);
            if before_status == after_status {
                continue;
            }
            status_transitions.push(StatusTransition {
                sku: row.sku.clone(),
                before: before_status,
                after: after_status,
                projected_weeks_remaining: after_weeks,
            });

            if after_status.is_risky() && !before_status.is_risky() {
                projected_alerts.push(ProjectedAlert {
                    sku: row.sku.clone(),
                    alert_type: if after_status == ProjectedStatus::OutOfStock {
                        AlertType::OutOfStock
                    } else {
                        AlertType::LowStock
                    },
                });
            }
            if before_status.is_risky() && !after_status.is_risky() {
                for alert in open_alerts.iter().filter(|a| a.sku == row.sku) {
                    projected_resolutions.push(AlertResolution {
                        sku: alert.sku.clone(),
                        alert_type: alert.alert_type,
                    });
                }
            }
            if matches!(
                after_status,
                ProjectedStatus::Critical | ProjectedStatus::Low
            ) {
                reorder_needed.push(ReorderItem {
                    sku: row.sku.clone(),
                    name: product.name.clone(),
                    status: after_status,
                    projected_weeks_remaining: after_weeks,
                });
            }
        }

        reorder_needed.sort_by(|a, b| {
            a.projected_weeks_remaining
                .total_cmp(&b.projected_weeks_remaining)
        });
        reorder_needed.truncate(REORDER_LIST_CAP);

        let recommendations = self.recommendations(
            &anomalies,
            &status_transitions,
            &reorder_needed,
            &stock_changes,
        );

        ImportAnalysisReport {
            summary: ImportSummary {
                total_rows: batch.rows.len(),
                new_products,
                updated_products,
                unchanged_products,
                significant_changes,
                skipped_rows: batch.skipped.len(),
            },
            stock_changes,
            status_transitions,
            anomalies,
            alert_impact: AlertImpact {
                projected_alerts,
                projected_resolutions,
                reorder_needed,
            },
            recommendations,
        }
    }

    /// Independent anomaly checks; all that apply fire for the same row.
    fn check_anomalies(
        &self,
        product: &ProductSnapshot,
        row: &ProposedRow,
        before_units: f64,
        after_units: f64,
        anomalies: &mut Vec<DataAnomaly>,
    ) {
        if row.stock_packs < 0.0 || row.pack_size < 0.0 {
            anomalies.push(DataAnomaly {
                sku: row.sku.clone(),
                kind: AnomalyKind::Negative,
                severity: Severity::High,
                detail: format!(
                    "negative value in import: stock_packs {}, pack_size {}",
                    row.stock_packs, row.pack_size
                ),
            });
        }
        if after_units == 0.0 && before_units > 0.0 {
            anomalies.push(DataAnomaly {
                sku: row.sku.clone(),
                kind: AnomalyKind::ZeroStock,
                severity: Severity::Medium,
                detail: format!("stock drops to zero from {before_units} units"),
            });
        }
        if before_units > 0.0 && after_units > before_units * SPIKE_RATIO {
            anomalies.push(DataAnomaly {
                sku: row.sku.clone(),
                kind: AnomalyKind::Spike,
                severity: Severity::Medium,
                detail: format!(
                    "stock jumps from {before_units} to {after_units} units (+{:.0}%)",
                    percent_change(before_units, after_units)
                ),
            });
        }
        if before_units > 0.0 && after_units < before_units * DROP_RATIO {
            anomalies.push(DataAnomaly {
                sku: row.sku.clone(),
                kind: AnomalyKind::Drop,
                severity: Severity::High,
                detail: format!(
                    "stock falls from {before_units} to {after_units} units ({:.0}%)",
                    percent_change(before_units, after_units)
                ),
            });
        }
        if row.pack_size <= 0.0 {
            anomalies.push(DataAnomaly {
                sku: row.sku.clone(),
                kind: AnomalyKind::PackSize,
                severity: Severity::High,
                detail: format!("pack size {} is not positive", row.pack_size),
            });
        } else if product.pack_size > 0.0 {
            let relative = (row.pack_size - product.pack_size).abs() / product.pack_size;
            if relative > PACK_CHANGE_RATIO {
                anomalies.push(DataAnomaly {
                    sku: row.sku.clone(),
                    kind: AnomalyKind::PackChange,
                    severity: Severity::Medium,
                    detail: format!(
                        "pack size changes from {} to {} ({:.0}%)",
                        product.pack_size,
                        row.pack_size,
                        relative * 100.0
                    ),
                });
            }
        }
    }

    /// Rule-ordered recommendations; every applicable rule emits one line.
    fn recommendations(
        &self,
        anomalies: &[DataAnomaly],
        transitions: &[StatusTransition],
        reorder_needed: &[ReorderItem],
        stock_changes: &[ProductChange],
    ) -> Vec<String> {
        let mut out = Vec::new();

        let high_severity = anomalies
            .iter()
            .filter(|a| a.severity == Severity::High)
            .count();
        if high_severity > 0 {
            out.push(format!(
                "{high_severity} high-severity data anomalies detected; review flagged rows before applying"
            ));
        }

        let negative = anomalies
            .iter()
            .filter(|a| a.kind == AnomalyKind::Negative)
            .count();
        if negative > 0 {
            out.push(format!(
                "{negative} rows contain negative stock or pack values; correct the source data"
            ));
        }

        let critical = transitions
            .iter()
            .filter(|t| {
                matches!(
                    t.after,
                    ProjectedStatus::Critical | ProjectedStatus::OutOfStock
                )
            })
            .count();
        if critical > 0 {
            out.push(format!(
                "{critical} products would move into critical or out-of-stock status"
            ));
        }

        let urgent = reorder_needed
            .iter()
            .filter(|r| r.projected_weeks_remaining <= URGENT_REORDER_WEEKS)
            .count();
        if urgent > 0 {
            out.push(format!(
                "{urgent} products would need reordering within two weeks"
            ));
        }

        let large = stock_changes
            .iter()
            .filter(|c| {
                c.percent_change
                    .is_some_and(|p| p.abs() > LARGE_CHANGE_PERCENT)
            })
            .count();
        if large > LARGE_CHANGE_PRODUCT_LIMIT {
            out.push(format!(
                "{large} products change stock by more than 100%; verify the import against the source system"
            ));
        }

        if out.is_empty() {
            out.push("No issues detected.".to_string());
        }
        out
    }
}

/// Percent change with the zero-baseline convention: from zero to anything
/// positive reads as +100%, zero to zero as 0%.
pub fn percent_change(before: f64, after: f64) -> f64 {
    if before > 0.0 {
        (after - before) / before * 100.0
    } else if after > 0.0 {
        100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwatch_core::types::CalculationBasis;

    fn product(sku: &str, stock_packs: f64, pack_size: f64, daily: f64, np: f64) -> ProductSnapshot {
        ProductSnapshot {
            id: format!("id-{sku}"),
            sku: sku.to_string(),
            name: format!("Product {sku}"),
            stock_packs,
            pack_size,
            reorder_point: 40.0,
            notification_point: np,
            avg_daily_units: daily,
            avg_monthly_units: daily * 30.0,
            calculation_basis: CalculationBasis::Transactional,
        }
    }

    fn row(sku: &str, stock_packs: f64, pack_size: f64) -> ProposedRow {
        ProposedRow {
            sku: sku.to_string(),
            name: String::new(),
            stock_packs,
            pack_size,
        }
    }

    fn analyze(
        current: &[ProductSnapshot],
        rows: Vec<ProposedRow>,
        alerts: &[OpenAlert],
    ) -> ImportAnalysisReport {
        ImportImpactAnalyzer.analyze(current, &ImportBatch::from_rows(rows), alerts)
    }

    #[test]
    fn spike_from_100_to_350_is_flagged() {
        let current = [product("A", 100.0, 1.0, 2.0, 20.0)];
        let report = analyze(&current, vec![row("A", 350.0, 1.0)], &[]);
        let spike = report
            .anomalies
            .iter()
            .find(|a| a.kind == AnomalyKind::Spike)
            .expect("spike anomaly");
        assert_eq!(spike.severity, Severity::Medium);
        assert_eq!(spike.sku, "A");
    }

    #[test]
    fn drop_from_100_to_15_is_high_severity() {
        let current = [product("A", 100.0, 1.0, 2.0, 20.0)];
        let report = analyze(&current, vec![row("A", 15.0, 1.0)], &[]);
        let drop = report
            .anomalies
            .iter()
            .find(|a| a.kind == AnomalyKind::Drop)
            .expect("drop anomaly");
        assert_eq!(drop.severity, Severity::High);
    }

    #[test]
    fn zero_from_positive_is_medium_severity() {
        let current = [product("A", 100.0, 1.0, 2.0, 20.0)];
        let report = analyze(&current, vec![row("A", 0.0, 1.0)], &[]);
        let zero = report
            .anomalies
            .iter()
            .find(|a| a.kind == AnomalyKind::ZeroStock)
            .expect("zero anomaly");
        assert_eq!(zero.severity, Severity::Medium);
        // The checks are independent: zeroing out is also a steep drop.
        assert!(report
            .anomalies
            .iter()
            .any(|a| a.kind == AnomalyKind::Drop && a.severity == Severity::High));
    }

    #[test]
    fn negative_values_and_bad_pack_both_fire() {
        let current = [product("A", 100.0, 1.0, 2.0, 20.0)];
        let report = analyze(&current, vec![row("A", -5.0, -1.0)], &[]);
        assert!(report
            .anomalies
            .iter()
            .any(|a| a.kind == AnomalyKind::Negative && a.severity == Severity::High));
        assert!(report
            .anomalies
            .iter()
            .any(|a| a.kind == AnomalyKind::PackSize && a.severity == Severity::High));
    }

    #[test]
    fn pack_change_over_half_is_flagged() {
        let current = [product("A", 100.0, 6.0, 2.0, 20.0)];
        let report = analyze(&current, vec![row("A", 100.0, 10.0)], &[]);
        assert!(report
            .anomalies
            .iter()
            .any(|a| a.kind == AnomalyKind::PackChange && a.severity == Severity::Medium));
    }

    #[test]
    fn unknown_sku_is_new_with_no_anomaly_checks() {
        let report = analyze(&[], vec![row("NEW", -5.0, 1.0)], &[]);
        assert_eq!(report.summary.new_products, 1);
        assert!(report.anomalies.is_empty());
        assert_eq!(report.stock_changes[0].kind, ChangeKind::New);
        assert!(report.stock_changes[0].percent_change.is_none());
    }

    #[test]
    fn projected_status_uses_weeks_when_usage_exists() {
        let p = product("A", 0.0, 1.0, 2.0, 20.0); // 14 units/week
        assert_eq!(project_status(&p, 0.0).0, ProjectedStatus::OutOfStock);
        assert_eq!(project_status(&p, 28.0).0, ProjectedStatus::Critical); // 2 wk
        assert_eq!(project_status(&p, 56.0).0, ProjectedStatus::Low); // 4 wk
        assert_eq!(project_status(&p, 112.0).0, ProjectedStatus::Watch); // 8 wk
        assert_eq!(project_status(&p, 113.0).0, ProjectedStatus::Healthy);
    }

    #[test]
    fn projected_status_falls_back_to_notification_point() {
        let p = product("A", 0.0, 1.0, 0.0, 20.0);
        assert_eq!(project_status(&p, 0.0).0, ProjectedStatus::OutOfStock);
        assert_eq!(project_status(&p, 5.0).0, ProjectedStatus::Critical); // < 10
        assert_eq!(project_status(&p, 15.0).0, ProjectedStatus::Low); // < 20
        assert_eq!(project_status(&p, 30.0).0, ProjectedStatus::Watch); // < 40
        assert_eq!(project_status(&p, 40.0).0, ProjectedStatus::Healthy);
        assert_eq!(project_status(&p, 5.0).1, UNBOUNDED_WEEKS);
    }

    #[test]
    fn risky_transition_projects_an_alert() {
        // 140 units at 14/week = 10 weeks (healthy); import drops to 28 (critical).
        let current = [product("A", 140.0, 1.0, 2.0, 20.0)];
        let report = analyze(&current, vec![row("A", 28.0, 1.0)], &[]);

        assert_eq!(report.status_transitions.len(), 1);
        let t = &report.status_transitions[0];
        assert_eq!(t.before, ProjectedStatus::Healthy);
        assert_eq!(t.after, ProjectedStatus::Critical);

        assert_eq!(report.alert_impact.projected_alerts.len(), 1);
        assert_eq!(
            report.alert_impact.projected_alerts[0].alert_type,
            AlertType::LowStock
        );
        assert_eq!(report.alert_impact.reorder_needed.len(), 1);
        assert!((report.alert_impact.reorder_needed[0].projected_weeks_remaining - 2.0).abs() < 0.01);
    }

    #[test]
    fn stockout_transition_projects_out_of_stock_alert() {
        let current = [product("A", 140.0, 1.0, 2.0, 20.0)];
        let report = analyze(&current, vec![row("A", 0.0, 1.0)], &[]);
        assert_eq!(
            report.alert_impact.projected_alerts[0].alert_type,
            AlertType::OutOfStock
        );
    }

    #[test]
    fn recovery_resolves_matching_open_alerts() {
        // 14 units at 14/week = 1 week (critical); import raises to 140 (healthy).
        let current = [product("A", 14.0, 1.0, 2.0, 20.0)];
        let alerts = [
            OpenAlert {
                sku: "A".into(),
                alert_type: AlertType::LowStock,
            },
            OpenAlert {
                sku: "B".into(),
                alert_type: AlertType::OutOfStock,
            },
        ];
        let report = analyze(&current, vec![row("A", 140.0, 1.0)], &alerts);
        assert_eq!(report.alert_impact.projected_resolutions.len(), 1);
        assert_eq!(report.alert_impact.projected_resolutions[0].sku, "A");
        assert!(report.alert_impact.projected_alerts.is_empty());
    }

    #[test]
    fn reorder_list_sorts_by_weeks_ascending() {
        let current = [
            product("A", 140.0, 1.0, 2.0, 20.0),
            product("B", 140.0, 1.0, 2.0, 20.0),
        ];
        let report = analyze(
            &current,
            vec![row("B", 50.0, 1.0), row("A", 20.0, 1.0)],
            &[],
        );
        let weeks: Vec<f64> = report
            .alert_impact
            .reorder_needed
            .iter()
            .map(|r| r.projected_weeks_remaining)
            .collect();
        assert_eq!(report.alert_impact.reorder_needed[0].sku, "A");
        assert!(weeks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn summary_counts_changes() {
        let current = [
            product("A", 100.0, 1.0, 2.0, 20.0),
            product("B", 100.0, 1.0, 2.0, 20.0),
            product("C", 100.0, 1.0, 2.0, 20.0),
        ];
        let rows = vec![
            row("A", 100.0, 1.0), // unchanged
            row("B", 160.0, 1.0), // +60%: significant
            row("C", 110.0, 1.0), // +10%: updated, not significant
            row("D", 50.0, 1.0),  // new
        ];
        let report = analyze(&current, rows, &[]);
        assert_eq!(report.summary.total_rows, 4);
        assert_eq!(report.summary.new_products, 1);
        assert_eq!(report.summary.updated_products, 2);
        assert_eq!(report.summary.unchanged_products, 1);
        assert_eq!(report.summary.significant_changes, 1);
    }

    #[test]
    fn clean_import_recommends_nothing_to_fix() {
        let current = [product("A", 100.0, 1.0, 1.0, 20.0)];
        let report = analyze(&current, vec![row("A", 105.0, 1.0)], &[]);
        assert_eq!(report.recommendations, vec!["No issues detected.".to_string()]);
    }

    #[test]
    fn recommendations_follow_rule_order() {
        // One row with a high-severity drop that also lands in critical.
        let current = [product("A", 140.0, 1.0, 2.0, 20.0)];
        let report = analyze(&current, vec![row("A", 14.0, 1.0)], &[]);
        assert!(report.recommendations.len() >= 3);
        assert!(report.recommendations[0].contains("high-severity"));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("critical or out-of-stock")));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("reordering within two weeks")));
    }

    #[test]
    fn analysis_is_idempotent() {
        let current = [product("A", 100.0, 1.0, 2.0, 20.0)];
        let rows = vec![row("A", 15.0, 1.0)];
        let a = analyze(&current, rows.clone(), &[]);
        let b = analyze(&current, rows, &[]);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
