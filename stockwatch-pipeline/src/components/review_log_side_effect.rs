use async_trait::async_trait;
use std::sync::Arc;

use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::{ReviewQuery, RiskCandidate};

/// Logs a digest of the selected review set.
///
/// The structured fields are what operations dashboards filter on; this is
/// the audit trail for "why did the review flag these products".
pub struct ReviewLogSideEffect;

#[async_trait]
impl SideEffect<ReviewQuery, RiskCandidate> for ReviewLogSideEffect {
    async fn run(
        &self,
        input: Arc<SideEffectInput<ReviewQuery, RiskCandidate>>,
    ) -> Result<(), String> {
        let top_sku = input
            .selected_candidates
            .first()
            .map(|c| c.sku.as_str())
            .unwrap_or("-");
        tracing::info!(
            request_id = %input.query.request_id,
            client_id = %input.query.client_id,
            selected = input.selected_candidates.len(),
            top_sku,
            "risk review completed"
        );
        for candidate in &input.selected_candidates {
            tracing::debug!(
                sku = %candidate.sku,
                status = %candidate.health.status,
                risk = candidate.risk.score,
                priority = candidate.priority_score.unwrap_or(0.0),
                "selected candidate"
            );
        }
        Ok(())
    }
}
