use async_trait::async_trait;

use crate::util;

/// Third pipeline stage: assigns or adjusts priority.
///
/// Scorers run in registration order over the surviving candidates. Each
/// one returns a scored copy per input (same order, same length; the driver
/// rejects a mismatch) and then writes only its own fields back through
/// [`Scorer::update`]. That split lets a later scorer read what an earlier
/// one wrote, as the seasonal-context scorer does with the base priority.
#[async_trait]
pub trait Scorer<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Score every candidate, one output per input, order preserved.
    async fn score(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy this scorer's fields from the scored copy onto the candidate.
    fn update(&self, candidate: &mut C, scored: C);

    /// Whether this scorer applies to the query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Stable name used in stage logs.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
