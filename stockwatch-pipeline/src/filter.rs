use async_trait::async_trait;

use crate::util;

/// Outcome of one filter pass. The removed side is kept (not dropped on the
/// floor) so stage logs can say how many candidates each filter cut.
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

/// Second pipeline stage: cuts candidates that are not worth reviewing.
///
/// Filters run in registration order, each consuming the previous filter's
/// kept set. A filter must not reorder or rescore candidates; that belongs
/// to the scorer and selector stages.
#[async_trait]
pub trait Filter<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Split the candidates into kept and removed.
    async fn filter(&self, query: &Q, candidates: Vec<C>) -> Result<FilterResult<C>, String>;

    /// Whether this filter applies to the query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Stable name used in stage logs.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
