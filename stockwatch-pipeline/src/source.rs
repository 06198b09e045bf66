use async_trait::async_trait;

use crate::util;

/// First pipeline stage: turns a review query into risk candidates.
///
/// A pipeline may register several sources (catalog assessment, cached
/// assessments, a remote feed); their outputs are concatenated before
/// filtering, so each source only answers for the products it knows about.
#[async_trait]
pub trait Source<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Produce this source's candidates for the query.
    async fn get_candidates(&self, query: &Q) -> Result<Vec<C>, String>;

    /// Whether this source applies to the query at all. A source with
    /// nothing in scope should opt out here rather than return an empty
    /// set, so stage logs reflect what actually ran.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Stable name used in stage logs.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
