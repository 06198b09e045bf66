use async_trait::async_trait;
use std::sync::Arc;

use crate::util;

/// What a side effect gets to see: the originating query and the final
/// selection, shared behind `Arc` because effects run on a spawned task
/// after the pipeline has already returned.
#[derive(Clone)]
pub struct SideEffectInput<Q, C> {
    pub query: Arc<Q>,
    pub selected_candidates: Vec<C>,
}

/// Last pipeline stage: follow-up work that must not touch the result.
///
/// Effects (review-digest logging, cache warming, notification queueing)
/// run after selection on their own task; a failing effect is logged by the
/// driver and never fails the review.
#[async_trait]
pub trait SideEffect<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Run the effect against the completed selection.
    async fn run(&self, input: Arc<SideEffectInput<Q, C>>) -> Result<(), String>;

    /// Whether this effect applies to the query.
    fn enable(&self, _query: Arc<Q>) -> bool {
        true
    }

    /// Stable name used in stage logs.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
