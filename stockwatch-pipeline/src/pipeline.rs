use async_trait::async_trait;
use std::sync::Arc;

use crate::filter::Filter;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Outcome of one pipeline execution, with stage counts for observability.
#[derive(Clone, Debug)]
pub struct PipelineResult<C> {
    /// Candidates produced by all sources before filtering.
    pub retrieved: usize,
    /// Candidates surviving the filter stage.
    pub filtered: usize,
    pub selected: Vec<C>,
}

/// A staged candidate pipeline: sources produce, filters partition, scorers
/// assign priority, the selector sorts and truncates, and side effects run
/// afterward without blocking the result.
///
/// Implementations supply the concrete components; `execute` is the shared
/// driver.
#[async_trait]
pub trait ReviewPipeline<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn scorers(&self) -> &[Box<dyn Scorer<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<Q, C>>>>;

    /// Maximum number of candidates in the final result.
    fn result_size(&self) -> usize;

    /// Run the full pipeline for one query.
    ///
    /// Side effects are spawned onto the runtime and never block or fail the
    /// pipeline result; their errors are logged and dropped.
    async fn execute(&self, query: Q) -> Result<PipelineResult<C>, String> {
        let mut candidates: Vec<C> = Vec::new();
        for source in self.sources() {
            if !source.enable(&query) {
                continue;
            }
            let found = source.get_candidates(&query).await?;
            tracing::debug!(source = source.name(), count = found.len(), "source produced candidates");
            candidates.extend(found);
        }
        let retrieved = candidates.len();

        for filter in self.filters() {
            if !filter.enable(&query) {
                continue;
            }
            let result = filter.filter(&query, candidates).await?;
            tracing::debug!(
                filter = filter.name(),
                kept = result.kept.len(),
                removed = result.removed.len(),
                "filter applied"
            );
            candidates = result.kept;
        }
        let filtered = candidates.len();

        for scorer in self.scorers() {
            if !scorer.enable(&query) {
                continue;
            }
            let scored = scorer.score(&query, &candidates).await?;
            if scored.len() != candidates.len() {
                return Err(format!(
                    "scorer {} returned {} results for {} candidates",
                    scorer.name(),
                    scored.len(),
                    candidates.len()
                ));
            }
            for (candidate, s) in candidates.iter_mut().zip(scored) {
                scorer.update(candidate, s);
            }
        }

        let mut selected = self.selector().select(&query, candidates);
        selected.truncate(self.result_size());

        let side_effects = self.side_effects();
        if !side_effects.is_empty() {
            let input = Arc::new(SideEffectInput {
                query: Arc::new(query),
                selected_candidates: selected.clone(),
            });
            tokio::spawn(async move {
                for effect in side_effects.iter() {
                    if !effect.enable(Arc::clone(&input.query)) {
                        continue;
                    }
                    if let Err(e) = effect.run(Arc::clone(&input)).await {
                        tracing::warn!(side_effect = effect.name(), error = %e, "side effect failed");
                    }
                }
            });
        }

        Ok(PipelineResult {
            retrieved,
            filtered,
            selected,
        })
    }
}
