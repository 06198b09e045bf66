use std::cmp::Ordering;

use crate::util;

/// Fourth pipeline stage: orders the scored candidates and caps the result.
///
/// Implementations only have to say how to read a priority out of a
/// candidate; ordering and truncation are shared.
pub trait Selector<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Priority used for ordering. Higher sorts first.
    fn score(&self, candidate: &C) -> f64;

    /// Result cap; `None` keeps every candidate.
    fn size(&self) -> Option<usize> {
        None
    }

    /// Sort descending by priority, then apply the cap.
    fn select(&self, _query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut selected = self.sort(candidates);
        if let Some(cap) = self.size() {
            selected.truncate(cap);
        }
        selected
    }

    /// Descending priority order. A candidate whose priority is NaN (no
    /// usage data, a scorer that never ran) sinks below every real
    /// priority; it must not surface at the top of a review.
    fn sort(&self, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = candidates;
        sorted.sort_by(|a, b| {
            let (sa, sb) = (self.score(a), self.score(b));
            match (sa.is_nan(), sb.is_nan()) {
                (false, false) => sb.partial_cmp(&sa).unwrap_or(Ordering::Equal),
                (a_nan, b_nan) => a_nan.cmp(&b_nan),
            }
        });
        sorted
    }

    /// Whether this selector applies to the query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Stable name used in stage logs.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
