use async_trait::async_trait;
use std::sync::Arc;

use stockwatch_core::config::EngineConfig;
use stockwatch_core::types::{ProductSnapshot, TransactionRecord};

use crate::components::low_risk_filter::LowRiskFilter;
use crate::components::review_log_side_effect::ReviewLogSideEffect;
use crate::components::risk_assessment_source::RiskAssessmentSource;
use crate::components::risk_priority_scorer::RiskPriorityScorer;
use crate::components::seasonal_context_scorer::SeasonalContextScorer;
use crate::components::top_risk_selector::TopRiskSelector;
use crate::filter::Filter;
use crate::pipeline::ReviewPipeline;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{ReviewQuery, RiskCandidate};

/// The standard catalog risk review.
///
/// Pipeline flow:
/// 1. RiskAssessmentSource classifies and scores every product in scope
/// 2. LowRiskFilter drops anything under the minimum score
/// 3. RiskPriorityScorer turns risk plus stock status into a priority
/// 4. SeasonalContextScorer adjusts for expected seasonal peaks/troughs
/// 5. TopRiskSelector keeps the top N by priority
/// 6. ReviewLogSideEffect records the review digest
pub struct RiskReviewPipeline {
    sources: Vec<Box<dyn Source<ReviewQuery, RiskCandidate>>>,
    filters: Vec<Box<dyn Filter<ReviewQuery, RiskCandidate>>>,
    scorers: Vec<Box<dyn Scorer<ReviewQuery, RiskCandidate>>>,
    selector: TopRiskSelector,
    side_effects: Arc<Vec<Box<dyn SideEffect<ReviewQuery, RiskCandidate>>>>,
    result_size: usize,
}

impl RiskReviewPipeline {
    /// Build the pipeline over a catalog with default configuration.
    pub fn new(products: Vec<ProductSnapshot>, transactions: Vec<TransactionRecord>) -> Self {
        Self::with_config_and_size(products, transactions, &EngineConfig::default(), 10)
    }

    pub fn with_config_and_size(
        products: Vec<ProductSnapshot>,
        transactions: Vec<TransactionRecord>,
        config: &EngineConfig,
        result_size: usize,
    ) -> Self {
        let sources: Vec<Box<dyn Source<ReviewQuery, RiskCandidate>>> = vec![Box::new(
            RiskAssessmentSource::with_config(products, transactions, config),
        )];
        let filters: Vec<Box<dyn Filter<ReviewQuery, RiskCandidate>>> =
            vec![Box::new(LowRiskFilter::default())];
        let scorers: Vec<Box<dyn Scorer<ReviewQuery, RiskCandidate>>> = vec![
            Box::new(RiskPriorityScorer),
            Box::new(SeasonalContextScorer),
        ];
        let selector = TopRiskSelector { k: result_size };
        let side_effects: Arc<Vec<Box<dyn SideEffect<ReviewQuery, RiskCandidate>>>> =
            Arc::new(vec![Box::new(ReviewLogSideEffect)]);

        Self {
            sources,
            filters,
            scorers,
            selector,
            side_effects,
            result_size,
        }
    }
}

#[async_trait]
impl ReviewPipeline<ReviewQuery, RiskCandidate> for RiskReviewPipeline {
    fn sources(&self) -> &[Box<dyn Source<ReviewQuery, RiskCandidate>>] {
        &self.sources
    }

    fn filters(&self) -> &[Box<dyn Filter<ReviewQuery, RiskCandidate>>] {
        &self.filters
    }

    fn scorers(&self) -> &[Box<dyn Scorer<ReviewQuery, RiskCandidate>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<ReviewQuery, RiskCandidate> {
        &self.selector
    }

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<ReviewQuery, RiskCandidate>>>> {
        Arc::clone(&self.side_effects)
    }

    fn result_size(&self) -> usize {
        self.result_size
    }
}
