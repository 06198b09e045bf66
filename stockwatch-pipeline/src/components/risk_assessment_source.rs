use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use stockwatch_core::config::EngineConfig;
use stockwatch_core::error::EngineError;
use stockwatch_core::risk::RiskScorer;
use stockwatch_core::seasonal::SeasonalPatternDetector;
use stockwatch_core::status::StockStatusClassifier;
use stockwatch_core::types::{
    PatternType, ProductSnapshot, TransactionRecord, UsageAggregate,
};

use crate::source::Source;
use crate::types::{ReviewQuery, RiskCandidate};

/// Upper bound on concurrent per-product assessments. Assessments touch the
/// full transaction history of a product, so an unbounded fan-out would
/// hammer the data layer on large catalogs.
pub const MAX_CONCURRENT_ASSESSMENTS: usize = 5;

/// Recent demand window, in days.
const RECENT_WINDOW_DAYS: i64 = 90;
/// Prior comparison window reaches back this far, in days.
const OLDER_WINDOW_DAYS: i64 = 180;

/// Source that assesses every product in scope: classifies stock health,
/// computes the composite risk score, and attaches the seasonal factor for
/// the query month. Assessments run concurrently under a semaphore; results
/// are recombined and sorted by SKU so output order is deterministic.
pub struct RiskAssessmentSource {
    products: Arc<Vec<ProductSnapshot>>,
    transactions_by_product: Arc<HashMap<String, Vec<TransactionRecord>>>,
    classifier: Arc<StockStatusClassifier>,
    scorer: Arc<RiskScorer>,
    detector: Arc<SeasonalPatternDetector>,
}

impl RiskAssessmentSource {
    pub fn new(products: Vec<ProductSnapshot>, transactions: Vec<TransactionRecord>) -> Self {
        Self::with_config(products, transactions, &EngineConfig::default())
    }

    pub fn with_config(
        products: Vec<ProductSnapshot>,
        transactions: Vec<TransactionRecord>,
        config: &EngineConfig,
    ) -> Self {
        let mut by_product: HashMap<String, Vec<TransactionRecord>> = HashMap::new();
        for txn in transactions {
            by_product.entry(txn.product_id.clone()).or_default().push(txn);
        }
        Self {
            products: Arc::new(products),
            transactions_by_product: Arc::new(by_product),
            classifier: Arc::new(StockStatusClassifier::new(config.classifier.clone())),
            scorer: Arc::new(RiskScorer::new(config.scoring.clone())),
            detector: Arc::new(SeasonalPatternDetector::new(config.seasonal.clone())),
        }
    }

    fn assess(
        classifier: &StockStatusClassifier,
        scorer: &RiskScorer,
        detector: &SeasonalPatternDetector,
        product: &ProductSnapshot,
        history: &[TransactionRecord],
        as_of: DateTime<Utc>,
    ) -> RiskCandidate {
        let recent_cutoff = as_of - Duration::days(RECENT_WINDOW_DAYS);
        let older_cutoff = as_of - Duration::days(OLDER_WINDOW_DAYS);
        let recent: Vec<TransactionRecord> = history
            .iter()
            .filter(|t| t.submitted_at > recent_cutoff && t.submitted_at <= as_of)
            .cloned()
            .collect();
        let older: Vec<TransactionRecord> = history
            .iter()
            .filter(|t| t.submitted_at > older_cutoff && t.submitted_at <= recent_cutoff)
            .cloned()
            .collect();

        let usage = UsageAggregate::from_transactions(history, RECENT_WINDOW_DAYS as u32, as_of);
        let health = classifier.classify(
            product.stock_units(),
            product.reorder_point,
            usage.avg_daily_units,
        );
        let risk = scorer.score(product, &usage, &recent, &older);

        let seasonal_factor = detector
            .detect(history, as_of)
            .into_iter()
            .find(|p| p.pattern_type == PatternType::Monthly)
            .and_then(|p| p.factor_for(as_of.month0()).map(|f| f.factor));

        RiskCandidate {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            health,
            risk,
            seasonal_factor,
            priority_score: None,
        }
    }
}

#[async_trait]
impl Source<ReviewQuery, RiskCandidate> for RiskAssessmentSource {
    fn enable(&self, _query: &ReviewQuery) -> bool {
        !self.products.is_empty()
    }

    async fn get_candidates(&self, query: &ReviewQuery) -> Result<Vec<RiskCandidate>, String> {
        // A scoped id that matches nothing is a caller mistake and must come
        // back as an error, not an empty review.
        if !query.product_ids.is_empty() {
            let known: HashSet<&str> = self.products.iter().map(|p| p.id.as_str()).collect();
            if let Some(missing) = query
                .product_ids
                .iter()
                .find(|id| !known.contains(id.as_str()))
            {
                return Err(EngineError::ProductNotFound(missing.clone()).to_string());
            }
        }

        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_ASSESSMENTS));
        let mut join_set = JoinSet::new();

        for product in self.products.iter() {
            if !query.product_ids.is_empty() && !query.product_ids.contains(&product.id) {
                continue;
            }
            let product = product.clone();
            let history = self
                .transactions_by_product
                .get(&product.id)
                .cloned()
                .unwrap_or_default();
            let classifier = Arc::clone(&self.classifier);
            let scorer = Arc::clone(&self.scorer);
            let detector = Arc::clone(&self.detector);
            let semaphore = Arc::clone(&semaphore);
            let as_of = query.as_of;

            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| e.to_string())?;
                Ok::<RiskCandidate, String>(Self::assess(
                    &classifier,
                    &scorer,
                    &detector,
                    &product,
                    &history,
                    as_of,
                ))
            });
        }

        let mut candidates = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            let candidate = joined.map_err(|e| format!("assessment task failed: {e}"))??;
            candidates.push(candidate);
        }
        // Completion order is nondeterministic under the semaphore.
        candidates.sort_by(|a, b| a.sku.cmp(&b.sku));
        Ok(candidates)
    }
}
