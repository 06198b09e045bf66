pub mod low_risk_filter;
pub mod review_log_side_effect;
pub mod risk_assessment_source;
pub mod risk_priority_scorer;
pub mod seasonal_context_scorer;
pub mod top_risk_selector;
