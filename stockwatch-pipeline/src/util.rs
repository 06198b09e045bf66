/// Trims a fully qualified type path down to the bare type name, for stage
/// logs: `stockwatch_pipeline::components::low_risk_filter::LowRiskFilter`
/// becomes `LowRiskFilter`.
pub fn short_type_name(full: &str) -> &str {
    match full.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
