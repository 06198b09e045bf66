//! Async risk review pipeline over the core engine.
//!
//! The pipeline follows a staged candidate architecture: sources produce
//! candidates, filters partition them, scorers assign priority, a selector
//! sorts and truncates, and side effects run after selection without
//! affecting the result. Each stage is a trait so pipelines can be rewired
//! per deployment.
//!
//! This crate also owns the CSV loaders and the pre-import impact analysis,
//! which projects what a proposed catalog import would do to stock health
//! and open alerts without mutating anything.

pub mod catalog_loader;
pub mod components;
pub mod filter;
pub mod import_analysis;
pub mod import_diff;
pub mod import_loader;
pub mod pipeline;
pub mod pipelines;
pub mod scorer;
pub mod selector;
pub mod side_effect;
pub mod source;
pub mod types;
pub mod util;
