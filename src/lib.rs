//! Supplier evaluation scoring and reporting.
//!
//! Submissions are scored against a weight configuration, kept in a
//! session-scoped [`store::EvaluationStore`], and exported as PDF or CSV
//! through [`report::ReportRenderer`].

pub mod config;
pub mod entry;
pub mod export;
pub mod input;
pub mod output;
pub mod prompt;
pub mod report;
pub mod scoring;
pub mod store;
