//! Exploratory statistics for tabular retail-customer data
//!
//! Descriptive summaries and outlier flags, parametric and bootstrap confidence
//! intervals, two-sample t-tests, one-way ANOVA, Cohen's d, required sample
//! sizes and a sampling-distribution simulator for the Central Limit Theorem.
//!
//! Everything is a synchronous function over `f64` slices. Randomness is always
//! supplied by the caller as an `rand::Rng` or a seed.

// Error type shared by every module
pub mod error;

// Statistics functions and result types
pub mod stats;

// In-memory table with grouped summaries
pub mod dataset;

// Analysis defaults from files and environment
pub mod config;

// Config-driven runner
pub mod analyzer;

// Re-export core types
pub use analyzer::Analyzer;
pub use config::AnalysisConfig;
pub use dataset::{Column, Dataset, GroupSummary, QualityReport};
pub use error::{Error, Result};
pub use stats::{
    AnovaResult, BootstrapInterval, ConfidenceInterval, EffectMagnitude, HypothesisTestResult,
    IntervalComparison, OutlierMethod, SummaryStatistics,
};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
