//! TrustScan Runtime
//!
//! Runs every configured probe against one target concurrently and
//! folds the results into an [`AggregateReport`](trustscan_core::AggregateReport).

pub mod config;
pub mod orchestrator;

pub use config::*;
pub use orchestrator::*;
