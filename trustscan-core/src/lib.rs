//! TrustScan Core - Probe results and scoring rules for website trust checks
//!
//! This crate provides the foundational primitives:
//! - Probe identities, results and the aggregate report
//! - Target normalization (URL, host, bare domain)
//! - Pure scoring tables (TLS grade, domain age)
//! - Review-line filtering and lexicon polarity
//! - Social-platform link patterns

pub mod probe;
pub mod report;
pub mod target;
pub mod scoring;
pub mod reviews;
pub mod sentiment;
pub mod social;

pub use probe::*;
pub use report::*;
pub use target::*;
pub use scoring::*;
pub use reviews::*;
pub use sentiment::*;
pub use social::*;

/// Lowest score a probe can produce
pub const MIN_SCORE: f64 = 0.0;

/// Highest score a probe can produce
pub const MAX_SCORE: f64 = 1.0;

/// Score for a mixed or intermediate signal
pub const NEUTRAL_SCORE: f64 = 0.5;
