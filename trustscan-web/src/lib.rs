//! TrustScan Web Layer
//!
//! Plain HTTP plumbing shared by the page-based probes:
//! - Browser-like client with bounded timeouts
//! - Page fetching and the reachability check
//! - Hyperlink and review-text extraction from markup

pub mod client;
pub mod links;
pub mod reviews;

pub use client::*;
pub use links::*;
pub use reviews::*;
