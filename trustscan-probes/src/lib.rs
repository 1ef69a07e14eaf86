//! TrustScan Probes
//!
//! Each probe turns one external signal into a normalized `[0, 1]` score:
//! - **TLS grade**: polls an asynchronous TLS grading service
//! - **Blacklist**: threat-intelligence lookup for the target URL
//! - **Domain age**: registration creation date, bucketed by years
//! - **Social presence**: social-platform links on the landing page
//! - **Review sentiment**: polarity of scraped customer reviews
//!
//! Probes never fail outward. Every transport, upstream or parse problem
//! becomes a `0.0` result with `detail.error` set.

pub mod traits;
pub mod fetch;
pub mod tls;
pub mod blacklist;
pub mod domain_age;
pub mod social;
pub mod reviews;

pub use traits::*;
pub use fetch::*;
pub use tls::*;
pub use blacklist::*;
pub use domain_age::*;
pub use social::*;
pub use reviews::*;
