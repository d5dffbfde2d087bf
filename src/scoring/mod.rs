//! Score aggregation
//!
//! Combines the three category rates into one overall score and a
//! recommendation band.
//!
//! # Scoring Formula
//!
//! ```text
//! Overall = Compatibility × 0.4 + Standards × 0.4 + Security × 0.2
//! ```
//!
//! The result is rounded to two decimals (ties to even) and kept within 0-100.
//!
//! # Recommendation
//!
//! - Any critical security issue: Critical, whatever the score
//! - 90 and above: Excellent
//! - 75 and above: Good
//! - 50 and above: Fair
//! - Below 50: Fail

mod aggregator;

pub use aggregator::{aggregate, recommend, round2, COMPATIBILITY_WEIGHT, SECURITY_WEIGHT, STANDARDS_WEIGHT};
