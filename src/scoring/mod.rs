//! Correlation and scoring modules.
//!
//! This module computes the derived metrics for a validated profile:
//! timeline synthesis, the business-health composite, the value-impact
//! correlation, and the pattern tags.

pub mod metrics;
pub mod timeline;

pub use metrics::score;
pub use timeline::build_timeline;
