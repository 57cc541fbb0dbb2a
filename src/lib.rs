//! Shared library for `Nutristat`
//! Contains the nutritional assessment core used by the CLI and by external
//! renderers/persistence layers.

pub mod config;
pub mod core;
pub mod logger;

pub use crate::core::aggregate::{CohortBucket, RateMetric, SexCount};
pub use crate::core::growth::GrowthOutcome;
pub use crate::core::models::{BmiStatus, HfaStatus, Measurement, Sex, Student};
pub use crate::core::report::{ReportFormat, ReportSnapshot, SnapshotBuilder};
pub use crate::core::thresholds::Thresholds;

/// Returns the current version of the `Nutristat` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
