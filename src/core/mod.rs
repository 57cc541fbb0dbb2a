//! Core nutritional assessment engine
//!
//! Pure classification, aggregation, and reporting logic with no I/O except
//! the CSV ingest helpers. Everything here is usable from the CLI or as a
//! library.

pub mod aggregate;
pub mod beneficiary;
pub mod classify;
pub mod growth;
pub mod ingest;
pub mod models;
pub mod report;
pub mod thresholds;

pub use aggregate::{aggregate_cohorts, CohortBucket, RateMetric, SexCount, GRAND_TOTAL_LABEL};
pub use beneficiary::BeneficiaryCategory;
pub use classify::{classify_students, ClassifiedStudent};
pub use growth::{evaluate_growth, GrowthOutcome};
pub use thresholds::Thresholds;
