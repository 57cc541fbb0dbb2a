//! Report snapshot assembly
//!
//! Orchestrates classification and cohort aggregation into one immutable,
//! serializable payload handed to external renderers and persistence. The
//! snapshot is re-derivable at any time by re-running the pipeline against
//! current student/measurement data; regeneration on unchanged inputs is
//! identical except for the timestamp.

pub mod formats;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::aggregate::{aggregate_cohorts, CohortBucket};
use crate::core::classify::classify_students;
use crate::core::models::{Measurement, Student};
use crate::core::thresholds::Thresholds;

pub use formats::{JsonReporter, MarkdownReporter, OutputFormat, ReportGenerator};

/// Presentation format tag carried in the snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// All columns, per-sex breakdowns, and percentages
    #[default]
    Detailed,
    /// Condensed totals-only layout
    Simple,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "simple" => Ok(Self::Simple),
            _ => Err(format!("Unknown report format: {s}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detailed => write!(f, "detailed"),
            Self::Simple => write!(f, "simple"),
        }
    }
}

/// Immutable nutritional status report payload.
///
/// Consumed by renderers and persisted as opaque JSON; the shape is stable
/// and round-trips through JSON serialization without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    /// Presentation format chosen at generation time
    pub format: ReportFormat,
    /// Generation timestamp (UTC)
    pub generated_at: DateTime<Utc>,
    /// School name
    pub school_name: String,
    /// School year label
    pub school_year: String,
    /// Grade cohorts in canonical order, GRAND TOTAL last
    pub cohorts: Vec<CohortBucket>,
}

/// Builds report snapshots from raw student and measurement data.
///
/// Never mutates its inputs and succeeds on an empty roster (all-zero
/// cohorts, no division errors).
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    thresholds: Thresholds,
    school_name: String,
    school_year: String,
    format: ReportFormat,
}

impl SnapshotBuilder {
    /// Create a builder with the given threshold tables and school metadata
    #[must_use]
    pub const fn new(thresholds: Thresholds, school_name: String, school_year: String) -> Self {
        Self {
            thresholds,
            school_name,
            school_year,
            format: ReportFormat::Detailed,
        }
    }

    /// Choose the presentation format tag (default: detailed)
    #[must_use]
    pub const fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Run classification and aggregation and assemble a snapshot
    #[must_use]
    pub fn build(&self, students: &[Student], measurements: &[Measurement]) -> ReportSnapshot {
        let classified = classify_students(students, measurements, &self.thresholds);
        let cohorts = aggregate_cohorts(&classified);

        ReportSnapshot {
            format: self.format,
            generated_at: Utc::now(),
            school_name: self.school_name.clone(),
            school_year: self.school_year.clone(),
            cohorts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Sex;
    use chrono::TimeZone;

    fn sample_inputs() -> (Vec<Student>, Vec<Measurement>) {
        let students = vec![
            Student::new(1, "Ana".to_string(), Sex::F, 0),
            Student::new(2, "Ben".to_string(), Sex::M, 1),
            Student::new(3, "Carla".to_string(), Sex::F, 1),
        ];
        let measurements = vec![
            Measurement::new(1, 1, 14.0, 100.0, Utc.timestamp_opt(1_000, 0).unwrap()),
            Measurement::new(2, 2, 12.0, 95.0, Utc.timestamp_opt(2_000, 0).unwrap()),
        ];
        (students, measurements)
    }

    fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new(
            Thresholds::default(),
            "Test Elementary".to_string(),
            "2025-2026".to_string(),
        )
    }

    #[test]
    fn builds_snapshot_with_metadata() {
        let (students, measurements) = sample_inputs();
        let snapshot = builder().build(&students, &measurements);

        assert_eq!(snapshot.school_name, "Test Elementary");
        assert_eq!(snapshot.school_year, "2025-2026");
        assert_eq!(snapshot.format, ReportFormat::Detailed);
        assert_eq!(snapshot.cohorts.last().unwrap().label, "GRAND TOTAL");
    }

    #[test]
    fn empty_roster_still_builds() {
        let snapshot = builder().build(&[], &[]);
        assert_eq!(snapshot.cohorts.len(), 9);
        assert_eq!(snapshot.cohorts.last().unwrap().enrollment.total, 0);
    }

    #[test]
    fn regeneration_is_idempotent_except_timestamp() {
        let (students, measurements) = sample_inputs();
        let b = builder();

        let first = b.build(&students, &measurements);
        let second = b.build(&students, &measurements);

        assert_eq!(first.cohorts, second.cohorts);
        assert_eq!(first.school_name, second.school_name);
    }

    #[test]
    fn build_does_not_mutate_inputs() {
        let (students, measurements) = sample_inputs();
        let students_before = students.clone();
        let measurements_before = measurements.clone();

        let _ = builder().build(&students, &measurements);

        assert_eq!(students, students_before);
        assert_eq!(measurements, measurements_before);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let (students, measurements) = sample_inputs();
        let snapshot = builder()
            .with_format(ReportFormat::Simple)
            .build(&students, &measurements);

        let json = serde_json::to_string(&snapshot).expect("serialize snapshot");
        let restored: ReportSnapshot = serde_json::from_str(&json).expect("deserialize snapshot");

        assert_eq!(snapshot, restored);
    }

    #[test]
    fn report_format_parses_and_displays() {
        assert_eq!("detailed".parse::<ReportFormat>(), Ok(ReportFormat::Detailed));
        assert_eq!("Simple".parse::<ReportFormat>(), Ok(ReportFormat::Simple));
        assert!("pdf".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::Simple.to_string(), "simple");
    }
}
