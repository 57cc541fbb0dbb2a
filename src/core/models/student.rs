//! Student model and sex normalization

use serde::{Deserialize, Serialize};

/// Grade code used for the SPED (special education, non-numeric) track
pub const SPED_GRADE: u8 = 7;

/// Biological sex as recorded for school nutrition reports.
///
/// Only two buckets are modeled. Free-text source values are normalized once
/// at the ingestion boundary via [`Sex::normalize`]; the rest of the crate
/// only ever sees this closed type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    /// Male
    M,
    /// Female
    F,
}

impl Sex {
    /// Strictly normalize a raw sex string.
    ///
    /// Accepts `"M"`/`"Male"` and `"F"`/`"Female"` (case-insensitive,
    /// surrounding whitespace ignored). Returns `None` for anything else.
    #[must_use]
    pub fn try_normalize(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Some(Self::M),
            "f" | "female" => Some(Self::F),
            _ => None,
        }
    }

    /// Normalize a raw sex string, coercing unrecognized values to `F`.
    ///
    /// The `F` fallback matches the behavior of the legacy system this crate
    /// replaces. It is kept for compatibility but made observable: callers
    /// get `recognized = false` back and the aggregator counts these rows in
    /// `CohortBucket::unrecognized_sex`.
    #[must_use]
    pub fn normalize(raw: &str) -> (Self, bool) {
        Self::try_normalize(raw).map_or_else(
            || {
                crate::warn!("Unrecognized sex value '{raw}', coercing to F");
                (Self::F, false)
            },
            |sex| (sex, true),
        )
    }
}

/// A student enrollment record.
///
/// Immutable reference data owned by the external store; the core only reads
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned student id
    pub id: u32,
    /// Student name
    pub name: String,
    /// Normalized sex
    pub sex: Sex,
    /// Grade level code: 0 = Kinder, 1-6 = Grade 1-6, 7 = SPED
    pub grade: u8,
    /// Whether the student is currently enrolled. Dropped students stay in
    /// the source data but are excluded from cohort aggregation.
    pub enrolled: bool,
    /// False when the source sex value was unrecognized and coerced to `F`.
    /// Carried so the aggregator can count the fallback per cohort instead
    /// of folding it in silently.
    #[serde(default = "default_true")]
    pub sex_recognized: bool,
}

const fn default_true() -> bool {
    true
}

impl Student {
    /// Create a new student record
    #[must_use]
    pub const fn new(id: u32, name: String, sex: Sex, grade: u8) -> Self {
        Self {
            id,
            name,
            sex,
            grade,
            enrolled: true,
            sex_recognized: true,
        }
    }

    /// Create a student from a raw sex string, normalizing at the boundary
    #[must_use]
    pub fn from_raw_sex(id: u32, name: String, raw_sex: &str, grade: u8) -> Self {
        let (sex, recognized) = Sex::normalize(raw_sex);
        Self {
            id,
            name,
            sex,
            grade,
            enrolled: true,
            sex_recognized: recognized,
        }
    }
}

/// Canonical display label for a grade code.
///
/// `Kinder`, `Grade 1`..`Grade 6`, `SPED`. Any code outside the canonical
/// mapping falls back to `Grade {n}` so unexpected data still lands in a
/// deterministic bucket instead of being dropped.
#[must_use]
pub fn grade_label(grade: u8) -> String {
    match grade {
        0 => "Kinder".to_string(),
        1..=6 => format!("Grade {grade}"),
        g if g == SPED_GRADE => "SPED".to_string(),
        g => {
            crate::warn!("Unknown grade code {g}, labeling as 'Grade {g}'");
            format!("Grade {g}")
        }
    }
}
