//! Weight/height measurement model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single weight/height capture for a student.
///
/// A student may have many measurements; classification only ever uses the
/// most recent one per student (latest-wins). Timestamp ties are broken by
/// highest measurement id so selection stays deterministic regardless of
/// insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Store-assigned measurement id
    pub id: u32,
    /// Id of the measured student
    pub student_id: u32,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Capture timestamp
    pub taken_at: DateTime<Utc>,
}

impl Measurement {
    /// Create a new measurement
    #[must_use]
    pub const fn new(
        id: u32,
        student_id: u32,
        weight_kg: f64,
        height_cm: f64,
        taken_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            student_id,
            weight_kg,
            height_cm,
            taken_at,
        }
    }

    /// Ordering key for latest-wins selection: newest timestamp first,
    /// highest id on ties. Full timestamp precision, so sub-second
    /// differences still order correctly.
    #[must_use]
    pub const fn recency_key(&self) -> (DateTime<Utc>, u32) {
        (self.taken_at, self.id)
    }
}
