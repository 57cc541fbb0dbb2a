//! Nutritional status classification
//!
//! Pure functions mapping a raw (weight, height) measurement to a BMI status
//! and a height-for-age status. Same inputs always produce the same status;
//! no hidden state.

use std::collections::HashMap;
use std::fmt;

use crate::core::models::{BmiStatus, HfaStatus, Measurement, Student};
use crate::core::thresholds::Thresholds;

/// Lowest BMI value accepted by the classifier. Anything below is treated as
/// sensor noise and rejected rather than recorded as a status.
pub const BMI_MIN_VALID: f64 = 5.0;
/// Highest BMI value accepted by the classifier.
pub const BMI_MAX_VALID: f64 = 100.0;

/// Rejection of an out-of-range weight, height, or BMI.
///
/// Out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Weight must be a positive number of kilograms
    NonPositiveWeight(f64),
    /// Height must be a positive number of centimeters
    NonPositiveHeight(f64),
    /// Computed BMI falls outside the sane human range
    BmiOutOfRange(f64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveWeight(w) => write!(f, "Invalid weight: {w} kg"),
            Self::NonPositiveHeight(h) => write!(f, "Invalid height: {h} cm"),
            Self::BmiOutOfRange(bmi) => write!(
                f,
                "BMI {bmi:.1} outside accepted range {BMI_MIN_VALID}-{BMI_MAX_VALID}"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A student joined with their latest measurement and derived statuses.
///
/// A student with no (valid) measurement has all derived fields `None`: they
/// are excluded from weighed/measured counts but still counted in enrollment.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedStudent {
    /// The underlying student record
    pub student: Student,
    /// Latest measurement used for classification, if any
    pub measurement: Option<Measurement>,
    /// Computed BMI from the latest measurement
    pub bmi: Option<f64>,
    /// Derived BMI status
    pub bmi_status: Option<BmiStatus>,
    /// Derived height-for-age status
    pub hfa_status: Option<HfaStatus>,
}

impl ClassifiedStudent {
    /// Create an unclassified entry for a student with no usable measurement
    #[must_use]
    pub const fn unmeasured(student: Student) -> Self {
        Self {
            student,
            measurement: None,
            bmi: None,
            bmi_status: None,
            hfa_status: None,
        }
    }
}

/// Compute BMI as `weight / height_m^2`
///
/// # Errors
/// Returns a [`ValidationError`] for non-positive weight or height.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Result<f64, ValidationError> {
    if weight_kg <= 0.0 || !weight_kg.is_finite() {
        return Err(ValidationError::NonPositiveWeight(weight_kg));
    }
    if height_cm <= 0.0 || !height_cm.is_finite() {
        return Err(ValidationError::NonPositiveHeight(height_cm));
    }
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// Map a BMI value to a status using the ordered band table
///
/// # Errors
/// Returns [`ValidationError::BmiOutOfRange`] when the value falls outside
/// the accepted human range, guarding against sensor noise.
pub fn classify_bmi(bmi: f64, thresholds: &Thresholds) -> Result<BmiStatus, ValidationError> {
    if !(BMI_MIN_VALID..=BMI_MAX_VALID).contains(&bmi) {
        return Err(ValidationError::BmiOutOfRange(bmi));
    }

    let bands = &thresholds.bmi;
    let status = if bmi < bands.severely_wasted_below {
        BmiStatus::SeverelyWasted
    } else if bmi < bands.wasted_below {
        BmiStatus::Wasted
    } else if bmi < bands.underweight_below {
        BmiStatus::Underweight
    } else if bmi < bands.normal_below {
        BmiStatus::Normal
    } else if bmi < bands.overweight_below {
        BmiStatus::Overweight
    } else {
        BmiStatus::Obese
    };
    Ok(status)
}

/// Map a height to a height-for-age status using the band configured for the
/// student's grade.
///
/// A grade with no configured band classifies `Normal` (default-safe): bands
/// that were never entered do not flag students.
#[must_use]
pub fn classify_height_for_age(thresholds: &Thresholds, grade: u8, height_cm: f64) -> HfaStatus {
    thresholds
        .hfa
        .band_for_grade(grade)
        .map_or(HfaStatus::Normal, |band| {
            if height_cm < band.severely_stunted_below {
                HfaStatus::SeverelyStunted
            } else if height_cm < band.stunted_below {
                HfaStatus::Stunted
            } else if height_cm >= band.tall_at_or_above {
                HfaStatus::Tall
            } else {
                HfaStatus::Normal
            }
        })
}

/// Classify a single student against one measurement
///
/// # Errors
/// Propagates the [`ValidationError`] when the measurement is out of range.
pub fn classify_measurement(
    student: &Student,
    measurement: &Measurement,
    thresholds: &Thresholds,
) -> Result<(f64, BmiStatus, HfaStatus), ValidationError> {
    let bmi = compute_bmi(measurement.weight_kg, measurement.height_cm)?;
    let bmi_status = classify_bmi(bmi, thresholds)?;
    let hfa_status = classify_height_for_age(thresholds, student.grade, measurement.height_cm);
    Ok((bmi, bmi_status, hfa_status))
}

/// Select the latest measurement per student (latest-wins).
///
/// Recency is `(taken_at, id)`: ties on timestamp go to the highest id, so
/// the result does not depend on insertion order.
#[must_use]
pub fn latest_measurements(measurements: &[Measurement]) -> HashMap<u32, &Measurement> {
    let mut latest: HashMap<u32, &Measurement> = HashMap::new();

    for m in measurements {
        latest
            .entry(m.student_id)
            .and_modify(|current| {
                if m.recency_key() > current.recency_key() {
                    *current = m;
                }
            })
            .or_insert(m);
    }

    latest
}

/// Classify a full roster of students against their latest measurements.
///
/// Students without a measurement stay unclassified (counted in enrollment,
/// excluded from measured metrics). Measurements that fail validation are
/// logged at warn level and likewise leave the student unclassified.
#[must_use]
pub fn classify_students(
    students: &[Student],
    measurements: &[Measurement],
    thresholds: &Thresholds,
) -> Vec<ClassifiedStudent> {
    let latest = latest_measurements(measurements);

    students
        .iter()
        .map(|student| {
            let Some(&measurement) = latest.get(&student.id) else {
                return ClassifiedStudent::unmeasured(student.clone());
            };

            match classify_measurement(student, measurement, thresholds) {
                Ok((bmi, bmi_status, hfa_status)) => ClassifiedStudent {
                    student: student.clone(),
                    measurement: Some(measurement.clone()),
                    bmi: Some(bmi),
                    bmi_status: Some(bmi_status),
                    hfa_status: Some(hfa_status),
                },
                Err(e) => {
                    crate::warn!(
                        "Rejecting measurement {} for student {}: {e}",
                        measurement.id,
                        student.id
                    );
                    ClassifiedStudent::unmeasured(student.clone())
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Sex;
    use crate::core::thresholds::HfaBand;
    use chrono::{TimeZone, Utc};

    fn student(id: u32, grade: u8) -> Student {
        Student::new(id, format!("Student {id}"), Sex::M, grade)
    }

    #[test]
    fn computes_bmi_from_kg_and_cm() {
        let bmi = compute_bmi(12.0, 95.0).expect("bmi");
        assert!((bmi - 13.296).abs() < 0.001);
    }

    #[test]
    fn rejects_non_positive_inputs() {
        assert!(matches!(
            compute_bmi(0.0, 95.0),
            Err(ValidationError::NonPositiveWeight(_))
        ));
        assert!(matches!(
            compute_bmi(12.0, -1.0),
            Err(ValidationError::NonPositiveHeight(_))
        ));
    }

    #[test]
    fn classifies_each_band_of_the_default_table() {
        let t = Thresholds::default();
        assert_eq!(classify_bmi(12.0, &t), Ok(BmiStatus::SeverelyWasted));
        assert_eq!(classify_bmi(13.3, &t), Ok(BmiStatus::Wasted));
        assert_eq!(classify_bmi(14.0, &t), Ok(BmiStatus::Underweight));
        assert_eq!(classify_bmi(16.0, &t), Ok(BmiStatus::Normal));
        assert_eq!(classify_bmi(19.0, &t), Ok(BmiStatus::Overweight));
        assert_eq!(classify_bmi(25.0, &t), Ok(BmiStatus::Obese));
    }

    #[test]
    fn band_edges_are_exclusive_upper_bounds() {
        let t = Thresholds::default();
        assert_eq!(classify_bmi(12.5, &t), Ok(BmiStatus::Wasted));
        assert_eq!(classify_bmi(18.5, &t), Ok(BmiStatus::Overweight));
        assert_eq!(classify_bmi(21.0, &t), Ok(BmiStatus::Obese));
    }

    #[test]
    fn rejects_bmi_outside_sane_range() {
        let t = Thresholds::default();
        assert!(matches!(
            classify_bmi(4.9, &t),
            Err(ValidationError::BmiOutOfRange(_))
        ));
        assert!(matches!(
            classify_bmi(101.0, &t),
            Err(ValidationError::BmiOutOfRange(_))
        ));
    }

    #[test]
    fn hfa_defaults_to_normal_without_a_band() {
        let t = Thresholds::default();
        assert_eq!(classify_height_for_age(&t, 1, 95.0), HfaStatus::Normal);
    }

    #[test]
    fn hfa_classifies_against_configured_band() {
        let mut t = Thresholds::default();
        t.hfa.set_band(
            3,
            HfaBand {
                severely_stunted_below: 105.0,
                stunted_below: 112.0,
                tall_at_or_above: 135.0,
            },
        );

        assert_eq!(
            classify_height_for_age(&t, 3, 100.0),
            HfaStatus::SeverelyStunted
        );
        assert_eq!(classify_height_for_age(&t, 3, 110.0), HfaStatus::Stunted);
        assert_eq!(classify_height_for_age(&t, 3, 120.0), HfaStatus::Normal);
        assert_eq!(classify_height_for_age(&t, 3, 140.0), HfaStatus::Tall);
        // Other grades still unconfigured
        assert_eq!(classify_height_for_age(&t, 4, 100.0), HfaStatus::Normal);
    }

    #[test]
    fn latest_wins_ignores_insertion_order() {
        let older = Measurement::new(1, 10, 20.0, 110.0, Utc.timestamp_opt(1_000, 0).unwrap());
        let newer = Measurement::new(2, 10, 24.0, 112.0, Utc.timestamp_opt(5_000, 0).unwrap());

        // Newest inserted first: sort by time must still win over insertion order
        let ms = [newer.clone(), older.clone()];
        let selected = latest_measurements(&ms);
        assert_eq!(selected.get(&10).map(|m| m.id), Some(2));

        let ms = [older, newer];
        let selected = latest_measurements(&ms);
        assert_eq!(selected.get(&10).map(|m| m.id), Some(2));
    }

    #[test]
    fn sub_second_differences_resolve_to_newest() {
        // Both readings fall in the same second; the later fraction must win
        // over the higher id
        let older = Measurement::new(9, 10, 20.0, 110.0, Utc.timestamp_opt(1_000, 100_000_000).unwrap());
        let newer = Measurement::new(2, 10, 24.0, 112.0, Utc.timestamp_opt(1_000, 900_000_000).unwrap());

        let ms = [older, newer];
        let selected = latest_measurements(&ms);
        assert_eq!(selected.get(&10).map(|m| m.id), Some(2));
    }

    #[test]
    fn timestamp_ties_resolve_to_highest_id() {
        let ts = Utc.timestamp_opt(1_000, 0).unwrap();
        let a = Measurement::new(5, 10, 20.0, 110.0, ts);
        let b = Measurement::new(9, 10, 24.0, 112.0, ts);

        let ms = [b.clone(), a.clone()];
        let selected = latest_measurements(&ms);
        assert_eq!(selected.get(&10).map(|m| m.id), Some(9));

        let ms = [a, b];
        let selected = latest_measurements(&ms);
        assert_eq!(selected.get(&10).map(|m| m.id), Some(9));
    }

    #[test]
    fn unmeasured_student_has_no_statuses() {
        let t = Thresholds::default();
        let classified = classify_students(&[student(1, 2)], &[], &t);
        assert_eq!(classified.len(), 1);
        assert!(classified[0].bmi_status.is_none());
        assert!(classified[0].hfa_status.is_none());
        assert!(classified[0].measurement.is_none());
    }

    #[test]
    fn invalid_measurement_leaves_student_unclassified() {
        let t = Thresholds::default();
        // 200 kg at 95 cm: BMI far above the accepted range
        let noisy = Measurement::new(1, 1, 200.0, 95.0, Utc.timestamp_opt(1_000, 0).unwrap());
        let classified = classify_students(&[student(1, 1)], &[noisy], &t);
        assert!(classified[0].bmi_status.is_none());
    }

    #[test]
    fn classification_is_deterministic() {
        let t = Thresholds::default();
        let m = Measurement::new(1, 1, 12.0, 95.0, Utc.timestamp_opt(1_000, 0).unwrap());
        let s = student(1, 1);
        let first = classify_measurement(&s, &m, &t).expect("classify");
        let second = classify_measurement(&s, &m, &t).expect("classify");
        assert_eq!(first, second);
    }
}
