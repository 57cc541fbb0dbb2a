//! Feeding-program beneficiary eligibility
//!
//! Pure predicates over classification enums. Primary and secondary
//! eligibility are mutually exclusive so the same student is never
//! subsidized under both categories.

use crate::core::classify::ClassifiedStudent;
use crate::core::models::{BmiStatus, HfaStatus};

/// Beneficiary category a classified student qualifies for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeneficiaryCategory {
    /// Eligible due to poor BMI status
    Primary,
    /// Eligible due to poor height-for-age status (and not already primary)
    Secondary,
}

/// Whether a student qualifies as a primary beneficiary:
/// BMI status Severely Wasted or Wasted.
///
/// A student with no measurement is not a beneficiary; absence of data is
/// not treated as risk.
#[must_use]
pub fn is_primary(student: &ClassifiedStudent) -> bool {
    matches!(
        student.bmi_status,
        Some(BmiStatus::SeverelyWasted | BmiStatus::Wasted)
    )
}

/// Whether a student qualifies as a secondary beneficiary:
/// height-for-age status Severely Stunted or Stunted, excluding students who
/// are already primary.
#[must_use]
pub fn is_secondary(student: &ClassifiedStudent) -> bool {
    matches!(
        student.hfa_status,
        Some(HfaStatus::SeverelyStunted | HfaStatus::Stunted)
    ) && !is_primary(student)
}

/// The category a student qualifies for, if any
#[must_use]
pub fn category(student: &ClassifiedStudent) -> Option<BeneficiaryCategory> {
    if is_primary(student) {
        Some(BeneficiaryCategory::Primary)
    } else if is_secondary(student) {
        Some(BeneficiaryCategory::Secondary)
    } else {
        None
    }
}
