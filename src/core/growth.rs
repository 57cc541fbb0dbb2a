//! Growth outcome evaluation for feeding-program beneficiaries
//!
//! Compares a beneficiary's BMI status at enrollment against their latest
//! status and labels the trend. The verdict is only meaningful once the
//! program has ended; while a program is active the caller exposes
//! enrollment management instead. That branching is a caller concern.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::models::BmiStatus;

/// Trend label for a beneficiary's status change since enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthOutcome {
    /// Moved up the severity scale without leaving the healthy range
    Improved,
    /// Stayed at or fell below the enrollment status
    NoChangeOrDeclined,
    /// Feeding pushed the child past the healthy weight range
    Overdone,
    /// None of the other rules matched
    NoChange,
}

impl fmt::Display for GrowthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Improved => "Improved",
            Self::NoChangeOrDeclined => "No Change / Declined",
            Self::Overdone => "Overdone",
            Self::NoChange => "No Change",
        };
        write!(f, "{label}")
    }
}

/// Severity rank of a BMI status: SeverelyWasted(1) through Obese(6).
/// A missing/unknown status ranks 0.
#[must_use]
pub const fn severity_rank(status: Option<BmiStatus>) -> u8 {
    match status {
        None => 0,
        Some(BmiStatus::SeverelyWasted) => 1,
        Some(BmiStatus::Wasted) => 2,
        Some(BmiStatus::Underweight) => 3,
        Some(BmiStatus::Normal) => 4,
        Some(BmiStatus::Overweight) => 5,
        Some(BmiStatus::Obese) => 6,
    }
}

/// Rank of the Normal status, the top of the healthy range
const NORMAL_RANK: u8 = 4;

/// Label the trend between a beneficiary's baseline and current BMI status.
///
/// Ordered rules, first match wins:
/// 1. current Obese/Overweight is always `Overdone`;
/// 2. a rank increase that stays at or below Normal is `Improved`;
/// 3. no rank increase is `NoChangeOrDeclined`;
/// 4. a rank increase past Normal is `Overdone`;
/// 5. anything else is `NoChange`.
#[must_use]
pub const fn evaluate_growth(
    baseline: Option<BmiStatus>,
    current: Option<BmiStatus>,
) -> GrowthOutcome {
    if matches!(current, Some(BmiStatus::Obese | BmiStatus::Overweight)) {
        return GrowthOutcome::Overdone;
    }

    let baseline_rank = severity_rank(baseline);
    let current_rank = severity_rank(current);

    if current_rank > baseline_rank && current_rank <= NORMAL_RANK {
        GrowthOutcome::Improved
    } else if current_rank <= baseline_rank {
        GrowthOutcome::NoChangeOrDeclined
    } else if current_rank > NORMAL_RANK {
        GrowthOutcome::Overdone
    } else {
        GrowthOutcome::NoChange
    }
}
