//! Closed status enums derived by classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// BMI status bands, from most to least underweight.
///
/// One canonical six-band table is used everywhere classification occurs
/// (classifier, aggregator, growth ranking); `Underweight` is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiStatus {
    /// BMI below the severely-wasted cut point
    SeverelyWasted,
    /// BMI in the wasted band
    Wasted,
    /// BMI in the underweight band
    Underweight,
    /// BMI in the healthy band
    Normal,
    /// BMI in the overweight band
    Overweight,
    /// BMI at or above the obese cut point
    Obese,
}

impl fmt::Display for BmiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SeverelyWasted => "Severely Wasted",
            Self::Wasted => "Wasted",
            Self::Underweight => "Underweight",
            Self::Normal => "Normal",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        };
        write!(f, "{label}")
    }
}

/// Height-for-age status bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HfaStatus {
    /// Height below the severely-stunted cut point for the grade band
    SeverelyStunted,
    /// Height in the stunted band
    Stunted,
    /// Height in the expected band
    Normal,
    /// Height at or above the tall cut point
    Tall,
}

impl fmt::Display for HfaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SeverelyStunted => "Severely Stunted",
            Self::Stunted => "Stunted",
            Self::Normal => "Normal",
            Self::Tall => "Tall",
        };
        write!(f, "{label}")
    }
}
