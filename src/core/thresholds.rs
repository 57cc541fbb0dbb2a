//! BMI and height-for-age threshold tables
//!
//! The cut points are configuration, not clinical guarantees: the observed
//! deployment uses fixed BMI-value bands rather than WHO z-scores, and this
//! crate deliberately preserves that simplification. Tables are named and
//! testable, and can be overridden from a TOML file referenced by
//! `paths.thresholds_file` in the app config.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default cut point below which a BMI classifies as Severely Wasted
pub const DEFAULT_SEVERELY_WASTED_BELOW: f64 = 12.5;
/// Default cut point below which a BMI classifies as Wasted
pub const DEFAULT_WASTED_BELOW: f64 = 13.5;
/// Default cut point below which a BMI classifies as Underweight
pub const DEFAULT_UNDERWEIGHT_BELOW: f64 = 14.9;
/// Default cut point below which a BMI classifies as Normal
pub const DEFAULT_NORMAL_BELOW: f64 = 18.5;
/// Default cut point below which a BMI classifies as Overweight (at or above: Obese)
pub const DEFAULT_OVERWEIGHT_BELOW: f64 = 21.0;

/// Ordered BMI band table.
///
/// Bands are age/sex-invariant. Each field is the exclusive upper bound of
/// its band; a BMI at or above `overweight_below` classifies as Obese.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BmiThresholds {
    /// Below this: Severely Wasted
    pub severely_wasted_below: f64,
    /// Below this: Wasted
    pub wasted_below: f64,
    /// Below this: Underweight
    pub underweight_below: f64,
    /// Below this: Normal
    pub normal_below: f64,
    /// Below this: Overweight; at or above: Obese
    pub overweight_below: f64,
}

impl Default for BmiThresholds {
    fn default() -> Self {
        Self {
            severely_wasted_below: DEFAULT_SEVERELY_WASTED_BELOW,
            wasted_below: DEFAULT_WASTED_BELOW,
            underweight_below: DEFAULT_UNDERWEIGHT_BELOW,
            normal_below: DEFAULT_NORMAL_BELOW,
            overweight_below: DEFAULT_OVERWEIGHT_BELOW,
        }
    }
}

impl BmiThresholds {
    /// Validate that cut points are strictly ascending
    ///
    /// # Errors
    /// Returns an error naming the first out-of-order pair.
    pub fn validate(&self) -> Result<(), String> {
        let ordered = [
            ("severely_wasted_below", self.severely_wasted_below),
            ("wasted_below", self.wasted_below),
            ("underweight_below", self.underweight_below),
            ("normal_below", self.normal_below),
            ("overweight_below", self.overweight_below),
        ];

        for pair in ordered.windows(2) {
            let (lo_name, lo) = pair[0];
            let (hi_name, hi) = pair[1];
            if lo >= hi {
                return Err(format!(
                    "BMI thresholds out of order: {lo_name} ({lo}) must be below {hi_name} ({hi})"
                ));
            }
        }
        Ok(())
    }
}

/// Height cut points (cm) for one grade band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HfaBand {
    /// Below this height: Severely Stunted
    pub severely_stunted_below: f64,
    /// Below this height: Stunted
    pub stunted_below: f64,
    /// At or above this height: Tall
    pub tall_at_or_above: f64,
}

impl HfaBand {
    /// Validate that cut points are strictly ascending
    ///
    /// # Errors
    /// Returns an error if the band is internally inconsistent.
    pub fn validate(&self) -> Result<(), String> {
        if self.severely_stunted_below >= self.stunted_below
            || self.stunted_below >= self.tall_at_or_above
        {
            return Err(format!(
                "HFA band out of order: {} < {} < {} required",
                self.severely_stunted_below, self.stunted_below, self.tall_at_or_above
            ));
        }
        Ok(())
    }
}

/// Height-for-age threshold table, keyed by grade code.
///
/// Grades with no configured band classify as Normal (default-safe): the
/// observed system never flags students in bands that were not entered. The
/// table is therefore empty by default and deployments supply bands via the
/// thresholds TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HfaThresholds {
    /// Bands keyed by grade code as a string (TOML table keys are strings)
    #[serde(default)]
    pub bands: BTreeMap<String, HfaBand>,
}

impl HfaThresholds {
    /// Look up the band configured for a grade code, if any
    #[must_use]
    pub fn band_for_grade(&self, grade: u8) -> Option<&HfaBand> {
        self.bands.get(&grade.to_string())
    }

    /// Insert a band for a grade code
    pub fn set_band(&mut self, grade: u8, band: HfaBand) {
        self.bands.insert(grade.to_string(), band);
    }

    /// Validate every configured band
    ///
    /// # Errors
    /// Returns an error naming the first inconsistent grade band.
    pub fn validate(&self) -> Result<(), String> {
        for (grade, band) in &self.bands {
            band.validate()
                .map_err(|e| format!("grade {grade}: {e}"))?;
        }
        Ok(())
    }
}

/// Combined classification threshold tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// BMI band table
    #[serde(default)]
    pub bmi: BmiThresholds,
    /// Height-for-age band table
    #[serde(default)]
    pub hfa: HfaThresholds,
}

impl Thresholds {
    /// Parse threshold tables from a TOML string
    ///
    /// # Errors
    /// Returns an error if the TOML cannot be parsed or the cut points are
    /// out of order.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let thresholds: Self =
            toml::from_str(toml_str).map_err(|e| format!("Invalid thresholds TOML: {e}"))?;
        thresholds.bmi.validate()?;
        thresholds.hfa.validate()?;
        Ok(thresholds)
    }

    /// Load threshold tables from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read {}: {e}", path.as_ref().display()))?;
        Self::from_toml(&content)
    }
}
