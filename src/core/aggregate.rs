//! Cohort aggregation
//!
//! Groups classified students into grade-level cohorts and computes per-sex
//! counts, rates, and beneficiary totals, followed by a synthetic GRAND TOTAL
//! cohort. This is the single canonical implementation of the grouping and
//! summation logic used by every report surface.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::beneficiary::{category, BeneficiaryCategory};
use crate::core::classify::ClassifiedStudent;
use crate::core::models::{grade_label, BmiStatus, HfaStatus, Sex, SPED_GRADE};

/// Label of the synthetic cohort summing all grade buckets
pub const GRAND_TOTAL_LABEL: &str = "GRAND TOTAL";

/// Per-sex counter triple. `total` always equals `m + f` by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SexCount {
    /// Male count
    pub m: u32,
    /// Female count
    pub f: u32,
    /// Combined count
    pub total: u32,
}

impl SexCount {
    /// Increment the counter for one student of the given sex
    pub fn record(&mut self, sex: Sex) {
        match sex {
            Sex::M => self.m += 1,
            Sex::F => self.f += 1,
        }
        self.total += 1;
    }

    /// Add another counter componentwise
    pub fn merge(&mut self, other: Self) {
        self.m += other.m;
        self.f += other.f;
        self.total += other.total;
    }

    /// Componentwise sum of two counters
    #[must_use]
    pub const fn plus(self, other: Self) -> Self {
        Self {
            m: self.m + other.m,
            f: self.f + other.f,
            total: self.total + other.total,
        }
    }
}

/// A sex-count with a percentage of the cohort's measured pupils.
///
/// `percent` is `count.total / denominator * 100` rounded to one decimal, or
/// `0.0` when the denominator is zero. It is always recomputed from the
/// owning cohort's own totals, never averaged from child cohorts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateMetric {
    /// Per-sex counts for this metric
    #[serde(flatten)]
    pub count: SexCount,
    /// Share of the cohort denominator, 0-100 with one decimal
    pub percent: f64,
}

impl RateMetric {
    /// Increment the counter for one student of the given sex
    pub fn record(&mut self, sex: Sex) {
        self.count.record(sex);
    }

    /// Add another metric's counts componentwise (percent is recomputed later)
    pub fn merge(&mut self, other: &Self) {
        self.count.merge(other.count);
    }

    /// Recompute `percent` against a denominator, guarding zero division
    pub fn recompute_percent(&mut self, denominator: u32) {
        self.percent = if denominator == 0 {
            0.0
        } else {
            let raw = f64::from(self.count.total) / f64::from(denominator) * 100.0;
            (raw * 10.0).round() / 10.0
        };
    }
}

/// BMI sub-metrics of one cohort
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BmiCohortMetrics {
    /// Students with a valid latest measurement
    pub pupils_weighed: SexCount,
    /// Severely wasted students
    pub severely_wasted: RateMetric,
    /// Wasted students
    pub wasted: RateMetric,
    /// Underweight students
    pub underweight: RateMetric,
    /// Students in the healthy BMI band
    pub normal: RateMetric,
    /// Overweight students
    pub overweight: RateMetric,
    /// Obese students
    pub obese: RateMetric,
}

impl BmiCohortMetrics {
    fn metric_for(&mut self, status: BmiStatus) -> &mut RateMetric {
        match status {
            BmiStatus::SeverelyWasted => &mut self.severely_wasted,
            BmiStatus::Wasted => &mut self.wasted,
            BmiStatus::Underweight => &mut self.underweight,
            BmiStatus::Normal => &mut self.normal,
            BmiStatus::Overweight => &mut self.overweight,
            BmiStatus::Obese => &mut self.obese,
        }
    }

    fn merge(&mut self, other: &Self) {
        self.pupils_weighed.merge(other.pupils_weighed);
        self.severely_wasted.merge(&other.severely_wasted);
        self.wasted.merge(&other.wasted);
        self.underweight.merge(&other.underweight);
        self.normal.merge(&other.normal);
        self.overweight.merge(&other.overweight);
        self.obese.merge(&other.obese);
    }

    fn recompute_percents(&mut self) {
        let denom = self.pupils_weighed.total;
        self.severely_wasted.recompute_percent(denom);
        self.wasted.recompute_percent(denom);
        self.underweight.recompute_percent(denom);
        self.normal.recompute_percent(denom);
        self.overweight.recompute_percent(denom);
        self.obese.recompute_percent(denom);
    }
}

/// Height-for-age sub-metrics of one cohort
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HfaCohortMetrics {
    /// Students with a valid latest height measurement
    pub pupils_taken_height: SexCount,
    /// Severely stunted students
    pub severely_stunted: RateMetric,
    /// Stunted students
    pub stunted: RateMetric,
    /// Severely stunted students who are not also wasted (secondary pool)
    pub severely_stunted_excluding_wasted: RateMetric,
    /// Stunted students who are not also wasted (secondary pool)
    pub stunted_excluding_wasted: RateMetric,
    /// Students in the expected height band
    pub normal: RateMetric,
    /// Students at or above the tall cut point
    pub tall: RateMetric,
}

impl HfaCohortMetrics {
    fn metric_for(&mut self, status: HfaStatus) -> &mut RateMetric {
        match status {
            HfaStatus::SeverelyStunted => &mut self.severely_stunted,
            HfaStatus::Stunted => &mut self.stunted,
            HfaStatus::Normal => &mut self.normal,
            HfaStatus::Tall => &mut self.tall,
        }
    }

    fn merge(&mut self, other: &Self) {
        self.pupils_taken_height.merge(other.pupils_taken_height);
        self.severely_stunted.merge(&other.severely_stunted);
        self.stunted.merge(&other.stunted);
        self.severely_stunted_excluding_wasted
            .merge(&other.severely_stunted_excluding_wasted);
        self.stunted_excluding_wasted
            .merge(&other.stunted_excluding_wasted);
        self.normal.merge(&other.normal);
        self.tall.merge(&other.tall);
    }

    fn recompute_percents(&mut self) {
        let denom = self.pupils_taken_height.total;
        self.severely_stunted.recompute_percent(denom);
        self.stunted.recompute_percent(denom);
        self.severely_stunted_excluding_wasted
            .recompute_percent(denom);
        self.stunted_excluding_wasted.recompute_percent(denom);
        self.normal.recompute_percent(denom);
        self.tall.recompute_percent(denom);
    }
}

/// One grade-level cohort (or the GRAND TOTAL cohort)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortBucket {
    /// Grade code; `None` for the GRAND TOTAL bucket
    pub grade: Option<u8>,
    /// Display label (`Kinder`, `Grade 1`.., `SPED`, `GRAND TOTAL`)
    pub label: String,
    /// All enrolled students, measured or not
    pub enrollment: SexCount,
    /// Rows whose source sex value was unrecognized and coerced to F
    pub unrecognized_sex: u32,
    /// BMI sub-metrics
    pub bmi: BmiCohortMetrics,
    /// Height-for-age sub-metrics
    pub hfa: HfaCohortMetrics,
    /// Students eligible for feeding support due to poor BMI
    pub primary_beneficiaries: SexCount,
    /// Students eligible due to poor height-for-age, excluding primaries
    pub secondary_beneficiaries: SexCount,
    /// Componentwise sum of primary and secondary
    pub total_beneficiaries: SexCount,
}

impl CohortBucket {
    /// Create an empty bucket for a grade code
    #[must_use]
    pub fn for_grade(grade: u8) -> Self {
        Self {
            grade: Some(grade),
            label: grade_label(grade),
            ..Self::default()
        }
    }

    /// Create the empty GRAND TOTAL bucket
    #[must_use]
    pub fn grand_total() -> Self {
        Self {
            grade: None,
            label: GRAND_TOTAL_LABEL.to_string(),
            ..Self::default()
        }
    }

    /// Fold one classified student into this bucket
    fn record(&mut self, student: &ClassifiedStudent) {
        let sex = student.student.sex;

        self.enrollment.record(sex);
        if !student.student.sex_recognized {
            self.unrecognized_sex += 1;
        }

        if let Some(bmi_status) = student.bmi_status {
            self.bmi.pupils_weighed.record(sex);
            self.bmi.metric_for(bmi_status).record(sex);
        }

        if let Some(hfa_status) = student.hfa_status {
            self.hfa.pupils_taken_height.record(sex);
            self.hfa.metric_for(hfa_status).record(sex);

            // The excluding-wasted splits feed the secondary beneficiary pool
            let wasted = matches!(
                student.bmi_status,
                Some(BmiStatus::SeverelyWasted | BmiStatus::Wasted)
            );
            if !wasted {
                match hfa_status {
                    HfaStatus::SeverelyStunted => {
                        self.hfa.severely_stunted_excluding_wasted.record(sex);
                    }
                    HfaStatus::Stunted => self.hfa.stunted_excluding_wasted.record(sex),
                    HfaStatus::Normal | HfaStatus::Tall => {}
                }
            }
        }

        match category(student) {
            Some(BeneficiaryCategory::Primary) => self.primary_beneficiaries.record(sex),
            Some(BeneficiaryCategory::Secondary) => self.secondary_beneficiaries.record(sex),
            None => {}
        }
    }

    /// Add another bucket's counts componentwise (percents are recomputed later)
    fn merge(&mut self, other: &Self) {
        self.enrollment.merge(other.enrollment);
        self.unrecognized_sex += other.unrecognized_sex;
        self.bmi.merge(&other.bmi);
        self.hfa.merge(&other.hfa);
        self.primary_beneficiaries.merge(other.primary_beneficiaries);
        self.secondary_beneficiaries
            .merge(other.secondary_beneficiaries);
    }

    /// Recompute percentages from this bucket's own totals and derive the
    /// beneficiary total
    fn finalize(&mut self) {
        self.bmi.recompute_percents();
        self.hfa.recompute_percents();
        self.total_beneficiaries = self
            .primary_beneficiaries
            .plus(self.secondary_beneficiaries);
    }
}

/// Group classified students into grade-level cohorts plus a GRAND TOTAL.
///
/// Only currently enrolled students count; dropped students stay in the
/// source data but appear in no cohort. The canonical grades (Kinder,
/// Grade 1-6, SPED) are always present, even when empty, so an empty roster
/// still produces all-zero buckets. Unknown grade codes get their own
/// deterministic fallback bucket rather than being dropped. The GRAND TOTAL
/// bucket is the field-wise sum of every grade bucket with its own
/// percentages recomputed from its own totals.
#[must_use]
pub fn aggregate_cohorts(students: &[ClassifiedStudent]) -> Vec<CohortBucket> {
    let mut buckets: BTreeMap<u8, CohortBucket> = (0..=SPED_GRADE)
        .map(|grade| (grade, CohortBucket::for_grade(grade)))
        .collect();

    for student in students {
        if !student.student.enrolled {
            continue;
        }
        let grade = student.student.grade;
        buckets
            .entry(grade)
            .or_insert_with(|| CohortBucket::for_grade(grade))
            .record(student);
    }

    let mut grand = CohortBucket::grand_total();
    let mut cohorts: Vec<CohortBucket> = buckets
        .into_values()
        .map(|mut bucket| {
            grand.merge(&bucket);
            bucket.finalize();
            bucket
        })
        .collect();

    grand.finalize();
    cohorts.push(grand);
    cohorts
}
