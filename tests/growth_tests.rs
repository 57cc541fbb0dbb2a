//! Integration tests for beneficiary eligibility and growth evaluation

use std::io::Write;
use tempfile::NamedTempFile;

use nutristat::core::beneficiary::{category, BeneficiaryCategory};
use nutristat::core::classify::classify_students;
use nutristat::core::growth::{evaluate_growth, GrowthOutcome};
use nutristat::core::ingest::{load_beneficiaries, load_measurements, load_students};
use nutristat::core::models::BmiStatus;
use nutristat::core::thresholds::Thresholds;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write csv");
    file
}

#[test]
fn wasted_students_are_primary_beneficiaries() {
    let students_csv = write_csv(
        "id,name,sex,grade\n\
         1,Ana Cruz,F,1\n\
         2,Ben Reyes,M,1\n",
    );
    let measurements_csv = write_csv(
        "id,student_id,weight_kg,height_cm,taken_at\n\
         1,1,11.5,95.0,2025-06-15T08:00:00Z\n\
         2,2,16.0,95.0,2025-06-15T08:00:00Z\n",
    );

    let students = load_students(students_csv.path()).expect("load students");
    let measurements = load_measurements(measurements_csv.path()).expect("load measurements");
    let classified = classify_students(&students, &measurements, &Thresholds::default());

    // BMI ~12.7 falls in the Wasted band
    assert_eq!(category(&classified[0]), Some(BeneficiaryCategory::Primary));
    // Normal students are not eligible
    assert_eq!(category(&classified[1]), None);
}

#[test]
fn baseline_statuses_load_and_evaluate() {
    let beneficiaries_csv = write_csv(
        "student_id,enrollment_date,bmi_at_enrollment,bmi_status_at_enrollment,hfa_status_at_enrollment\n\
         1,2025-06-20,12.0,Severely Wasted,Normal\n\
         2,2025-06-20,13.0,Wasted,Stunted\n",
    );

    let beneficiaries = load_beneficiaries(beneficiaries_csv.path()).expect("load beneficiaries");
    assert_eq!(beneficiaries.len(), 2);

    // Severely Wasted -> Normal is an improvement of three ranks
    let outcome = evaluate_growth(
        beneficiaries[0].bmi_status_at_enrollment,
        Some(BmiStatus::Normal),
    );
    assert_eq!(outcome, GrowthOutcome::Improved);

    // Wasted -> Wasted is no improvement
    let outcome = evaluate_growth(
        beneficiaries[1].bmi_status_at_enrollment,
        Some(BmiStatus::Wasted),
    );
    assert_eq!(outcome, GrowthOutcome::NoChangeOrDeclined);
}

#[test]
fn overshooting_normal_is_flagged_as_overdone() {
    let outcome = evaluate_growth(Some(BmiStatus::Wasted), Some(BmiStatus::Overweight));
    assert_eq!(outcome, GrowthOutcome::Overdone);

    let outcome = evaluate_growth(Some(BmiStatus::Underweight), Some(BmiStatus::Obese));
    assert_eq!(outcome, GrowthOutcome::Overdone);
}

#[test]
fn declining_status_is_not_improvement() {
    let outcome = evaluate_growth(Some(BmiStatus::Underweight), Some(BmiStatus::SeverelyWasted));
    assert_eq!(outcome, GrowthOutcome::NoChangeOrDeclined);
}

#[test]
fn missing_statuses_rank_below_every_real_status() {
    assert_eq!(
        evaluate_growth(None, Some(BmiStatus::Normal)),
        GrowthOutcome::Improved
    );
    assert_eq!(
        evaluate_growth(Some(BmiStatus::Wasted), None),
        GrowthOutcome::NoChangeOrDeclined
    );
}
