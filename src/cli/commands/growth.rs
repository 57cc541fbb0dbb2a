//! Growth command handler

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

use nutristat::config::Config;
use nutristat::core::classify::{classify_students, ClassifiedStudent};
use nutristat::core::growth::{evaluate_growth, GrowthOutcome};
use nutristat::core::ingest::load_beneficiaries;
use nutristat::core::models::Beneficiary;

use super::report::{load_inputs, load_thresholds};

/// Run the growth command
pub fn run(
    students_path: &Path,
    measurements_path: &Path,
    beneficiaries_path: &Path,
    config: &Config,
) {
    match evaluate(students_path, measurements_path, beneficiaries_path, config) {
        Ok(rows) => print_outcomes(&rows),
        Err(e) => {
            eprintln!("✗ Failed to evaluate growth: {e}");
            std::process::exit(1);
        }
    }
}

/// One evaluated beneficiary row
pub struct OutcomeRow {
    /// Student display name, or the id when the student record is missing
    pub name: String,
    /// Baseline status label from enrollment
    pub baseline: String,
    /// Current status label from the latest measurement
    pub current: String,
    /// Evaluated outcome
    pub outcome: GrowthOutcome,
}

/// Join beneficiaries with current classifications and evaluate each one
///
/// Beneficiaries whose student record is missing from the roster are
/// evaluated against an absent current status.
///
/// # Errors
/// Returns an error if any input file cannot be loaded or the thresholds
/// file is invalid.
pub fn evaluate(
    students_path: &Path,
    measurements_path: &Path,
    beneficiaries_path: &Path,
    config: &Config,
) -> Result<Vec<OutcomeRow>, Box<dyn Error>> {
    let (students, measurements) = load_inputs(students_path, measurements_path)?;
    let beneficiaries = load_beneficiaries(beneficiaries_path)
        .map_err(|e| format!("{}: {e}", beneficiaries_path.display()))?;
    let thresholds = load_thresholds(config)?;

    let classified = classify_students(&students, &measurements, &thresholds);
    let by_id: HashMap<u32, &ClassifiedStudent> =
        classified.iter().map(|c| (c.student.id, c)).collect();

    let rows = beneficiaries
        .iter()
        .map(|beneficiary| evaluate_one(beneficiary, &by_id))
        .collect();
    Ok(rows)
}

fn evaluate_one(
    beneficiary: &Beneficiary,
    by_id: &HashMap<u32, &ClassifiedStudent>,
) -> OutcomeRow {
    let classified = by_id.get(&beneficiary.student_id).copied();
    let current_status = classified.and_then(|c| c.bmi_status);

    if classified.is_none() {
        nutristat::warn!(
            "Beneficiary {} has no matching student record",
            beneficiary.student_id
        );
    }

    let status_label = |status: Option<nutristat::core::models::BmiStatus>| {
        status.map_or_else(|| "n/a".to_string(), |s| s.to_string())
    };

    OutcomeRow {
        name: classified.map_or_else(
            || format!("#{}", beneficiary.student_id),
            |c| c.student.name.clone(),
        ),
        baseline: status_label(beneficiary.bmi_status_at_enrollment),
        current: status_label(current_status),
        outcome: evaluate_growth(beneficiary.bmi_status_at_enrollment, current_status),
    }
}

fn print_outcomes(rows: &[OutcomeRow]) {
    if rows.is_empty() {
        println!("No beneficiaries to evaluate");
        return;
    }

    println!("\n=== Growth Outcomes ===\n");
    println!("{:<24} {:<18} {:<18} Outcome", "Student", "Baseline", "Current");
    for row in rows {
        println!(
            "{:<24} {:<18} {:<18} {}",
            row.name, row.baseline, row.current, row.outcome
        );
    }

    let improved = rows
        .iter()
        .filter(|r| r.outcome == GrowthOutcome::Improved)
        .count();
    println!("\n{improved} of {} beneficiaries improved", rows.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn missing_records_render_ascii_placeholders() {
        let beneficiary = Beneficiary {
            student_id: 42,
            enrollment_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            bmi_at_enrollment: 0.0,
            bmi_status_at_enrollment: None,
            hfa_status_at_enrollment: None,
        };

        let row = evaluate_one(&beneficiary, &HashMap::new());
        assert_eq!(row.name, "#42");
        assert_eq!(row.baseline, "n/a");
        assert_eq!(row.current, "n/a");
        assert_eq!(row.outcome, GrowthOutcome::NoChangeOrDeclined);
    }
}
