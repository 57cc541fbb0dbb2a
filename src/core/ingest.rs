//! CSV ingestion for student, measurement, and beneficiary data
//!
//! Loads the exported flat files the surrounding system hands over. Sex
//! values are normalized here, once, at the boundary; rows that cannot be
//! parsed are logged and skipped rather than failing the whole load.

use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};

use crate::core::models::{Beneficiary, BmiStatus, HfaStatus, Measurement, Student};

/// Split a CSV line into trimmed fields
fn parse_csv_line(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

/// Build a header-name → column-index map from the first line
fn parse_header(line: &str) -> HashMap<String, usize> {
    parse_csv_line(line)
        .into_iter()
        .enumerate()
        .map(|(idx, name)| (name.to_ascii_lowercase(), idx))
        .collect()
}

/// Extract a named field from a parsed row
fn get_field<'a>(fields: &[&'a str], header: &str, headers: &HashMap<String, usize>) -> Option<&'a str> {
    headers
        .get(header)
        .and_then(|&idx| fields.get(idx))
        .copied()
}

fn read_rows(path: &Path) -> Result<(HashMap<String, usize>, Vec<String>), Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines();

    let header_line = lines
        .next()
        .ok_or_else(|| format!("{}: empty file", path.display()))?;
    let headers = parse_header(header_line);

    let rows = lines
        .filter(|line| !line.trim().is_empty())
        .map(std::string::ToString::to_string)
        .collect();

    Ok((headers, rows))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>().ok().or_else(|| {
        // Date-only captures: treat as midnight UTC
        raw.parse::<NaiveDate>()
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    })
}

fn parse_bmi_status(raw: &str) -> Option<BmiStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "severely wasted" => Some(BmiStatus::SeverelyWasted),
        "wasted" => Some(BmiStatus::Wasted),
        "underweight" => Some(BmiStatus::Underweight),
        "normal" => Some(BmiStatus::Normal),
        "overweight" => Some(BmiStatus::Overweight),
        "obese" => Some(BmiStatus::Obese),
        _ => None,
    }
}

fn parse_hfa_status(raw: &str) -> Option<HfaStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "severely stunted" => Some(HfaStatus::SeverelyStunted),
        "stunted" => Some(HfaStatus::Stunted),
        "normal" => Some(HfaStatus::Normal),
        "tall" => Some(HfaStatus::Tall),
        _ => None,
    }
}

/// Load students from a CSV file with headers
/// `id, name, sex, grade, enrolled`
///
/// # Errors
/// Returns an error if the file cannot be read or has no header line.
pub fn load_students<P: AsRef<Path>>(path: P) -> Result<Vec<Student>, Box<dyn Error>> {
    let (headers, rows) = read_rows(path.as_ref())?;
    let mut students = Vec::with_capacity(rows.len());

    for row in &rows {
        let fields = parse_csv_line(row);

        let Some(id) = get_field(&fields, "id", &headers).and_then(|v| v.parse::<u32>().ok())
        else {
            crate::warn!("Skipping student row with missing or invalid id: {row}");
            continue;
        };
        let Some(grade) = get_field(&fields, "grade", &headers).and_then(|v| v.parse::<u8>().ok())
        else {
            crate::warn!("Skipping student {id}: missing or invalid grade");
            continue;
        };

        let name = get_field(&fields, "name", &headers)
            .unwrap_or_default()
            .to_string();
        let raw_sex = get_field(&fields, "sex", &headers).unwrap_or_default();

        let mut student = Student::from_raw_sex(id, name, raw_sex, grade);
        if let Some(enrolled) = get_field(&fields, "enrolled", &headers) {
            student.enrolled = !enrolled.eq_ignore_ascii_case("false");
        }
        students.push(student);
    }

    Ok(students)
}

/// Load measurements from a CSV file with headers
/// `id, student_id, weight_kg, height_cm, taken_at`
///
/// `taken_at` accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates.
///
/// # Errors
/// Returns an error if the file cannot be read or has no header line.
pub fn load_measurements<P: AsRef<Path>>(path: P) -> Result<Vec<Measurement>, Box<dyn Error>> {
    let (headers, rows) = read_rows(path.as_ref())?;
    let mut measurements = Vec::with_capacity(rows.len());

    for row in &rows {
        let fields = parse_csv_line(row);

        let id = get_field(&fields, "id", &headers).and_then(|v| v.parse::<u32>().ok());
        let student_id =
            get_field(&fields, "student_id", &headers).and_then(|v| v.parse::<u32>().ok());
        let weight_kg =
            get_field(&fields, "weight_kg", &headers).and_then(|v| v.parse::<f64>().ok());
        let height_cm =
            get_field(&fields, "height_cm", &headers).and_then(|v| v.parse::<f64>().ok());
        let taken_at = get_field(&fields, "taken_at", &headers).and_then(parse_timestamp);

        let (Some(id), Some(student_id), Some(weight_kg), Some(height_cm), Some(taken_at)) =
            (id, student_id, weight_kg, height_cm, taken_at)
        else {
            crate::warn!("Skipping malformed measurement row: {row}");
            continue;
        };

        measurements.push(Measurement::new(id, student_id, weight_kg, height_cm, taken_at));
    }

    Ok(measurements)
}

/// Load feeding-program beneficiaries from a CSV file with headers
/// `student_id, enrollment_date, bmi_at_enrollment, bmi_status_at_enrollment,
/// hfa_status_at_enrollment`
///
/// Baseline status fields use the display labels (`Severely Wasted`,
/// `Wasted`, ...); unrecognized labels load as absent baselines.
///
/// # Errors
/// Returns an error if the file cannot be read or has no header line.
pub fn load_beneficiaries<P: AsRef<Path>>(path: P) -> Result<Vec<Beneficiary>, Box<dyn Error>> {
    let (headers, rows) = read_rows(path.as_ref())?;
    let mut beneficiaries = Vec::with_capacity(rows.len());

    for row in &rows {
        let fields = parse_csv_line(row);

        let student_id =
            get_field(&fields, "student_id", &headers).and_then(|v| v.parse::<u32>().ok());
        let enrollment_date = get_field(&fields, "enrollment_date", &headers)
            .and_then(|v| v.parse::<NaiveDate>().ok());

        let (Some(student_id), Some(enrollment_date)) = (student_id, enrollment_date) else {
            crate::warn!("Skipping malformed beneficiary row: {row}");
            continue;
        };

        let bmi_at_enrollment = get_field(&fields, "bmi_at_enrollment", &headers)
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(0.0);
        let bmi_status_at_enrollment = get_field(&fields, "bmi_status_at_enrollment", &headers)
            .and_then(parse_bmi_status);
        let hfa_status_at_enrollment = get_field(&fields, "hfa_status_at_enrollment", &headers)
            .and_then(parse_hfa_status);

        beneficiaries.push(Beneficiary {
            student_id,
            enrollment_date,
            bmi_at_enrollment,
            bmi_status_at_enrollment,
            hfa_status_at_enrollment,
        });
    }

    Ok(beneficiaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Sex;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn loads_students_and_normalizes_sex() {
        let file = write_file(
            "id,name,sex,grade,enrolled\n\
             1,Ana Cruz,Female,0,true\n\
             2,Ben Reyes,M,3,true\n\
             3,Casey Lim,other,3,true\n",
        );

        let students = load_students(file.path()).expect("load");
        assert_eq!(students.len(), 3);
        assert_eq!(students[0].sex, Sex::F);
        assert_eq!(students[1].sex, Sex::M);
        // Unrecognized sex coerces to F but stays flagged
        assert_eq!(students[2].sex, Sex::F);
        assert!(!students[2].sex_recognized);
    }

    #[test]
    fn skips_malformed_student_rows() {
        let file = write_file(
            "id,name,sex,grade\n\
             not-a-number,Bad Row,M,1\n\
             2,Good Row,F,1\n",
        );

        let students = load_students(file.path()).expect("load");
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, 2);
    }

    #[test]
    fn loads_measurements_with_date_only_timestamps() {
        let file = write_file(
            "id,student_id,weight_kg,height_cm,taken_at\n\
             1,1,12.0,95.0,2025-06-15\n\
             2,1,12.4,95.5,2025-08-15T08:30:00Z\n",
        );

        let measurements = load_measurements(file.path()).expect("load");
        assert_eq!(measurements.len(), 2);
        assert!(measurements[1].taken_at > measurements[0].taken_at);
    }

    #[test]
    fn loads_beneficiaries_with_baseline_statuses() {
        let file = write_file(
            "student_id,enrollment_date,bmi_at_enrollment,bmi_status_at_enrollment,hfa_status_at_enrollment\n\
             1,2025-06-20,13.1,Wasted,Normal\n\
             2,2025-06-20,12.0,Severely Wasted,Severely Stunted\n",
        );

        let beneficiaries = load_beneficiaries(file.path()).expect("load");
        assert_eq!(beneficiaries.len(), 2);
        assert_eq!(
            beneficiaries[0].bmi_status_at_enrollment,
            Some(BmiStatus::Wasted)
        );
        assert_eq!(
            beneficiaries[1].hfa_status_at_enrollment,
            Some(HfaStatus::SeverelyStunted)
        );
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = write_file("");
        assert!(load_students(file.path()).is_err());
    }
}
