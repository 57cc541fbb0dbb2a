//! Integration tests for the CSV-to-report pipeline

use std::io::Write;
use tempfile::NamedTempFile;

use nutristat::core::ingest::{load_measurements, load_students};
use nutristat::core::report::{
    JsonReporter, MarkdownReporter, ReportFormat, ReportGenerator, ReportSnapshot, SnapshotBuilder,
};
use nutristat::core::thresholds::Thresholds;
use nutristat::core::GRAND_TOTAL_LABEL;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write csv");
    file
}

fn build_snapshot() -> ReportSnapshot {
    let students_csv = write_csv(
        "id,name,sex,grade,enrolled\n\
         1,Ana Cruz,F,1\n\
         2,Ben Reyes,M,1\n\
         3,Carla Santos,F,1\n\
         4,Dan Lim,M,3\n\
         5,Eva Tan,unknown,3\n\
         6,Fely Uy,F,5,false\n",
    );
    // Student 2 has two measurements; only the later one counts.
    // Student 5 has none and stays unmeasured.
    let measurements_csv = write_csv(
        "id,student_id,weight_kg,height_cm,taken_at\n\
         1,1,12.0,95.0,2025-06-15T08:00:00Z\n\
         2,2,11.0,95.0,2025-06-15T08:00:00Z\n\
         3,2,16.0,95.0,2025-08-15T08:00:00Z\n\
         4,3,16.8,100.0,2025-06-15T08:00:00Z\n\
         5,4,30.0,120.0,2025-06-15T08:00:00Z\n",
    );

    let students = load_students(students_csv.path()).expect("load students");
    let measurements = load_measurements(measurements_csv.path()).expect("load measurements");

    SnapshotBuilder::new(
        Thresholds::default(),
        "Mabini Elementary".to_string(),
        "2025-2026".to_string(),
    )
    .build(&students, &measurements)
}

#[test]
fn pipeline_produces_canonical_cohorts_with_grand_total_last() {
    let snapshot = build_snapshot();

    // Kinder through SPED plus GRAND TOTAL, even for empty grades
    assert_eq!(snapshot.cohorts.len(), 9);
    assert_eq!(snapshot.cohorts[0].label, "Kinder");
    assert_eq!(snapshot.cohorts.last().unwrap().label, GRAND_TOTAL_LABEL);

    let grade1 = snapshot
        .cohorts
        .iter()
        .find(|c| c.label == "Grade 1")
        .expect("grade 1 cohort");
    assert_eq!(grade1.enrollment.total, 3);
    assert_eq!(grade1.bmi.pupils_weighed.total, 3);
}

#[test]
fn latest_measurement_wins_per_student() {
    let snapshot = build_snapshot();
    let grade1 = snapshot
        .cohorts
        .iter()
        .find(|c| c.label == "Grade 1")
        .expect("grade 1 cohort");

    // Student 2's earlier 11.0kg reading would be Severely Wasted; the
    // later 16.0kg reading classifies Normal (BMI ~17.7).
    assert_eq!(grade1.bmi.severely_wasted.count.total, 0);
    assert_eq!(grade1.bmi.normal.count.total, 2);
    // Student 1 at 12.0kg / 95cm is Wasted (BMI ~13.3)
    assert_eq!(grade1.bmi.wasted.count.total, 1);
}

#[test]
fn dropped_students_do_not_reach_any_cohort() {
    let snapshot = build_snapshot();
    let grade5 = snapshot
        .cohorts
        .iter()
        .find(|c| c.label == "Grade 5")
        .expect("grade 5 cohort");

    // Student 6 is in the roster file but marked not enrolled
    assert_eq!(grade5.enrollment.total, 0);
    assert_eq!(snapshot.cohorts.last().unwrap().enrollment.total, 5);
}

#[test]
fn unmeasured_students_count_in_enrollment_only() {
    let snapshot = build_snapshot();
    let grade3 = snapshot
        .cohorts
        .iter()
        .find(|c| c.label == "Grade 3")
        .expect("grade 3 cohort");

    assert_eq!(grade3.enrollment.total, 2);
    assert_eq!(grade3.bmi.pupils_weighed.total, 1);
}

#[test]
fn unrecognized_sex_counts_as_female_and_is_flagged() {
    let snapshot = build_snapshot();
    let grade3 = snapshot
        .cohorts
        .iter()
        .find(|c| c.label == "Grade 3")
        .expect("grade 3 cohort");

    assert_eq!(grade3.enrollment.f, 1);
    assert_eq!(grade3.unrecognized_sex, 1);

    let grand = snapshot.cohorts.last().unwrap();
    assert_eq!(grand.unrecognized_sex, 1);
}

#[test]
fn grand_total_is_componentwise_sum_with_own_percentages() {
    let snapshot = build_snapshot();
    let grand = snapshot.cohorts.last().unwrap();

    let summed: u32 = snapshot.cohorts[..snapshot.cohorts.len() - 1]
        .iter()
        .map(|c| c.enrollment.total)
        .sum();
    assert_eq!(grand.enrollment.total, summed);

    // 2 of 4 weighed school-wide are Normal
    assert_eq!(grand.bmi.pupils_weighed.total, 4);
    assert!((grand.bmi.normal.percent - 50.0).abs() < f64::EPSILON);
}

#[test]
fn markdown_and_json_render_the_same_snapshot() {
    let snapshot = build_snapshot();

    let markdown = MarkdownReporter::new().render(&snapshot).expect("markdown");
    assert!(markdown.contains("Mabini Elementary"));
    assert!(markdown.contains("GRAND TOTAL"));
    assert!(markdown.contains("## Body Mass Index"));
    assert!(markdown.contains("unrecognized sex"));

    let json = JsonReporter::new().render(&snapshot).expect("json");
    let restored: ReportSnapshot = serde_json::from_str(&json).expect("round trip");
    assert_eq!(restored.cohorts, snapshot.cohorts);
    assert_eq!(restored.format, ReportFormat::Detailed);
}

#[test]
fn reporters_write_output_files() {
    let snapshot = build_snapshot();
    let dir = tempfile::tempdir().expect("temp dir");

    let md_path = dir.path().join("report.md");
    MarkdownReporter::new()
        .generate(&snapshot, &md_path)
        .expect("write markdown");
    assert!(md_path.exists());

    let json_path = dir.path().join("report.json");
    JsonReporter::new()
        .generate(&snapshot, &json_path)
        .expect("write json");
    let content = std::fs::read_to_string(&json_path).expect("read json");
    assert!(serde_json::from_str::<ReportSnapshot>(&content).is_ok());
}
