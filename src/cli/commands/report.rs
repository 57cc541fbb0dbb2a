//! Report command handler

use std::error::Error;
use std::path::{Path, PathBuf};

use nutristat::config::Config;
use nutristat::core::ingest::{load_measurements, load_students};
use nutristat::core::models::{Measurement, Student};
use nutristat::core::report::{
    JsonReporter, MarkdownReporter, OutputFormat, ReportFormat, ReportGenerator, ReportSnapshot,
    SnapshotBuilder,
};
use nutristat::core::thresholds::Thresholds;

/// Run the report command
pub fn run(
    students_path: &Path,
    measurements_path: &Path,
    output: Option<&Path>,
    format: &str,
    layout: &str,
    config: &Config,
) {
    let output_format: OutputFormat = match format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };
    let report_format: ReportFormat = match layout.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    match generate(
        students_path,
        measurements_path,
        output,
        output_format,
        report_format,
        config,
    ) {
        Ok(report_path) => println!("✓ Report generated: {}", report_path.display()),
        Err(e) => {
            eprintln!("✗ Failed to generate report: {e}");
            std::process::exit(1);
        }
    }
}

/// Load inputs, build the snapshot, and write it to disk
///
/// # Errors
/// Returns an error if any input file cannot be loaded, the thresholds file
/// is invalid, or the report cannot be written.
pub fn generate(
    students_path: &Path,
    measurements_path: &Path,
    output: Option<&Path>,
    output_format: OutputFormat,
    report_format: ReportFormat,
    config: &Config,
) -> Result<PathBuf, Box<dyn Error>> {
    let (students, measurements) = load_inputs(students_path, measurements_path)?;
    let thresholds = load_thresholds(config)?;

    let snapshot = SnapshotBuilder::new(
        thresholds,
        config.school.name.clone(),
        config.school.school_year.clone(),
    )
    .with_format(report_format)
    .build(&students, &measurements);

    let report_path = resolve_output_path(output, output_format, config)?;
    write_snapshot(&snapshot, &report_path, output_format)?;

    nutristat::info!(
        "Report written to {} ({} students, {} measurements)",
        report_path.display(),
        students.len(),
        measurements.len()
    );
    Ok(report_path)
}

pub(crate) fn load_inputs(
    students_path: &Path,
    measurements_path: &Path,
) -> Result<(Vec<Student>, Vec<Measurement>), Box<dyn Error>> {
    let students = load_students(students_path)
        .map_err(|e| format!("{}: {e}", students_path.display()))?;
    let measurements = load_measurements(measurements_path)
        .map_err(|e| format!("{}: {e}", measurements_path.display()))?;
    Ok((students, measurements))
}

/// Load the threshold tables from the configured file, or built-in defaults
pub(crate) fn load_thresholds(config: &Config) -> Result<Thresholds, Box<dyn Error>> {
    if config.paths.thresholds_file.is_empty() {
        return Ok(Thresholds::default());
    }
    Thresholds::from_file(Path::new(&config.paths.thresholds_file))
        .map_err(std::convert::Into::into)
}

fn resolve_output_path(
    output: Option<&Path>,
    output_format: OutputFormat,
    config: &Config,
) -> Result<PathBuf, Box<dyn Error>> {
    if let Some(path) = output {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        return Ok(path.to_path_buf());
    }

    let reports_dir = PathBuf::from(&config.paths.reports_dir);
    std::fs::create_dir_all(&reports_dir)
        .map_err(|e| format!("Failed to create reports directory {}: {e}", reports_dir.display()))?;
    Ok(reports_dir.join(format!("nutritional_report.{}", output_format.extension())))
}

fn write_snapshot(
    snapshot: &ReportSnapshot,
    path: &Path,
    output_format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    match output_format {
        OutputFormat::Markdown => MarkdownReporter::new().generate(snapshot, path),
        OutputFormat::Json => JsonReporter::new().generate(snapshot, path),
    }
}
