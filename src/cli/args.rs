//! CLI argument definitions for `Nutristat`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use nutristat::config::ConfigOverrides;
use nutristat::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `reports_dir`, `school_name`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Generate a nutritional status report from student and measurement CSVs.
    ///
    /// Classifies each student's latest measurement, aggregates per-grade
    /// cohorts, and writes the report in the chosen output format.
    Report {
        /// Path to the students CSV file
        #[arg(value_name = "STUDENTS")]
        students: PathBuf,

        /// Path to the measurements CSV file
        #[arg(value_name = "MEASUREMENTS")]
        measurements: PathBuf,

        /// Output file path (optional; defaults to the config `reports_dir`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format: markdown (md) or json
        #[arg(short, long, value_name = "FORMAT", default_value = "markdown")]
        format: String,

        /// Report layout: detailed or simple
        #[arg(long, value_name = "LAYOUT", default_value = "detailed")]
        layout: String,
    },
    /// Evaluate growth outcomes for feeding-program beneficiaries.
    ///
    /// Compares each beneficiary's baseline nutritional status against their
    /// current classification and prints an outcome per student.
    Growth {
        /// Path to the students CSV file
        #[arg(value_name = "STUDENTS")]
        students: PathBuf,

        /// Path to the measurements CSV file
        #[arg(value_name = "MEASUREMENTS")]
        measurements: PathBuf,

        /// Path to the beneficiaries CSV file
        #[arg(value_name = "BENEFICIARIES")]
        beneficiaries: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "nutristat",
    about = "Nutristat command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config reports directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Override config thresholds file path
    #[arg(long = "thresholds-file", value_name = "PATH")]
    pub thresholds_file: Option<PathBuf>,

    /// Override config school name
    #[arg(long = "school-name", value_name = "NAME")]
    pub school_name: Option<String>,

    /// Override config school year label
    #[arg(long = "school-year", value_name = "YEAR")]
    pub school_year: Option<String>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Transforms CLI arguments into a `ConfigOverrides` struct that can be applied to
    /// the loaded configuration. `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string().to_lowercase()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            thresholds_file: self
                .thresholds_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            school_name: self.school_name.clone(),
            school_year: self.school_year.clone(),
        }
    }
}
