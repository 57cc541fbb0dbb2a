//! Snapshot renderers
//!
//! Provides output writers for the report snapshot: Markdown tables for
//! human review and JSON for persistence.

pub mod json;
pub mod markdown;

pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

use std::error::Error;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::report::ReportSnapshot;

/// Supported output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown tables
    Markdown,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Trait for snapshot renderers
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, snapshot: &ReportSnapshot, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Render report content as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, snapshot: &ReportSnapshot) -> Result<String, Box<dyn Error>>;
}
