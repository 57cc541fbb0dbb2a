//! JSON snapshot writer
//!
//! The snapshot is persisted as opaque JSON by the storage layer; this
//! renderer is also what external HTML/PDF renderers consume.

use std::error::Error;
use std::fs;
use std::path::Path;

use crate::core::report::{ReportGenerator, ReportSnapshot};

/// Pretty-printed JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(
        &self,
        snapshot: &ReportSnapshot,
        output_path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let content = self.render(snapshot)?;
        fs::write(output_path, content)?;
        Ok(())
    }

    fn render(&self, snapshot: &ReportSnapshot) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string_pretty(snapshot)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::{ReportFormat, SnapshotBuilder};
    use crate::core::thresholds::Thresholds;

    #[test]
    fn renders_valid_json_with_stable_shape() {
        let snapshot = SnapshotBuilder::new(
            Thresholds::default(),
            "Test Elementary".to_string(),
            "2025-2026".to_string(),
        )
        .build(&[], &[]);

        let json = JsonReporter::new().render(&snapshot).expect("render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

        assert_eq!(value["format"], "detailed");
        assert_eq!(value["school_name"], "Test Elementary");
        assert!(value["cohorts"].as_array().is_some_and(|c| c.len() == 9));

        let restored: ReportSnapshot = serde_json::from_str(&json).expect("round trip");
        assert_eq!(restored.format, ReportFormat::Detailed);
        assert_eq!(restored.cohorts, snapshot.cohorts);
    }
}
