//! Configuration module for `Nutristat`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for generated report files
    #[serde(default)]
    pub reports_dir: String,
    /// Optional TOML file overriding the built-in BMI/height-for-age threshold tables
    #[serde(default)]
    pub thresholds_file: String,
}

/// School metadata stamped into report snapshots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolConfig {
    /// School name
    #[serde(default)]
    pub name: String,
    /// School year label (e.g., "2025-2026")
    #[serde(default)]
    pub school_year: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// School metadata
    #[serde(default)]
    pub school: SchoolConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
    /// Override thresholds file path
    pub thresholds_file: Option<String>,
    /// Override school name
    pub school_name: Option<String>,
    /// Override school year label
    pub school_year: Option<String>,
}

impl Config {
    /// Get the `$NUTRISTAT` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/nutristat`
    /// - macOS: `~/Library/Application Support/nutristat`
    /// - Windows: `%APPDATA%\nutristat`
    #[must_use]
    pub fn get_nutristat_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nutristat")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty in the current config and non-empty in
    /// defaults are updated, so user settings survive upgrades that add new
    /// configuration fields.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }
        if self.paths.thresholds_file.is_empty() && !defaults.paths.thresholds_file.is_empty() {
            self.paths
                .thresholds_file
                .clone_from(&defaults.paths.thresholds_file);
            changed = true;
        }

        if self.school.name.is_empty() && !defaults.school.name.is_empty() {
            self.school.name.clone_from(&defaults.school.name);
            changed = true;
        }
        if self.school.school_year.is_empty() && !defaults.school.school_year.is_empty() {
            self.school
                .school_year
                .clone_from(&defaults.school.school_year);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values in the overrides struct replace config values;
    /// the persistent configuration file is left untouched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
        if let Some(thresholds_file) = &overrides.thresholds_file {
            self.paths.thresholds_file.clone_from(thresholds_file);
        }

        if let Some(name) = &overrides.school_name {
            self.school.name.clone_from(name);
        }
        if let Some(school_year) = &overrides.school_year {
            self.school.school_year.clone_from(school_year);
        }
    }

    /// Get the user config file path
    ///
    /// Returns the full path to the configuration file:
    /// - `config.toml` for release builds
    /// - `dconfig.toml` for debug builds (allows separate debug config)
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_nutristat_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$NUTRISTAT` variable in a string
    ///
    /// Replaces occurrences of `$NUTRISTAT` with the actual nutristat
    /// directory path so config values can reference the config directory.
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains("$NUTRISTAT") {
            let nutristat_dir = Self::get_nutristat_dir();
            value.replace("$NUTRISTAT", nutristat_dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Parses a TOML configuration string and expands any `$NUTRISTAT`
    /// variables in the values. Missing fields use their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        // Expand variables in config values
        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);
        config.paths.thresholds_file = Self::expand_variables(&config.paths.thresholds_file);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// The defaults differ between debug and release builds:
    /// - Debug: Uses `DefaultCLIConfigDebug.toml`
    /// - Release: Uses `DefaultCLIConfigRelease.toml`
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. This
    /// should never happen in practice since the defaults are compiled into
    /// the binary.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If config file exists: loads from file, merges missing fields from
    ///   defaults, saves the updated config.
    /// - If config file doesn't exist (first run): creates the config
    ///   directory if needed, loads defaults, saves them to file.
    ///
    /// Falls back to defaults if any error occurs during loading.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            // First run: create directory and config file from defaults
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }

            let _ = defaults.save();

            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// Serializes the current configuration to TOML and writes it to the
    /// platform-specific config file, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized, the config
    /// directory cannot be created, or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys:
    /// - `level`: Logging level ("debug", "info", "warn", "error")
    /// - `file`: Log file path
    /// - `verbose`: Verbose logging boolean
    /// - `reports_dir`: Report output directory path
    /// - `thresholds_file`: Thresholds TOML file path
    /// - `school_name`: School name
    /// - `school_year`: School year label
    ///
    /// # Returns
    /// - `Some(String)`: The configuration value as a string
    /// - `None`: If the key is not recognized
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            "thresholds_file" | "thresholds-file" => Some(self.paths.thresholds_file.clone()),
            "school_name" | "school-name" => Some(self.school.name.clone()),
            "school_year" | "school-year" => Some(self.school.school_year.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value cannot be
    /// parsed (e.g., a non-boolean for `verbose`).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            "thresholds_file" | "thresholds-file" => {
                self.paths.thresholds_file = value.to_string();
            }
            "school_name" | "school-name" => self.school.name = value.to_string(),
            "school_year" | "school-year" => self.school.school_year = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            "thresholds_file" | "thresholds-file" => self
                .paths
                .thresholds_file
                .clone_from(&defaults.paths.thresholds_file),
            "school_name" | "school-name" => self.school.name.clone_from(&defaults.school.name),
            "school_year" | "school-year" => self
                .school
                .school_year
                .clone_from(&defaults.school.school_year),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file, causing the next [`load()`](Config::load)
    /// call to recreate it from defaults. Succeeds silently if the file does
    /// not exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;
        writeln!(f, "  thresholds_file = \"{}\"", self.paths.thresholds_file)?;

        writeln!(f, "\n[school]")?;
        writeln!(f, "  name = \"{}\"", self.school.name)?;
        writeln!(f, "  school_year = \"{}\"", self.school.school_year)?;

        Ok(())
    }
}
