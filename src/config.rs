//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section is optional; missing values fall back to the X-Box 360
//! profile described in [`crate::mapping::table`].

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PadError, Result};
use crate::mapping::table::{AxisProfile, ControlMapping, DEFAULT_AXES, DEFAULT_BUTTONS, DEFAULT_HAT};
use crate::mapping::SemanticButton;
use crate::output::OutputFormat;
use crate::session::state_machine::DEFAULT_QUIT_THRESHOLD;

/// Largest accepted axis gain (the fast lane).
pub const MAX_AXIS_GAIN: f64 = 16.0;

/// Largest accepted quit threshold.
pub const MAX_QUIT_THRESHOLD: u32 = 16;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub mapping: MappingConfig,
    pub session: SessionConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Input device configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DeviceConfig {
    /// Empty means auto-detect the only connected joystick.
    #[serde(default)]
    pub path: String,
}

/// Control mapping configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MappingConfig {
    #[serde(default = "default_buttons")]
    pub buttons: Vec<SemanticButton>,

    #[serde(default = "default_hat")]
    pub hat: Vec<SemanticButton>,

    #[serde(default = "default_axes")]
    pub axes: Vec<AxisProfile>,
}

/// Session behaviour configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_quit_threshold")]
    pub quit_threshold: u32,
}

/// Command output configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Diagnostic logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Empty means log to stderr.
    #[serde(default)]
    pub file: String,
}

// Default value functions
fn default_buttons() -> Vec<SemanticButton> { DEFAULT_BUTTONS.to_vec() }
fn default_hat() -> Vec<SemanticButton> { DEFAULT_HAT.to_vec() }
fn default_axes() -> Vec<AxisProfile> { DEFAULT_AXES.to_vec() }

fn default_quit_threshold() -> u32 { DEFAULT_QUIT_THRESHOLD }

fn default_log_level() -> String { "info".to_string() }

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            buttons: default_buttons(),
            hat: default_hat(),
            axes: default_axes(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { quit_threshold: default_quit_threshold() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

fn invalid(message: impl std::fmt::Display) -> PadError {
    PadError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dictapi_pad::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.mapping.hat.len() != 4 {
            return Err(invalid(format!(
                "mapping.hat must have exactly 4 entries (up, right, down, left), got {}",
                self.mapping.hat.len()
            )));
        }

        for (i, axis) in self.mapping.axes.iter().enumerate() {
            if !axis.gain.is_finite() || axis.gain <= 0.0 || axis.gain > MAX_AXIS_GAIN {
                return Err(invalid(format!(
                    "gain of axis {} must be greater than 0.0 and at most {}",
                    axis.index, MAX_AXIS_GAIN
                )));
            }

            if self.mapping.axes[..i].iter().any(|other| other.index == axis.index) {
                return Err(invalid(format!("axis {} is mapped more than once", axis.index)));
            }
        }

        if self.session.quit_threshold == 0 || self.session.quit_threshold > MAX_QUIT_THRESHOLD {
            return Err(invalid(format!(
                "quit_threshold must be between 1 and {}",
                MAX_QUIT_THRESHOLD
            )));
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(invalid(
                "logging level must be one of: trace, debug, info, warn, error",
            ));
        }

        Ok(())
    }

    /// Builds the control mapping table.
    #[must_use]
    pub fn control_mapping(&self) -> ControlMapping {
        let mut hat = DEFAULT_HAT;
        for (slot, button) in hat.iter_mut().zip(&self.mapping.hat) {
            *slot = *button;
        }
        ControlMapping::new(self.mapping.buttons.clone(), hat, self.mapping.axes.clone())
    }

    /// Configured device path, `None` for auto-detection.
    #[must_use]
    pub fn device_path(&self) -> Option<PathBuf> {
        if self.device.path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.device.path))
        }
    }

    /// Configured log file, `None` for stderr.
    #[must_use]
    pub fn log_file(&self) -> Option<PathBuf> {
        if self.logging.file.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.logging.file))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::hat::HatDirection;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mapping.buttons.len(), 11);
        assert_eq!(config.session.quit_threshold, 3);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.device_path().is_none());
        assert!(config.log_file().is_none());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.control_mapping(), ControlMapping::default());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[device]
path = "/dev/input/event7"

[mapping]
buttons = ["record", "play", "quit"]
hat = ["unused", "next", "unused", "previous"]

[[mapping.axes]]
index = 0
gain = 2.0

[session]
quit_threshold = 1

[output]
format = "jsonl"

[logging]
level = "debug"
file = "/tmp/dictapi-pad.log"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.device_path(), Some(PathBuf::from("/dev/input/event7")));
        assert_eq!(config.session.quit_threshold, 1);
        assert_eq!(config.output.format, OutputFormat::Jsonl);
        assert_eq!(config.log_file(), Some(PathBuf::from("/tmp/dictapi-pad.log")));

        let mapping = config.control_mapping();
        assert_eq!(mapping.button_for_index(0), Some(SemanticButton::Record));
        assert_eq!(mapping.button_for_index(2), Some(SemanticButton::Quit));
        assert_eq!(mapping.button_for_index(3), None);
        assert_eq!(mapping.hat_bit_for_position(HatDirection::Right), SemanticButton::Next);
        assert_eq!(mapping.hat_bit_for_position(HatDirection::Left), SemanticButton::Previous);
        assert_eq!(mapping.axis_for_index(0).map(|a| a.gain), Some(2.0));
        assert!(mapping.axis_for_index(3).is_none());
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load("/nonexistent/dictapi-pad.toml");
        assert!(matches!(result, Err(PadError::Io(_))));
    }

    #[test]
    fn test_unknown_button_name() {
        let result = Config::from_toml(r#"[mapping]
buttons = ["play", "fast_forward"]"#);
        assert!(matches!(result, Err(PadError::Config(_))));
    }

    #[test]
    fn test_hat_wrong_length() {
        let mut config = Config::default();
        config.mapping.hat = vec![SemanticButton::Left; 3];
        assert!(config.validate().is_err());
        config.mapping.hat = vec![SemanticButton::Left; 5];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_axis_gain_zero() {
        let mut config = Config::default();
        config.mapping.axes = vec![AxisProfile { index: 3, gain: 0.0 }];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_axis_gain_negative() {
        let mut config = Config::default();
        config.mapping.axes = vec![AxisProfile { index: 3, gain: -1.0 }];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_axis_gain_too_high() {
        let mut config = Config::default();
        config.mapping.axes = vec![AxisProfile { index: 3, gain: 16.5 }];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_axis_gain_not_finite() {
        let mut config = Config::default();
        config.mapping.axes = vec![AxisProfile { index: 3, gain: f64::NAN }];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_axis_gain_fast_lane_allowed() {
        let mut config = Config::default();
        config.mapping.axes = vec![AxisProfile { index: 3, gain: MAX_AXIS_GAIN }];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_axis_index() {
        let mut config = Config::default();
        config.mapping.axes = vec![
            AxisProfile { index: 3, gain: 1.0 },
            AxisProfile { index: 3, gain: 16.0 },
        ];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quit_threshold_zero() {
        let mut config = Config::default();
        config.session.quit_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quit_threshold_too_high() {
        let mut config = Config::default();
        config.session.quit_threshold = MAX_QUIT_THRESHOLD + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_log_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let mut config = Config::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "Log level {} should be valid", level);
        }
    }

    #[test]
    fn test_invalid_output_format() {
        let result = Config::from_toml(r#"[output]
format = "csv""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_button_table_allowed() {
        let config = Config::from_toml(r#"[mapping]
buttons = []"#)
        .unwrap();
        assert_eq!(config.control_mapping().button_count(), 0);
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_buttons(), DEFAULT_BUTTONS.to_vec());
        assert_eq!(default_hat(), DEFAULT_HAT.to_vec());
        assert_eq!(default_axes(), DEFAULT_AXES.to_vec());
        assert_eq!(default_quit_threshold(), 3);
        assert_eq!(default_log_level(), "info");
    }
}
