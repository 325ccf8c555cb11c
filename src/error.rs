//! # Error Types
//!
//! Custom error types for dictapi-pad using `thiserror`.

use thiserror::Error;

/// Main error type for dictapi-pad
#[derive(Debug, Error)]
pub enum PadError {
    /// Joystick device errors (open, read, layout)
    #[error("Joystick error: {0}")]
    Joystick(String),

    /// No joystick connected
    #[error("No joystick found")]
    JoystickNotFound,

    /// More than one joystick connected and no device path configured
    #[error("{0} joysticks found -- ambiguous, set device.path in the configuration")]
    AmbiguousJoystick(usize),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for dictapi-pad
pub type Result<T> = std::result::Result<T, PadError>;
