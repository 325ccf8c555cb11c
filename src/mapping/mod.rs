//! # Control Mapping Module
//!
//! Turns physical controls into semantic buttons and speed samples.
//!
//! This module handles:
//! - The semantic button vocabulary shared with the session state machine
//! - The configurable control mapping table (buttons, hat bits, axis lanes)
//! - Hat bitmask edge detection
//! - Axis scaling to speed fractions

pub mod axis;
pub mod hat;
pub mod table;

use serde::Deserialize;
use std::fmt;

/// Logical identity of a control, independent of the device layout.
///
/// Names in configuration files are the snake_case forms (`remove_mark`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticButton {
    Play,
    Record,
    Mark,
    RemoveMark,
    Delete,
    Left,
    Right,
    Previous,
    Next,
    Quit,
    Unused,
}

impl SemanticButton {
    /// Returns the configuration name of this button.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SemanticButton::Play => "play",
            SemanticButton::Record => "record",
            SemanticButton::Mark => "mark",
            SemanticButton::RemoveMark => "remove_mark",
            SemanticButton::Delete => "delete",
            SemanticButton::Left => "left",
            SemanticButton::Right => "right",
            SemanticButton::Previous => "previous",
            SemanticButton::Next => "next",
            SemanticButton::Quit => "quit",
            SemanticButton::Unused => "unused",
        }
    }

    /// Navigation buttons only emit a placeholder command for now.
    #[must_use]
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            SemanticButton::Left
                | SemanticButton::Right
                | SemanticButton::Previous
                | SemanticButton::Next
        )
    }
}

impl fmt::Display for SemanticButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One press or release of a semantic button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdge {
    pub button: SemanticButton,
    pub pressed: bool,
}

impl ButtonEdge {
    #[must_use]
    pub fn press(button: SemanticButton) -> Self {
        Self { button, pressed: true }
    }

    #[must_use]
    pub fn release(button: SemanticButton) -> Self {
        Self { button, pressed: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        buttons: Vec<SemanticButton>,
    }

    #[test]
    fn test_button_names_round_trip_through_toml() {
        let parsed: Wrapper =
            toml::from_str(r#"buttons = ["play", "remove_mark", "previous", "unused"]"#).unwrap();
        assert_eq!(
            parsed.buttons,
            vec![
                SemanticButton::Play,
                SemanticButton::RemoveMark,
                SemanticButton::Previous,
                SemanticButton::Unused,
            ]
        );
        for button in parsed.buttons {
            assert_eq!(button.to_string(), button.name());
        }
    }

    #[test]
    fn test_unknown_button_name_rejected() {
        let parsed: std::result::Result<Wrapper, _> = toml::from_str(r#"buttons = ["rewind"]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_navigation_buttons() {
        assert!(SemanticButton::Left.is_navigation());
        assert!(SemanticButton::Next.is_navigation());
        assert!(!SemanticButton::Play.is_navigation());
        assert!(!SemanticButton::Quit.is_navigation());
    }

    #[test]
    fn test_edge_constructors() {
        assert!(ButtonEdge::press(SemanticButton::Mark).pressed);
        assert!(!ButtonEdge::release(SemanticButton::Mark).pressed);
    }
}
