//! # Control Mapping Table
//!
//! Maps physical control indices to semantic buttons and axis speed lanes.
//!
//! The table is plain data loaded from configuration. Swapping it for another
//! device profile never touches the state machine or the hat detector.
//!
//! ## Default Profile (X-Box 360 compatible pads)
//!
//! | Index | Control | Semantic |
//! |-------|---------|----------|
//! | 0 | A | Play |
//! | 1 | B | Record |
//! | 2 | X | Delete |
//! | 3 | Y | Mark |
//! | 4 | LB | Previous |
//! | 5 | RB | Next |
//! | 6 | Back | Quit |
//! | 7 | Start | Quit |
//! | 8 | Guide | Quit |
//! | 9 | Left stick click | RemoveMark |
//! | 10 | Right stick click | Unused |
//!
//! | Axis | Control | Lane |
//! |------|---------|------|
//! | 3 | Right stick horizontal | speed, gain 1.0 |
//! | 4 | Right stick vertical | speed, gain 16.0 |
//!
//! Indices past the end of the table have no mapping. Events on them are
//! dropped without error; devices often report more controls than a profile
//! cares about.

use serde::Deserialize;

use super::axis::AxisScaler;
use super::hat::{HatDirection, HAT_DIRECTIONS};
use super::SemanticButton;

/// Speed lane bound to one physical axis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AxisProfile {
    pub index: usize,
    #[serde(default = "default_gain")]
    pub gain: f64,
}

fn default_gain() -> f64 {
    super::axis::DEFAULT_GAIN
}

impl AxisProfile {
    #[must_use]
    pub fn scaler(&self) -> AxisScaler {
        AxisScaler::new(self.gain)
    }
}

/// Default button table, indexed by SDL-style joystick button number.
pub const DEFAULT_BUTTONS: [SemanticButton; 11] = [
    SemanticButton::Play,
    SemanticButton::Record,
    SemanticButton::Delete,
    SemanticButton::Mark,
    SemanticButton::Previous,
    SemanticButton::Next,
    SemanticButton::Quit,
    SemanticButton::Quit,
    SemanticButton::Quit,
    SemanticButton::RemoveMark,
    SemanticButton::Unused,
];

/// Default hat table in position order Up, Right, Down, Left.
pub const DEFAULT_HAT: [SemanticButton; 4] = [
    SemanticButton::Previous,
    SemanticButton::Right,
    SemanticButton::Next,
    SemanticButton::Left,
];

/// Default axis lanes: slow on the right stick horizontal, fast on its vertical.
pub const DEFAULT_AXES: [AxisProfile; 2] = [
    AxisProfile { index: 3, gain: 1.0 },
    AxisProfile { index: 4, gain: 16.0 },
];

/// Lookup table from physical controls to semantic meaning.
///
/// # Examples
///
/// ```
/// use dictapi_pad::mapping::table::ControlMapping;
/// use dictapi_pad::mapping::hat::HatDirection;
/// use dictapi_pad::mapping::SemanticButton;
///
/// let mapping = ControlMapping::default();
/// assert_eq!(mapping.button_for_index(0), Some(SemanticButton::Play));
/// assert_eq!(mapping.button_for_index(42), None);
/// assert_eq!(mapping.hat_bit_for_position(HatDirection::Left), SemanticButton::Left);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ControlMapping {
    buttons: Vec<SemanticButton>,
    hat: [SemanticButton; 4],
    axes: Vec<AxisProfile>,
}

impl Default for ControlMapping {
    fn default() -> Self {
        Self::new(DEFAULT_BUTTONS.to_vec(), DEFAULT_HAT, DEFAULT_AXES.to_vec())
    }
}

impl ControlMapping {
    /// Creates a mapping table from its three parts.
    #[must_use]
    pub fn new(
        buttons: Vec<SemanticButton>,
        hat: [SemanticButton; 4],
        axes: Vec<AxisProfile>,
    ) -> Self {
        Self { buttons, hat, axes }
    }

    /// Returns the semantic button at `raw_index`, or `None` past the table end.
    #[must_use]
    pub fn button_for_index(&self, raw_index: usize) -> Option<SemanticButton> {
        self.buttons.get(raw_index).copied()
    }

    /// Returns the semantic button bound to one hat direction.
    #[must_use]
    pub fn hat_bit_for_position(&self, position: HatDirection) -> SemanticButton {
        self.hat[position.position()]
    }

    /// Returns the speed lane bound to axis `raw_index`, if any.
    #[must_use]
    pub fn axis_for_index(&self, raw_index: usize) -> Option<&AxisProfile> {
        self.axes.iter().find(|profile| profile.index == raw_index)
    }

    /// Number of mapped button positions.
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Iterates the hat bindings in position order.
    pub fn hat_bindings(&self) -> impl Iterator<Item = (HatDirection, SemanticButton)> + '_ {
        HAT_DIRECTIONS
            .iter()
            .map(move |&direction| (direction, self.hat_bit_for_position(direction)))
    }
}
