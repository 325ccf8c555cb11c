//! # Hat Edge Detector
//!
//! Turns hat (d-pad) bitmask samples into ordered button edges.
//!
//! A hat reports all four directions at once as a 4-bit mask:
//!
//! | Bit | Value | Direction |
//! |-----|-------|-----------|
//! | 0 | 0x1 | Up |
//! | 1 | 0x2 | Right |
//! | 2 | 0x4 | Down |
//! | 3 | 0x8 | Left |
//!
//! Diagonals set two bits. Each sample is compared against the previous one
//! and every changed bit becomes one press or release, always in the order
//! Up, Right, Down, Left.

use super::table::ControlMapping;
use super::ButtonEdge;

/// Only the low four bits of a hat sample are meaningful.
pub const HAT_MASK: u8 = 0x0f;

/// One direction of a hat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HatDirection {
    Up,
    Right,
    Down,
    Left,
}

/// Directions in edge emission order.
pub const HAT_DIRECTIONS: [HatDirection; 4] = [
    HatDirection::Up,
    HatDirection::Right,
    HatDirection::Down,
    HatDirection::Left,
];

impl HatDirection {
    /// Bit position in the hat mask (0..=3).
    #[must_use]
    pub fn position(self) -> usize {
        match self {
            HatDirection::Up => 0,
            HatDirection::Right => 1,
            HatDirection::Down => 2,
            HatDirection::Left => 3,
        }
    }

    #[must_use]
    pub fn bit(self) -> u8 {
        1 << self.position()
    }
}

/// Tracks the last hat mask and reports edges against it.
///
/// # Examples
///
/// ```
/// use dictapi_pad::mapping::hat::HatEdgeDetector;
/// use dictapi_pad::mapping::table::ControlMapping;
/// use dictapi_pad::mapping::{ButtonEdge, SemanticButton};
///
/// let mapping = ControlMapping::default();
/// let mut hat = HatEdgeDetector::new();
///
/// let edges = hat.update(0b0001, &mapping);
/// assert_eq!(edges, vec![ButtonEdge::press(SemanticButton::Previous)]);
///
/// let edges = hat.update(0b0000, &mapping);
/// assert_eq!(edges, vec![ButtonEdge::release(SemanticButton::Previous)]);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HatEdgeDetector {
    mask: u8,
}

impl HatEdgeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mask (low four bits).
    #[must_use]
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Feeds a new mask sample and returns the edges it causes.
    ///
    /// Bits above bit 3 are ignored.
    pub fn update(&mut self, new_mask: u8, mapping: &ControlMapping) -> Vec<ButtonEdge> {
        let new_mask = new_mask & HAT_MASK;
        let diff = self.mask ^ new_mask;

        let edges = HAT_DIRECTIONS
            .iter()
            .filter(|direction| diff & direction.bit() != 0)
            .map(|&direction| ButtonEdge {
                button: mapping.hat_bit_for_position(direction),
                pressed: new_mask & direction.bit() != 0,
            })
            .collect();

        self.mask = new_mask;
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::SemanticButton;

    fn mapping() -> ControlMapping {
        ControlMapping::default()
    }

    #[test]
    fn test_initial_mask_is_zero() {
        assert_eq!(HatEdgeDetector::new().mask(), 0);
    }

    #[test]
    fn test_direction_bits() {
        assert_eq!(HatDirection::Up.bit(), 0x1);
        assert_eq!(HatDirection::Right.bit(), 0x2);
        assert_eq!(HatDirection::Down.bit(), 0x4);
        assert_eq!(HatDirection::Left.bit(), 0x8);
    }

    #[test]
    fn test_two_bits_set_at_once_emit_in_position_order() {
        let mut hat = HatEdgeDetector::new();
        let edges = hat.update(0b0101, &mapping());
        assert_eq!(
            edges,
            vec![
                ButtonEdge::press(SemanticButton::Previous),
                ButtonEdge::press(SemanticButton::Next),
            ]
        );
        assert_eq!(hat.mask(), 0b0101);
    }

    #[test]
    fn test_all_bits_change_in_fixed_order() {
        let mut hat = HatEdgeDetector::new();
        let edges = hat.update(0b1111, &mapping());
        let buttons: Vec<_> = edges.iter().map(|e| e.button).collect();
        assert_eq!(
            buttons,
            vec![
                SemanticButton::Previous,
                SemanticButton::Right,
                SemanticButton::Next,
                SemanticButton::Left,
            ]
        );
        assert!(edges.iter().all(|e| e.pressed));
    }

    #[test]
    fn test_diagonal_roll_releases_and_presses() {
        let mut hat = HatEdgeDetector::new();
        hat.update(0b0011, &mapping()); // up + right

        // Roll to right + down: up released, down pressed, right unchanged
        let edges = hat.update(0b0110, &mapping());
        assert_eq!(
            edges,
            vec![
                ButtonEdge::release(SemanticButton::Previous),
                ButtonEdge::press(SemanticButton::Next),
            ]
        );
    }

    #[test]
    fn test_unchanged_mask_emits_nothing() {
        let mut hat = HatEdgeDetector::new();
        hat.update(0b1000, &mapping());
        assert!(hat.update(0b1000, &mapping()).is_empty());
    }

    #[test]
    fn test_high_bits_ignored() {
        let mut hat = HatEdgeDetector::new();
        let edges = hat.update(0xf2, &mapping());
        assert_eq!(edges, vec![ButtonEdge::press(SemanticButton::Right)]);
        assert_eq!(hat.mask(), 0x02);
    }
}
