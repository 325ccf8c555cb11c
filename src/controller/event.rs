//! # Raw Input Events
//!
//! Device-independent events as delivered by a joystick event source.
//!
//! Numbering follows the SDL joystick conventions: buttons and axes are dense
//! indices starting at 0, axis values are signed 16-bit, hats are 4-bit masks.

use std::fmt;

/// One raw event from the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    /// Button `index` pressed or released.
    Button { index: usize, pressed: bool },
    /// Axis `index` moved to `value`.
    Axis { index: usize, value: i16 },
    /// Hat `hat` reports direction `mask` (Up=1, Right=2, Down=4, Left=8).
    Hat { hat: usize, mask: u8 },
    /// The host asked the session to end (Ctrl+C, device gone, ...).
    Quit,
    /// An event type the session does not understand.
    Unknown { kind: u16, code: u16 },
}

impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawEvent::Button { index, pressed: true } => write!(f, "btn DN: {}", index),
            RawEvent::Button { index, pressed: false } => write!(f, "btn UP: {}", index),
            RawEvent::Axis { index, value } => write!(f, "axis: {}, value: {}", index, value),
            RawEvent::Hat { hat, mask } => write!(f, "hat: {} value: {}", hat, mask),
            RawEvent::Quit => write!(f, "quit"),
            RawEvent::Unknown { kind, code } => write!(f, "unhandled event type: {} code: {}", kind, code),
        }
    }
}
