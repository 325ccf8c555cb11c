//! # Controller Module
//!
//! Joystick input handling.
//!
//! This module handles:
//! - Joystick detection and connection via evdev
//! - Translating evdev events into raw button, axis and hat events
//! - SDL-style button/axis numbering so mapping tables stay portable

pub mod event;
pub mod joystick;
