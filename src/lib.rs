//! # dictapi-pad Library
//!
//! Drive a dictation recorder with a game controller.
//!
//! This library translates joystick buttons, axes and hats into transport
//! commands (`play`, `record`, `set_marker`, `delete`, `speed`, `quit`, ...)
//! through a configurable mapping table and a small session state machine.

pub mod config;
pub mod controller;
pub mod error;
pub mod mapping;
pub mod output;
pub mod session;
