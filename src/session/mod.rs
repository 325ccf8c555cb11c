//! # Session Module
//!
//! The transport session: state machine, dispatcher and event loop.
//!
//! This module handles:
//! - The transport command vocabulary
//! - The command state machine with its delete and quit gestures
//! - Dispatching raw events through the mapping layer
//! - Running the single-threaded event loop against a command sink

pub mod command;
pub mod dispatcher;
pub mod runner;
pub mod state_machine;
