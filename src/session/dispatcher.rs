//! # Dispatcher
//!
//! Entry point of the translation core. Receives raw button, axis and hat
//! events, runs them through the mapping table, the hat edge detector and the
//! state machine, and reports the commands to emit.
//!
//! ## Usage
//!
//! ```
//! use dictapi_pad::mapping::table::ControlMapping;
//! use dictapi_pad::session::command::Command;
//! use dictapi_pad::session::dispatcher::Dispatcher;
//!
//! let mut dispatcher = Dispatcher::new(ControlMapping::default(), 3);
//!
//! let outcome = dispatcher.on_button_event(0, true); // A: play
//! assert_eq!(outcome.commands, vec![Command::Play]);
//! assert!(!outcome.stop);
//! ```

use tracing::{debug, warn};

use super::command::Command;
use super::state_machine::{DeleteGesture, SessionState, StateMachine, Transition};
use crate::controller::event::RawEvent;
use crate::mapping::hat::HatEdgeDetector;
use crate::mapping::table::ControlMapping;
use crate::mapping::ButtonEdge;

/// Only the first hat of a device is tracked.
pub const SUPPORTED_HAT: usize = 0;

/// Commands produced by one raw event, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    pub commands: Vec<Command>,
    /// The session should end after these commands are written.
    pub stop: bool,
}

impl Dispatch {
    fn none() -> Self {
        Self::default()
    }

    fn push(&mut self, transition: Transition) {
        if let Some(command) = transition.command {
            self.commands.push(command);
        }
        self.stop |= transition.stop;
    }
}

/// Owns all session state: mapping, hat mask and state machine.
///
/// Not thread-safe; drive it from the single event loop.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    mapping: ControlMapping,
    hat: HatEdgeDetector,
    machine: StateMachine,
}

impl Dispatcher {
    /// Creates a dispatcher at session start (Initial state, hat released).
    #[must_use]
    pub fn new(mapping: ControlMapping, quit_threshold: u32) -> Self {
        Self {
            mapping,
            hat: HatEdgeDetector::new(),
            machine: StateMachine::new(quit_threshold),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    #[must_use]
    pub fn delete_gesture(&self) -> DeleteGesture {
        self.machine.delete_gesture()
    }

    #[must_use]
    pub fn hat_mask(&self) -> u8 {
        self.hat.mask()
    }

    #[must_use]
    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    /// Routes any raw event to the matching handler.
    pub fn dispatch(&mut self, event: &RawEvent) -> Dispatch {
        debug!("{}", event);

        match *event {
            RawEvent::Button { index, pressed } => self.on_button_event(index, pressed),
            RawEvent::Axis { index, value } => self.on_axis_event(index, value),
            RawEvent::Hat { hat, mask } => self.on_hat_event(hat, mask),
            RawEvent::Quit => Dispatch { commands: Vec::new(), stop: true },
            RawEvent::Unknown { kind, code } => {
                warn!("Unhandled event type: {} (code {})", kind, code);
                Dispatch::none()
            }
        }
    }

    /// Handles a button press or release by raw index.
    ///
    /// Indices without a mapping are dropped.
    pub fn on_button_event(&mut self, raw_index: usize, pressed: bool) -> Dispatch {
        let Some(button) = self.mapping.button_for_index(raw_index) else {
            debug!("Button {} not mapped, ignoring", raw_index);
            return Dispatch::none();
        };

        let mut outcome = Dispatch::none();
        outcome.push(self.machine.handle(ButtonEdge { button, pressed }));
        outcome
    }

    /// Handles axis motion; mapped axes emit a speed command.
    pub fn on_axis_event(&mut self, raw_index: usize, raw_value: i16) -> Dispatch {
        let Some(profile) = self.mapping.axis_for_index(raw_index) else {
            debug!("Axis {} not mapped, ignoring", raw_index);
            return Dispatch::none();
        };

        let sample = profile.scaler().sample(raw_index, raw_value);
        Dispatch {
            commands: vec![Command::Speed(sample.normalized_fraction)],
            stop: false,
        }
    }

    /// Handles a hat mask; only hat 0 is supported.
    pub fn on_hat_event(&mut self, hat_id: usize, raw_mask: u8) -> Dispatch {
        if hat_id != SUPPORTED_HAT {
            warn!("Multiple hats not supported, ignoring hat {}", hat_id);
            return Dispatch::none();
        }

        let edges = self.hat.update(raw_mask, &self.mapping);
        let mut outcome = Dispatch::none();
        for edge in edges {
            debug!("hat {} {}", edge.button, if edge.pressed { "dn" } else { "up" });
            outcome.push(self.machine.handle(edge));
        }
        outcome
    }
}
