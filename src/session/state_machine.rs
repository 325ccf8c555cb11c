//! # Command State Machine
//!
//! Decides which transport command a semantic button edge produces and which
//! session state follows.
//!
//! ## States
//!
//! | State | Meaning |
//! |-------|---------|
//! | Initial | Start state; Mark and Delete are disabled |
//! | Default | Idle and ready |
//! | Playing | Playback running |
//! | RecordingPlain | Recording while Record is held |
//! | RecordingLocked | Recording latched by Play; Record pauses while held |
//!
//! ## Transitions
//!
//! | Button | Event | From | Emits | To |
//! |--------|-------|------|-------|----|
//! | Play | press | Initial/Default | play | Playing |
//! | Play | press | Playing | pause | Default |
//! | Play | press | RecordingPlain | - | RecordingLocked |
//! | Play | press | RecordingLocked | stop | Default |
//! | Record | press | Initial/Default | record | RecordingPlain |
//! | Record | press | RecordingLocked | pause | - |
//! | Record | release | RecordingPlain | pause | Default |
//! | Record | release | RecordingLocked | resume | - |
//! | Mark | press | Default/Playing | set_marker | - |
//! | RemoveMark | press | Initial/Default/Playing | rm_marker | - |
//! | Delete | press | Default | arm, then delete | - |
//! | Left/Right/Previous/Next | press | any | `# todo` | - |
//! | Quit | press | any | quit once enough are held | - |
//!
//! Everything else leaves the state alone and emits nothing.
//!
//! ## Gestures
//!
//! Delete needs two stages: the first press arms, a second press while armed
//! emits `delete`. Releases step back down one stage at a time.
//!
//! Quit needs several quit controls held at the same time. The `quit` token is
//! emitted once, on the press that brings the hold count up to the threshold.

use tracing::debug;

use super::command::Command;
use crate::mapping::{ButtonEdge, SemanticButton};

/// Default number of concurrently held quit controls needed to quit.
pub const DEFAULT_QUIT_THRESHOLD: u32 = 3;

/// Node of the command state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Initial,
    Default,
    Playing,
    RecordingPlain,
    RecordingLocked,
}

/// Progress of the two-stage delete confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeleteGesture {
    #[default]
    Inactive,
    Armed,
    Acknowledged,
}

impl DeleteGesture {
    /// One stage down, as caused by releasing a delete control.
    #[must_use]
    fn released(self) -> Self {
        match self {
            DeleteGesture::Acknowledged => DeleteGesture::Armed,
            DeleteGesture::Armed | DeleteGesture::Inactive => DeleteGesture::Inactive,
        }
    }
}

/// Count of quit controls currently held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuitHoldCounter {
    held: u32,
    threshold: u32,
}

impl QuitHoldCounter {
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self { held: 0, threshold }
    }

    #[must_use]
    pub fn held(&self) -> u32 {
        self.held
    }

    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Registers a press; returns `true` when this press commits the quit.
    pub fn press(&mut self) -> bool {
        self.held = self.held.saturating_add(1);
        self.held == self.threshold
    }

    /// Registers a release; never drops below zero.
    pub fn release(&mut self) {
        self.held = self.held.saturating_sub(1);
    }
}

/// Result of one state machine step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub command: Option<Command>,
    pub state: SessionState,
    pub delete: DeleteGesture,
}

impl Step {
    fn emit(command: Command, state: SessionState, delete: DeleteGesture) -> Self {
        Self { command: Some(command), state, delete }
    }

    fn silent(state: SessionState, delete: DeleteGesture) -> Self {
        Self { command: None, state, delete }
    }
}

/// The transition function for every button except Quit.
///
/// Quit depends on the hold counter and is handled by [`StateMachine::handle`];
/// here it is a no-op like Unused.
#[must_use]
pub fn transition(state: SessionState, delete: DeleteGesture, edge: ButtonEdge) -> Step {
    use SemanticButton as B;
    use SessionState as S;

    let unchanged = Step::silent(state, delete);

    match (edge.button, edge.pressed, state) {
        (B::Play, true, S::Initial | S::Default) => Step::emit(Command::Play, S::Playing, delete),
        (B::Play, true, S::Playing) => Step::emit(Command::Pause, S::Default, delete),
        (B::Play, true, S::RecordingPlain) => Step::silent(S::RecordingLocked, delete),
        (B::Play, true, S::RecordingLocked) => Step::emit(Command::Stop, S::Default, delete),

        (B::Record, true, S::Initial | S::Default) => {
            Step::emit(Command::Record, S::RecordingPlain, delete)
        }
        (B::Record, true, S::RecordingLocked) => Step::emit(Command::Pause, state, delete),
        (B::Record, false, S::RecordingPlain) => Step::emit(Command::Pause, S::Default, delete),
        (B::Record, false, S::RecordingLocked) => Step::emit(Command::Resume, state, delete),

        (B::Mark, true, S::Default | S::Playing) => Step::emit(Command::SetMarker, state, delete),
        (B::RemoveMark, true, S::Initial | S::Default | S::Playing) => {
            Step::emit(Command::RmMarker, state, delete)
        }

        (B::Delete, _, S::Initial) => unchanged,
        (B::Delete, true, S::Default) => match delete {
            DeleteGesture::Inactive => Step::silent(state, DeleteGesture::Armed),
            DeleteGesture::Armed => Step::emit(Command::Delete, state, DeleteGesture::Acknowledged),
            DeleteGesture::Acknowledged => unchanged,
        },
        (B::Delete, false, _) => Step::silent(state, delete.released()),

        (button, true, _) if button.is_navigation() => {
            Step::emit(Command::Navigate(button), state, delete)
        }

        _ => unchanged,
    }
}

/// Outcome of handling one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub command: Option<Command>,
    /// Set when the quit gesture committed; the event loop should stop.
    pub stop: bool,
}

/// The session: state, delete gesture and quit hold counter together.
///
/// These three values decide the reaction to the next edge; nothing else does.
///
/// # Examples
///
/// ```
/// use dictapi_pad::mapping::{ButtonEdge, SemanticButton};
/// use dictapi_pad::session::command::Command;
/// use dictapi_pad::session::state_machine::{SessionState, StateMachine};
///
/// let mut machine = StateMachine::new(3);
/// let outcome = machine.handle(ButtonEdge::press(SemanticButton::Play));
/// assert_eq!(outcome.command, Some(Command::Play));
/// assert_eq!(machine.state(), SessionState::Playing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMachine {
    state: SessionState,
    delete: DeleteGesture,
    quit: QuitHoldCounter,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_QUIT_THRESHOLD)
    }
}

impl StateMachine {
    /// Creates a machine in [`SessionState::Initial`].
    #[must_use]
    pub fn new(quit_threshold: u32) -> Self {
        Self {
            state: SessionState::Initial,
            delete: DeleteGesture::Inactive,
            quit: QuitHoldCounter::new(quit_threshold),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn delete_gesture(&self) -> DeleteGesture {
        self.delete
    }

    #[must_use]
    pub fn quit_counter(&self) -> QuitHoldCounter {
        self.quit
    }

    /// Applies one button edge.
    pub fn handle(&mut self, edge: ButtonEdge) -> Transition {
        match edge.button {
            SemanticButton::Quit => return self.handle_quit(edge.pressed),
            SemanticButton::Unused => {
                debug!("Unused control {}", if edge.pressed { "pressed" } else { "released" });
                return Transition { command: None, stop: false };
            }
            _ => {}
        }

        let step = transition(self.state, self.delete, edge);

        if step.command.is_none() && step.state == self.state && step.delete == self.delete {
            debug!(
                "No transition for {} {} in {:?}",
                edge.button,
                if edge.pressed { "press" } else { "release" },
                self.state
            );
        } else if step.state != self.state {
            debug!("Session state {:?} -> {:?}", self.state, step.state);
        }

        self.state = step.state;
        self.delete = step.delete;

        Transition { command: step.command, stop: false }
    }

    fn handle_quit(&mut self, pressed: bool) -> Transition {
        if !pressed {
            self.quit.release();
            debug!("Quit released ({}/{} held)", self.quit.held(), self.quit.threshold());
            return Transition { command: None, stop: false };
        }

        let commit = self.quit.press();
        debug!("Quit pressed ({}/{} held)", self.quit.held(), self.quit.threshold());

        if commit {
            Transition { command: Some(Command::Quit), stop: true }
        } else {
            Transition { command: None, stop: false }
        }
    }
}
