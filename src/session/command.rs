//! # Transport Commands
//!
//! The vocabulary written to the command channel, one line per command.
//!
//! | Command | Line |
//! |---------|------|
//! | Play | `play` |
//! | Pause | `pause` |
//! | Stop | `stop` |
//! | Record | `record` |
//! | Resume | `resume` |
//! | SetMarker | `set_marker` |
//! | RmMarker | `rm_marker` |
//! | Delete | `delete` |
//! | Navigate | `# todo` |
//! | Speed | `speed <fraction>` |
//! | Quit | `quit` |

use std::fmt;

use crate::mapping::SemanticButton;

/// Token written for navigation buttons until seeking is wired up.
pub const NAVIGATION_PLACEHOLDER: &str = "# todo";

/// A semantic transport command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Stop,
    Record,
    Resume,
    SetMarker,
    RmMarker,
    Delete,
    /// Placeholder for Left/Right/Previous/Next; carries the button for logging.
    Navigate(SemanticButton),
    /// Playback speed fraction from an axis lane.
    Speed(f64),
    Quit,
}

impl Command {
    /// The command word, without arguments.
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Stop => "stop",
            Command::Record => "record",
            Command::Resume => "resume",
            Command::SetMarker => "set_marker",
            Command::RmMarker => "rm_marker",
            Command::Delete => "delete",
            Command::Navigate(_) => NAVIGATION_PLACEHOLDER,
            Command::Speed(_) => "speed",
            Command::Quit => "quit",
        }
    }

    /// Numeric argument, if the command carries one.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Command::Speed(fraction) => Some(*fraction),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Speed(fraction) => write!(f, "speed {:.6}", fraction),
            other => f.write_str(other.token()),
        }
    }
}
