//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;

use roster_core::{CoreError, Route, Student, StudentId};

/// A finished request, delivered back to the screen that issued it.
#[derive(Debug, Clone)]
pub enum Payload {
    List(Result<Vec<Student>, CoreError>),
    Detail(StudentId, Result<Option<Student>, CoreError>),
    Prefill(StudentId, Result<Option<Student>, CoreError>),
    Submitted(Result<Option<Student>, CoreError>),
    Deleted(Result<(), CoreError>),
    Toggled {
        now_active: bool,
        result: Result<Option<Student>, CoreError>,
    },
}

impl Payload {
    fn kind(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Detail(..) => "detail",
            Self::Prefill(..) => "prefill",
            Self::Submitted(_) => "submit",
            Self::Deleted(_) => "delete",
            Self::Toggled { .. } => "toggle",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ──
    /// Unmount the current screen and mount the one for `Route`.
    Navigate(Route),
    ToggleHelp,

    // ── Data ──
    /// Result of a request, tagged with the mount generation of the screen
    /// that issued it. Stale generations are dropped by the app loop.
    Loaded { generation: u64, payload: Payload },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quit => f.write_str("quit"),
            Self::Tick => f.write_str("tick"),
            Self::Render => f.write_str("render"),
            Self::Resize(w, h) => write!(f, "resize {w}x{h}"),
            Self::Navigate(route) => write!(f, "navigate {route}"),
            Self::ToggleHelp => f.write_str("help"),
            Self::Loaded {
                generation,
                payload,
            } => write!(f, "loaded {} (gen {generation})", payload.kind()),
        }
    }
}
