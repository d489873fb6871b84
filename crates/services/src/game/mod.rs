mod log;
mod screen;
mod session;
mod view;
mod workflow;

// Public API of the game subsystem.
pub use crate::error::GameError;
pub use log::{LogEntry, LogKind, TerminalLog};
pub use screen::{Action, Screen};
pub use session::{HintPanel, NO_MORE_HINTS, Session};
pub use view::{EscapeView, LevelCard, MapView, PuzzleView, SuccessView};
pub use workflow::{GameLoop, SubmitOutcome};
