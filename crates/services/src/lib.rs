#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod game;
pub mod level_service;
pub mod progress_service;
pub mod solution_service;
pub mod transport;

pub use escape_core::Clock;

pub use app_services::AppServices;
pub use error::{
    AppServicesError, GameError, LevelServiceError, ProgressServiceError, TransportError,
};
pub use game::{GameLoop, Session, SubmitOutcome};
pub use level_service::LevelService;
pub use progress_service::ProgressService;
pub use solution_service::{FALLBACK_REJECTION, SUCCESS_MESSAGE, SolutionService, SolutionVerdict};
pub use transport::{HttpTransport, LocalTransport, SolutionRequest, Transport};
