//! Shared error types for the services crate.

use thiserror::Error;

use escape_core::model::Language;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::game::{Action, Screen};

/// Errors emitted by `LevelService` and `SolutionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LevelServiceError {
    #[error("no levels found for track {0}")]
    TrackNotFound(Language),
    #[error("track {language} has no level {index}")]
    LevelNotFound { language: Language, index: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LevelServiceError {
    /// True for the unknown-track and unknown-index cases.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LevelServiceError::TrackNotFound(_) | LevelServiceError::LevelNotFound { .. }
        )
    }
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by a `Transport`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("not found")]
    NotFound,
    #[error("invalid server url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("server responded with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Local(#[from] LevelServiceError),
}

impl TransportError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            TransportError::NotFound => true,
            TransportError::Local(err) => err.is_not_found(),
            _ => false,
        }
    }
}

/// Errors emitted by the game session state machine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error("{action:?} is not available on the {from:?} screen")]
    InvalidTransition { from: Screen, action: Action },
    #[error("level {0} is locked")]
    LevelLocked(usize),
    #[error("level {0} does not exist in this track")]
    NoSuchLevel(usize),
    #[error("could not load levels: {0}")]
    LevelsUnavailable(#[source] TransportError),
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
