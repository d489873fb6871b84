use async_trait::async_trait;
use escape_core::model::{Language, Level, Progress};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only source of level definitions, one ordered sequence per track.
#[async_trait]
pub trait LevelRepository: Send + Sync {
    /// Fetch the ordered levels of a track.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the track has no levels, or
    /// `StorageError::Serialization` if its data cannot be parsed.
    async fn levels(&self, language: Language) -> Result<Vec<Level>, StorageError>;
}

/// Persistence for the learner's progress blob.
///
/// Implementations treat a missing or malformed blob as empty progress;
/// only genuine backend failures are errors.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_progress(&self) -> Result<Progress, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the blob cannot be encoded or written.
    async fn save_progress(&self, progress: &Progress) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear_progress(&self) -> Result<(), StorageError>;
}

pub(crate) fn encode_progress(progress: &Progress) -> Result<String, StorageError> {
    progress
        .encode()
        .map_err(|err| StorageError::Serialization(err.to_string()))
}

/// In-memory repository for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    levels: Arc<Mutex<HashMap<Language, Vec<Level>>>>,
    progress_blob: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the levels of a track.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_levels(&self, language: Language, levels: Vec<Level>) -> Result<(), StorageError> {
        let mut guard = self
            .levels
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(language, levels);
        Ok(())
    }

    /// Overwrite the stored blob with raw text, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn set_progress_blob(&self, raw: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .progress_blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(raw.into());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn progress_blob(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .progress_blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl LevelRepository for InMemoryRepository {
    async fn levels(&self, language: Language) -> Result<Vec<Level>, StorageError> {
        let guard = self
            .levels
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.get(&language) {
            Some(levels) if !levels.is_empty() => Ok(levels.clone()),
            _ => Err(StorageError::NotFound),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<Progress, StorageError> {
        let raw = self.progress_blob()?;
        Ok(Progress::decode_or_default(raw.as_deref()))
    }

    async fn save_progress(&self, progress: &Progress) -> Result<(), StorageError> {
        let raw = encode_progress(progress)?;
        self.set_progress_blob(raw)
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        let mut guard = self
            .progress_blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Level and progress repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub levels: Arc<dyn LevelRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn new(levels: Arc<dyn LevelRepository>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { levels, progress }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let levels: Arc<dyn LevelRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self { levels, progress }
    }
}
