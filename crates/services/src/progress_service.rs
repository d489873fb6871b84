use std::sync::Arc;

use escape_core::model::{Language, Progress};
use storage::repository::ProgressRepository;
use tracing::info;

use crate::error::ProgressServiceError;

/// Sole writer of the learner's persisted progress.
#[derive(Clone)]
pub struct ProgressService {
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted progress; absent or malformed data gives empty progress.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the backend cannot be read.
    pub async fn load(&self) -> Result<Progress, ProgressServiceError> {
        Ok(self.repo.load_progress().await?)
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the backend cannot be written.
    pub async fn save(&self, progress: &Progress) -> Result<(), ProgressServiceError> {
        self.repo.save_progress(progress).await?;
        Ok(())
    }

    /// Forget all progress on every track.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the backend cannot be written.
    pub async fn clear(&self) -> Result<(), ProgressServiceError> {
        self.repo.clear_progress().await?;
        info!("progress cleared");
        Ok(())
    }

    /// Apply one solved level on top of `progress` and persist the result.
    ///
    /// `progress` is updated in place even when saving fails, so the session
    /// keeps showing what the learner achieved.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the save fails.
    pub async fn record_completion(
        &self,
        progress: &mut Progress,
        language: Language,
        index: usize,
        score: u32,
    ) -> Result<(), ProgressServiceError> {
        progress.record_completion(language, index, score);
        self.save(progress).await
    }
}
