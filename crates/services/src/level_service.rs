use std::sync::Arc;

use escape_core::model::{Language, Level};
use storage::repository::{LevelRepository, StorageError};
use tracing::warn;

use crate::error::LevelServiceError;

/// Read access to the level store.
#[derive(Clone)]
pub struct LevelService {
    levels: Arc<dyn LevelRepository>,
}

impl LevelService {
    #[must_use]
    pub fn new(levels: Arc<dyn LevelRepository>) -> Self {
        Self { levels }
    }

    /// Fetch the ordered levels of a track.
    ///
    /// Missing, empty and unparsable tracks all come back as
    /// `TrackNotFound`; the parse failure is logged.
    ///
    /// # Errors
    ///
    /// Returns `LevelServiceError::TrackNotFound` if the track has no usable
    /// levels, or `LevelServiceError::Storage` for other backend failures.
    pub async fn levels(&self, language: Language) -> Result<Vec<Level>, LevelServiceError> {
        match self.levels.levels(language).await {
            Ok(levels) => Ok(levels),
            Err(StorageError::NotFound) => Err(LevelServiceError::TrackNotFound(language)),
            Err(StorageError::Serialization(reason)) => {
                warn!(%language, %reason, "level data could not be parsed");
                Err(LevelServiceError::TrackNotFound(language))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Fetch one level by its index in the track.
    ///
    /// # Errors
    ///
    /// Returns `LevelServiceError::LevelNotFound` if the index is out of range,
    /// plus everything [`LevelService::levels`] can return.
    pub async fn level(&self, language: Language, index: usize) -> Result<Level, LevelServiceError> {
        let mut levels = self.levels(language).await?;
        if index >= levels.len() {
            return Err(LevelServiceError::LevelNotFound { language, index });
        }
        Ok(levels.swap_remove(index))
    }

    /// Number of levels per track, zero for tracks that cannot be loaded.
    pub async fn level_counts(&self) -> Vec<(Language, usize)> {
        let mut counts = Vec::with_capacity(Language::ALL.len());
        for language in Language::ALL {
            let count = match self.levels(language).await {
                Ok(levels) => levels.len(),
                Err(err) => {
                    if !err.is_not_found() {
                        warn!(%language, error = %err, "failed to count levels");
                    }
                    0
                }
            };
            counts.push((language, count));
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape_core::model::Criteria;
    use storage::repository::InMemoryRepository;

    fn build_level(name: &str) -> Level {
        Level {
            name: name.to_string(),
            description: String::new(),
            code: String::new(),
            hints: Vec::new(),
            max_score: None,
            error_message: None,
            criteria: Criteria::default(),
        }
    }

    fn service_with(levels: Vec<Level>) -> LevelService {
        let repo = InMemoryRepository::new();
        repo.insert_levels(Language::Css, levels).unwrap();
        LevelService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn level_by_index() {
        let service = service_with(vec![build_level("a"), build_level("b"), build_level("c")]);
        let level = service.level(Language::Css, 1).await.unwrap();
        assert_eq!(level.name, "b");
    }

    #[tokio::test]
    async fn out_of_range_index_is_level_not_found() {
        let service = service_with(vec![build_level("a")]);
        let err = service.level(Language::Css, 1).await.unwrap_err();
        assert!(matches!(err, LevelServiceError::LevelNotFound { index: 1, .. }));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn missing_track_is_track_not_found() {
        let service = service_with(vec![build_level("a")]);
        let err = service.levels(Language::Html).await.unwrap_err();
        assert!(matches!(err, LevelServiceError::TrackNotFound(Language::Html)));
    }

    #[tokio::test]
    async fn counts_cover_every_track() {
        let service = service_with(vec![build_level("a"), build_level("b")]);
        let counts = service.level_counts().await;
        assert_eq!(counts.len(), Language::ALL.len());
        assert!(counts.contains(&(Language::Css, 2)));
        assert!(counts.contains(&(Language::Sql, 0)));
    }
}
