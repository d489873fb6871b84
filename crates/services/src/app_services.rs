use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::{LevelRepository, ProgressRepository, Storage};
use storage::{FileProgressRepository, LevelDirectory};

use crate::error::AppServicesError;
use crate::game::GameLoop;
use crate::level_service::LevelService;
use crate::progress_service::ProgressService;
use crate::solution_service::SolutionService;
use crate::transport::{LocalTransport, Transport};

/// Assembles the level, solution and progress services over one storage.
#[derive(Clone)]
pub struct AppServices {
    levels: LevelService,
    solutions: SolutionService,
    progress: Arc<ProgressService>,
}

impl AppServices {
    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        let levels = LevelService::new(Arc::clone(&storage.levels));
        let solutions = SolutionService::new(levels.clone());
        let progress = Arc::new(ProgressService::new(Arc::clone(&storage.progress)));
        Self {
            levels,
            solutions,
            progress,
        }
    }

    /// Levels from `levels_dir`, progress in a JSON file at `progress_path`.
    #[must_use]
    pub fn with_progress_file(
        levels_dir: impl Into<PathBuf>,
        progress_path: impl Into<PathBuf>,
    ) -> Self {
        let levels: Arc<dyn LevelRepository> = Arc::new(LevelDirectory::new(levels_dir));
        let progress: Arc<dyn ProgressRepository> =
            Arc::new(FileProgressRepository::new(progress_path));
        Self::from_storage(&Storage::new(levels, progress))
    }

    /// Levels from `levels_dir`, progress in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        levels_dir: impl Into<PathBuf>,
        db_url: &str,
    ) -> Result<Self, AppServicesError> {
        let levels: Arc<dyn LevelRepository> = Arc::new(LevelDirectory::new(levels_dir));
        let storage = Storage::sqlite(levels, db_url).await?;
        Ok(Self::from_storage(&storage))
    }

    /// Levels from `levels_dir`, progress kept only for the life of the process.
    #[must_use]
    pub fn with_ephemeral_progress(levels_dir: impl Into<PathBuf>) -> Self {
        let levels: Arc<dyn LevelRepository> = Arc::new(LevelDirectory::new(levels_dir));
        let progress: Arc<dyn ProgressRepository> =
            Arc::new(storage::InMemoryRepository::new());
        Self::from_storage(&Storage::new(levels, progress))
    }

    #[must_use]
    pub fn levels(&self) -> &LevelService {
        &self.levels
    }

    #[must_use]
    pub fn solutions(&self) -> &SolutionService {
        &self.solutions
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    /// Transport that calls these services directly, without HTTP.
    #[must_use]
    pub fn local_transport(&self) -> LocalTransport {
        LocalTransport::new(self.levels.clone(), self.solutions.clone())
    }

    /// Game loop over `transport`, persisting through these services.
    #[must_use]
    pub fn game_loop(&self, transport: Arc<dyn Transport>) -> GameLoop {
        GameLoop::new(transport, self.progress())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape_core::model::Language;

    #[tokio::test]
    async fn in_memory_services_share_one_store() {
        let services = AppServices::from_storage(&Storage::in_memory());
        let mut progress = services.progress().load().await.unwrap();
        services
            .progress()
            .record_completion(&mut progress, Language::Python, 0, 60)
            .await
            .unwrap();

        let reloaded = services.progress().load().await.unwrap();
        assert_eq!(reloaded.track(Language::Python).score(), 60);
        assert!(services.levels().levels(Language::Python).await.is_err());
    }
}
