//! File-backed adapters: one JSON file per track, and the progress blob as a
//! single JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use escape_core::model::{Language, Level, Progress};

use crate::repository::{LevelRepository, ProgressRepository, StorageError, encode_progress};

/// Levels read from `<dir>/<language>.json` on every fetch.
#[derive(Debug, Clone)]
pub struct LevelDirectory {
    dir: PathBuf,
}

impl LevelDirectory {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, language: Language) -> PathBuf {
        self.dir.join(format!("{}.json", language.id()))
    }
}

#[async_trait]
impl LevelRepository for LevelDirectory {
    async fn levels(&self, language: Language) -> Result<Vec<Level>, StorageError> {
        let raw = match tokio::fs::read_to_string(self.path_for(language)).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(StorageError::NotFound),
            Err(err) => return Err(err.into()),
        };

        let levels: Vec<Level> = serde_json::from_str(&raw)
            .map_err(|err| StorageError::Serialization(format!("{language}.json: {err}")))?;
        if levels.is_empty() {
            return Err(StorageError::NotFound);
        }
        Ok(levels)
    }
}

/// Progress blob kept in a single JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// reader never sees a half-written blob.
#[derive(Debug, Clone)]
pub struct FileProgressRepository {
    path: PathBuf,
}

impl FileProgressRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ProgressRepository for FileProgressRepository {
    async fn load_progress(&self) -> Result<Progress, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Progress::decode_or_default(Some(&raw))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Progress::new()),
            // Non-UTF-8 content is a corrupt blob, not a backend failure.
            Err(err) if err.kind() == ErrorKind::InvalidData => Ok(Progress::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn save_progress(&self, progress: &Progress) -> Result<(), StorageError> {
        let raw = encode_progress(progress)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
