#![forbid(unsafe_code)]

pub mod files;
pub mod repository;
pub mod sqlite;

pub use files::{FileProgressRepository, LevelDirectory};
pub use repository::{
    InMemoryRepository, LevelRepository, ProgressRepository, Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
