//! Application state.

use crate::db::SqliteRepository;
use alifba_core::ContentStore;

/// State shared by every command.
pub struct AppState {
    pub repository: SqliteRepository,
    pub content: ContentStore,
}

impl AppState {
    pub fn new(repository: SqliteRepository, content: ContentStore) -> Self {
        Self {
            repository,
            content,
        }
    }
}
