//! Local SQLite database operations.

pub mod error;
pub mod repository;
pub mod schema;

pub use repository::{SessionKind, SessionRecord, SessionRepository, SettingsRepository, SqliteRepository};
