//! Repository pattern for database access.

use crate::db::error::DbError;
use alifba_core::{
    DrillSettings, ProgressCounter, ProgressError, ProgressRecorder, ProgressStore, SessionSummary,
    SubjectId, SubjectKind,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use uuid::Uuid;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for drill settings.
pub trait SettingsRepository {
    fn get_settings(&self) -> Result<DrillSettings>;
    fn save_settings(&self, settings: &DrillSettings) -> Result<()>;
}

/// Repository for completed sessions.
pub trait SessionRepository {
    fn insert_session(&self, record: &SessionRecord) -> Result<()>;
    fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>>;
}

/// Which drill produced a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Quiz,
    Speak,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quiz => "quiz",
            Self::Speak => "speak",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "quiz" => Some(Self::Quiz),
            "speak" => Some(Self::Speak),
            _ => None,
        }
    }
}

/// Completed session row.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: Uuid,
    pub kind: SessionKind,
    /// What was drilled, e.g. "letters script_to_sound".
    pub label: String,
    pub summary: SessionSummary,
}

impl SessionRecord {
    pub fn new(kind: SessionKind, label: impl Into<String>, summary: SessionSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            label: label.into(),
            summary,
        }
    }
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SETTINGS)?;
        self.conn
            .pragma_update(None, "user_version", super::schema::SCHEMA_VERSION)?;
        Ok(())
    }

    fn upsert_outcome(&self, subject: SubjectId, success: bool, at: DateTime<Utc>) -> Result<()> {
        let (correct, incorrect) = if success { (1, 0) } else { (0, 1) };
        self.conn.execute(
            "INSERT INTO progress (subject_kind, subject_id, correct_count, incorrect_count, last_practiced_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(subject_kind, subject_id) DO UPDATE SET
                correct_count = correct_count + excluded.correct_count,
                incorrect_count = incorrect_count + excluded.incorrect_count,
                last_practiced_at = excluded.last_practiced_at",
            params![
                subject.kind().as_str(),
                subject.id(),
                correct,
                incorrect,
                at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    fn load_counters(&self, filter: Option<SubjectId>) -> Result<Vec<ProgressCounter>> {
        let mut stmt = self.conn.prepare(
            "SELECT subject_kind, subject_id, correct_count, incorrect_count, last_practiced_at
             FROM progress
             WHERE (?1 IS NULL OR subject_kind = ?1) AND (?2 IS NULL OR subject_id = ?2)
             ORDER BY subject_kind, subject_id",
        )?;

        let rows = stmt
            .query_map(
                params![filter.map(|s| s.kind().as_str()), filter.map(|s| s.id())],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, u32>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(kind, id, correct_count, incorrect_count, practiced)| {
                let kind = SubjectKind::from_str(&kind)
                    .ok_or_else(|| DbError::InvalidData(format!("subject kind {kind}")))?;
                Ok(ProgressCounter {
                    subject: SubjectId::new(kind, id),
                    correct_count,
                    incorrect_count,
                    last_practiced: parse_timestamp(&practiced)?,
                })
            })
            .collect()
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::InvalidData(format!("timestamp {value}: {e}")))
}

impl ProgressRecorder for SqliteRepository {
    fn record_outcome(
        &mut self,
        subject: SubjectId,
        success: bool,
        at: DateTime<Utc>,
    ) -> std::result::Result<(), ProgressError> {
        self.upsert_outcome(subject, success, at).map_err(Into::into)
    }
}

impl ProgressStore for SqliteRepository {
    fn counter(&self, subject: SubjectId) -> std::result::Result<Option<ProgressCounter>, ProgressError> {
        Ok(self.load_counters(Some(subject))?.into_iter().next())
    }

    fn counters(&self) -> std::result::Result<Vec<ProgressCounter>, ProgressError> {
        self.load_counters(None).map_err(Into::into)
    }
}

impl SettingsRepository for SqliteRepository {
    fn get_settings(&self) -> Result<DrillSettings> {
        self.conn
            .query_row(
                "SELECT session_length, distractor_count, speak_attempts FROM settings WHERE id = 1",
                [],
                |row| {
                    Ok(DrillSettings {
                        session_length: row.get(0)?,
                        distractor_count: row.get(1)?,
                        speak_attempts: row.get(2)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| DbError::InvalidData("settings row missing".to_string()))
    }

    fn save_settings(&self, settings: &DrillSettings) -> Result<()> {
        self.conn.execute(
            "UPDATE settings SET session_length = ?1, distractor_count = ?2, speak_attempts = ?3 WHERE id = 1",
            params![
                settings.session_length,
                settings.distractor_count,
                settings.speak_attempts
            ],
        )?;
        Ok(())
    }
}

impl SessionRepository for SqliteRepository {
    fn insert_session(&self, record: &SessionRecord) -> Result<()> {
        let summary = &record.summary;
        self.conn.execute(
            "INSERT INTO sessions (id, kind, label, correct_count, incorrect_count, asked, started_at, elapsed_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id.to_string(),
                record.kind.as_str(),
                record.label,
                summary.correct,
                summary.incorrect,
                summary.asked as i64,
                summary.started_at.to_rfc3339(),
                summary.elapsed_ms
            ],
        )?;
        Ok(())
    }

    fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, label, correct_count, incorrect_count, asked, started_at, elapsed_ms
             FROM sessions ORDER BY started_at DESC LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, i64>(7)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, kind, label, correct, incorrect, asked, started_at, elapsed_ms)| {
                Ok(SessionRecord {
                    id: Uuid::parse_str(&id)
                        .map_err(|e| DbError::InvalidData(format!("session id {id}: {e}")))?,
                    kind: SessionKind::from_str(&kind)
                        .ok_or_else(|| DbError::InvalidData(format!("session kind {kind}")))?,
                    label,
                    summary: SessionSummary {
                        correct,
                        incorrect,
                        asked: asked.max(0) as usize,
                        started_at: parse_timestamp(&started_at)?,
                        elapsed_ms,
                    },
                })
            })
            .collect()
    }
}
