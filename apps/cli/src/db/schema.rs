//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local database.
pub const SCHEMA: &str = r#"
-- One counter per practiced letter or word, created on first attempt
CREATE TABLE IF NOT EXISTS progress (
    subject_kind TEXT NOT NULL CHECK (subject_kind IN ('letter', 'word')),
    subject_id INTEGER NOT NULL,
    correct_count INTEGER NOT NULL DEFAULT 0 CHECK (correct_count >= 0),
    incorrect_count INTEGER NOT NULL DEFAULT 0 CHECK (incorrect_count >= 0),
    last_practiced_at TEXT NOT NULL,
    PRIMARY KEY (subject_kind, subject_id)
);

-- Drill settings (single row)
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    session_length INTEGER NOT NULL DEFAULT 10,
    distractor_count INTEGER NOT NULL DEFAULT 3,
    speak_attempts INTEGER NOT NULL DEFAULT 3
);

-- Completed sessions
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    label TEXT NOT NULL,
    correct_count INTEGER NOT NULL,
    incorrect_count INTEGER NOT NULL,
    asked INTEGER NOT NULL,
    started_at TEXT NOT NULL,
    elapsed_ms INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_started ON sessions(started_at);
"#;

/// Initialize settings with defaults.
pub const INIT_SETTINGS: &str = r#"
INSERT OR IGNORE INTO settings (id) VALUES (1);
"#;
