//! Error types for alifba-core.

use thiserror::Error;

/// Errors that can occur while building a content store.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid content pack: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate letter id {0}")]
    DuplicateLetter(u32),

    #[error("duplicate word id {0}")]
    DuplicateWord(u32),

    #[error("word {word} is tagged with unknown letter {letter}")]
    UnknownLetterTag { word: u32, letter: u32 },
}

/// Errors raised by invalid calls into a quiz session or speak drill.
///
/// These never represent a corrupted session: the state is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    #[error("'{0}' is not one of the offered options")]
    UnknownOption(String),
}

/// Errors from a progress store.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("progress storage error: {0}")]
    Storage(String),
}
