//! Core drill library for the Arabic alphabet and vocabulary trainer.
//!
//! Provides:
//! - Built-in letter and word content (plus JSON content packs)
//! - Multiple-choice quiz session controller
//! - Lenient grading for spoken-word attempts and the speak drill
//! - Per-subject progress counters
//! - Shared types (LetterItem, VocabularyItem, DrillSettings, etc.)

pub mod content;
pub mod error;
pub mod matching;
pub mod progress;
pub mod quiz;
pub mod speak;
pub mod types;

pub use content::ContentStore;
pub use error::{ContentError, ProgressError, QuizError};
pub use matching::{is_lenient_match, levenshtein_distance, normalize, normalized_similarity};
pub use progress::{InMemoryProgress, NoopRecorder, ProgressRecorder, ProgressStore, ProgressSummary};
pub use quiz::{
    Clock, Phase, Question, QuizCard, QuizSession, SessionState, SessionSummary, EMPTY_STATE_MESSAGE,
};
pub use speak::{GradeState, SpeakDrill, SpeakPhase, SpeakState, SpeechGrader, Verdict};
pub use types::{
    Category, Drillable, DrillSettings, LetterItem, LetterPosition, LetterTag, ProgressCounter,
    QuizDirection, SettingsOverride, SubjectId, SubjectKind, VocabularyItem,
};
