//! Core types for the drill application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a letter inside a written word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterPosition {
    Isolated,
    Initial,
    Medial,
    Final,
}

impl LetterPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isolated => "isolated",
            Self::Initial => "initial",
            Self::Medial => "medial",
            Self::Final => "final",
        }
    }
}

/// Marks where a given letter appears in a vocabulary word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterTag {
    pub letter_id: u32,
    pub position: LetterPosition,
}

/// Vocabulary category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Home,
    School,
    Food,
    Family,
    Nature,
    Animals,
    Colors,
    Numbers,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Home,
        Self::School,
        Self::Food,
        Self::Family,
        Self::Nature,
        Self::Animals,
        Self::Colors,
        Self::Numbers,
    ];

    /// Get the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::School => "school",
            Self::Food => "food",
            Self::Family => "family",
            Self::Nature => "nature",
            Self::Animals => "animals",
            Self::Colors => "colors",
            Self::Numbers => "numbers",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// A letter of the alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterItem {
    pub id: u32,
    /// Isolated written form.
    pub script: String,
    pub transliteration: String,
    /// Letter name, e.g. "bāʾ".
    pub name: String,
    /// 1-based position in the alphabet.
    pub ordinal: u32,
}

/// A vocabulary word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: u32,
    pub script: String,
    pub transliteration: String,
    pub translation: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub letters: Vec<LetterTag>,
}

impl VocabularyItem {
    /// Whether the word is tagged with the given letter, in any position.
    pub fn has_letter(&self, letter_id: u32) -> bool {
        self.letters.iter().any(|tag| tag.letter_id == letter_id)
    }
}

/// Kind of subject a progress counter refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Letter,
    Word,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::Word => "word",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "letter" => Some(Self::Letter),
            "word" => Some(Self::Word),
            _ => None,
        }
    }
}

/// Reference to a letter or a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SubjectId {
    Letter(u32),
    Word(u32),
}

impl SubjectId {
    pub fn new(kind: SubjectKind, id: u32) -> Self {
        match kind {
            SubjectKind::Letter => Self::Letter(id),
            SubjectKind::Word => Self::Word(id),
        }
    }

    pub fn kind(&self) -> SubjectKind {
        match self {
            Self::Letter(_) => SubjectKind::Letter,
            Self::Word(_) => SubjectKind::Word,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Self::Letter(id) | Self::Word(id) => *id,
        }
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind().as_str(), self.id())
    }
}

/// Correct/incorrect tally for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressCounter {
    pub subject: SubjectId,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub last_practiced: DateTime<Utc>,
}

impl ProgressCounter {
    /// Counter created by the first recorded attempt on a subject.
    pub fn first_attempt(subject: SubjectId, success: bool, at: DateTime<Utc>) -> Self {
        let mut counter = Self {
            subject,
            correct_count: 0,
            incorrect_count: 0,
            last_practiced: at,
        };
        counter.record(success, at);
        counter
    }

    pub fn record(&mut self, success: bool, at: DateTime<Utc>) {
        if success {
            self.correct_count = self.correct_count.saturating_add(1);
        } else {
            self.incorrect_count = self.incorrect_count.saturating_add(1);
        }
        self.last_practiced = at;
    }

    pub fn attempts(&self) -> u32 {
        self.correct_count + self.incorrect_count
    }

    /// Share of correct attempts, 0.0 when never attempted.
    pub fn accuracy(&self) -> f64 {
        match self.attempts() {
            0 => 0.0,
            n => self.correct_count as f64 / n as f64,
        }
    }
}

/// Something that can be turned into a quiz prompt.
pub trait Drillable {
    fn subject(&self) -> SubjectId;
    fn script(&self) -> &str;
    fn sound(&self) -> &str;
    /// Translation for words, letter name for letters.
    fn meaning(&self) -> &str;
}

impl Drillable for LetterItem {
    fn subject(&self) -> SubjectId {
        SubjectId::Letter(self.id)
    }

    fn script(&self) -> &str {
        &self.script
    }

    fn sound(&self) -> &str {
        &self.transliteration
    }

    fn meaning(&self) -> &str {
        &self.name
    }
}

impl Drillable for VocabularyItem {
    fn subject(&self) -> SubjectId {
        SubjectId::Word(self.id)
    }

    fn script(&self) -> &str {
        &self.script
    }

    fn sound(&self) -> &str {
        &self.transliteration
    }

    fn meaning(&self) -> &str {
        &self.translation
    }
}

/// Which side of an item is shown and which is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizDirection {
    ScriptToSound,
    SoundToScript,
    ScriptToMeaning,
    MeaningToScript,
}

impl Default for QuizDirection {
    fn default() -> Self {
        Self::ScriptToSound
    }
}

impl QuizDirection {
    pub fn prompt<'a, T: Drillable>(&self, item: &'a T) -> &'a str {
        match self {
            Self::ScriptToSound | Self::ScriptToMeaning => item.script(),
            Self::SoundToScript => item.sound(),
            Self::MeaningToScript => item.meaning(),
        }
    }

    pub fn answer<'a, T: Drillable>(&self, item: &'a T) -> &'a str {
        match self {
            Self::ScriptToSound => item.sound(),
            Self::ScriptToMeaning => item.meaning(),
            Self::SoundToScript | Self::MeaningToScript => item.script(),
        }
    }
}

/// Drill configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillSettings {
    /// Questions per session (N).
    pub session_length: u32,
    /// Wrong options shown next to the correct one.
    pub distractor_count: u32,
    /// Tries per word in the speak drill.
    pub speak_attempts: u32,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            session_length: 10,
            distractor_count: 3,
            speak_attempts: 3,
        }
    }
}

/// Per-run overrides (all fields optional).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distractor_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speak_attempts: Option<u32>,
}

impl DrillSettings {
    /// Merge stored settings with optional overrides.
    pub fn merge(stored: &DrillSettings, overrides: Option<&SettingsOverride>) -> Self {
        match overrides {
            Some(o) => Self {
                session_length: o.session_length.unwrap_or(stored.session_length),
                distractor_count: o.distractor_count.unwrap_or(stored.distractor_count),
                speak_attempts: o.speak_attempts.unwrap_or(stored.speak_attempts),
            },
            None => stored.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counter_starts_from_first_attempt() {
        let now = Utc::now();
        let counter = ProgressCounter::first_attempt(SubjectId::Word(4), false, now);
        assert_eq!(counter.correct_count, 0);
        assert_eq!(counter.incorrect_count, 1);
        assert_eq!(counter.last_practiced, now);
    }

    #[test]
    fn accuracy_without_attempts_is_zero() {
        let counter = ProgressCounter {
            subject: SubjectId::Letter(1),
            correct_count: 0,
            incorrect_count: 0,
            last_practiced: Utc::now(),
        };
        assert_eq!(counter.accuracy(), 0.0);
    }

    #[test]
    fn subject_id_display_and_round_trip_kind() {
        let subject = SubjectId::new(SubjectKind::Letter, 7);
        assert_eq!(subject.to_string(), "letter:7");
        assert_eq!(SubjectKind::from_str(subject.kind().as_str()), Some(SubjectKind::Letter));
    }

    #[test]
    fn subject_id_serializes_tagged() {
        let json = serde_json::to_string(&SubjectId::Word(3)).unwrap();
        assert_eq!(json, r#"{"kind":"word","id":3}"#);
    }

    #[test]
    fn direction_picks_fields() {
        let letter = LetterItem {
            id: 2,
            script: "ب".into(),
            transliteration: "b".into(),
            name: "bāʾ".into(),
            ordinal: 2,
        };
        assert_eq!(QuizDirection::ScriptToSound.prompt(&letter), "ب");
        assert_eq!(QuizDirection::ScriptToSound.answer(&letter), "b");
        assert_eq!(QuizDirection::MeaningToScript.prompt(&letter), "bāʾ");
        assert_eq!(QuizDirection::MeaningToScript.answer(&letter), "ب");
    }

    #[test]
    fn merge_prefers_overrides() {
        let stored = DrillSettings::default();
        let overrides = SettingsOverride {
            session_length: Some(5),
            ..Default::default()
        };
        let merged = DrillSettings::merge(&stored, Some(&overrides));
        assert_eq!(merged.session_length, 5);
        assert_eq!(merged.distractor_count, 3);
        assert_eq!(DrillSettings::merge(&stored, None), stored);
    }

    #[test]
    fn category_parses_its_own_name() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Some(category));
        }
        assert_eq!(Category::from_str("sports"), None);
    }
}
