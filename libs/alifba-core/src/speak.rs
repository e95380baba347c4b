//! Speak drill: the learner says a word and the recognized text is graded.

use crate::error::QuizError;
use crate::matching::{is_lenient_match, normalized_similarity};
use crate::progress::ProgressRecorder;
use crate::quiz::{build_cards, Clock, QuizCard, SessionSummary, EMPTY_STATE_MESSAGE};
use crate::types::{Drillable, DrillSettings, QuizDirection};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Grader state for a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeState {
    Waiting,
    Retry,
    Correct,
    Incorrect,
}

impl GradeState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Correct | Self::Incorrect)
    }
}

/// Outcome of grading one utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub state: GradeState,
    pub attempts_remaining: u32,
    /// Display-only closeness of the attempt, 0.0 to 1.0.
    pub similarity: f64,
    pub heard: String,
}

/// Grades attempts at one target word.
#[derive(Debug, Clone)]
pub struct SpeechGrader {
    target: String,
    attempts_remaining: u32,
    state: GradeState,
}

impl SpeechGrader {
    pub fn new(target: impl Into<String>, attempts: u32) -> Self {
        Self {
            target: target.into(),
            attempts_remaining: attempts,
            state: GradeState::Waiting,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn state(&self) -> GradeState {
        self.state
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    /// Grade a recognized utterance. Empty or garbled text consumes an attempt.
    pub fn grade(&mut self, recognized: &str) -> Result<Verdict, QuizError> {
        if self.state.is_resolved() {
            return Err(QuizError::InvalidTransition {
                action: "grade",
                phase: "resolved",
            });
        }

        self.state = if is_lenient_match(&self.target, recognized) {
            GradeState::Correct
        } else {
            self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
            if self.attempts_remaining > 0 {
                GradeState::Retry
            } else {
                GradeState::Incorrect
            }
        };

        Ok(Verdict {
            state: self.state,
            attempts_remaining: self.attempts_remaining,
            similarity: normalized_similarity(&self.target, recognized),
            heard: recognized.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SpeakPhase {
    Idle,
    /// Started with no words; show [`EMPTY_STATE_MESSAGE`].
    Empty,
    Listening,
    Resolved { correct: bool },
    Finished,
}

impl SpeakPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Empty => "empty",
            Self::Listening => "listening",
            Self::Resolved { .. } => "resolved",
            Self::Finished => "finished",
        }
    }
}

/// Read-only snapshot of a speak drill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakState {
    pub phase: SpeakPhase,
    /// Prompt is the meaning, answer is the script form to say.
    pub card: Option<QuizCard>,
    pub last_verdict: Option<Verdict>,
    pub attempts_remaining: u32,
    pub word_index: usize,
    pub session_length: usize,
    pub remaining: usize,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SpeakState {
    fn idle(session_length: usize) -> Self {
        Self {
            phase: SpeakPhase::Idle,
            card: None,
            last_verdict: None,
            attempts_remaining: 0,
            word_index: 0,
            session_length,
            remaining: 0,
            correct_count: 0,
            incorrect_count: 0,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SpeakPhase::Finished
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        (self.phase == SpeakPhase::Empty).then_some(EMPTY_STATE_MESSAGE)
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        match (&self.phase, self.started_at, self.finished_at) {
            (SpeakPhase::Finished, Some(started), Some(finished)) => Some(SessionSummary {
                correct: self.correct_count,
                incorrect: self.incorrect_count,
                asked: self.word_index,
                started_at: started,
                elapsed_ms: (finished - started).num_milliseconds().max(0),
            }),
            _ => None,
        }
    }
}

/// Sequences words through a [`SpeechGrader`] each.
pub struct SpeakDrill<P, R = StdRng> {
    settings: DrillSettings,
    recorder: P,
    rng: R,
    clock: Clock,
    working_set: Vec<QuizCard>,
    grader: Option<SpeechGrader>,
    state: SpeakState,
}

impl<P: ProgressRecorder> SpeakDrill<P, StdRng> {
    pub fn new(settings: DrillSettings, recorder: P) -> Self {
        Self::with_rng(settings, recorder, StdRng::from_os_rng())
    }
}

impl<P: ProgressRecorder, R: Rng> SpeakDrill<P, R> {
    pub fn with_rng(settings: DrillSettings, recorder: P, rng: R) -> Self {
        let session_length = settings.session_length as usize;
        Self {
            settings,
            recorder,
            rng,
            clock: Utc::now,
            working_set: Vec::new(),
            grader: None,
            state: SpeakState::idle(session_length),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &SpeakState {
        &self.state
    }

    pub fn into_recorder(self) -> P {
        self.recorder
    }

    pub fn start<T: Drillable>(&mut self, items: &[T]) -> &SpeakState {
        let (_, working_set) = build_cards(items, QuizDirection::MeaningToScript, &mut self.rng);
        self.working_set = working_set;
        self.grader = None;
        self.state = SpeakState::idle(self.settings.session_length as usize);
        self.state.remaining = self.working_set.len();

        if self.working_set.is_empty() {
            self.state.phase = SpeakPhase::Empty;
            return &self.state;
        }

        self.state.started_at = Some((self.clock)());
        self.draw();
        &self.state
    }

    /// Grade what the recognizer heard for the current word.
    pub fn grade(&mut self, recognized: &str) -> Result<&SpeakState, QuizError> {
        if self.state.phase != SpeakPhase::Listening {
            return Err(QuizError::InvalidTransition {
                action: "grade",
                phase: self.state.phase.name(),
            });
        }
        let (Some(grader), Some(card)) = (self.grader.as_mut(), self.state.card.as_ref()) else {
            return Err(QuizError::InvalidTransition {
                action: "grade",
                phase: self.state.phase.name(),
            });
        };

        let verdict = grader.grade(recognized)?;
        self.state.attempts_remaining = verdict.attempts_remaining;

        let resolved = match verdict.state {
            GradeState::Correct => Some(true),
            GradeState::Incorrect => Some(false),
            GradeState::Waiting | GradeState::Retry => None,
        };
        if let Some(correct) = resolved {
            let subject = card.subject;
            if correct {
                self.state.correct_count += 1;
            } else {
                self.state.incorrect_count += 1;
            }
            if let Err(e) = self.recorder.record_outcome(subject, correct, (self.clock)()) {
                tracing::warn!(%subject, error = %e, "failed to record speak outcome");
            }
            self.state.phase = SpeakPhase::Resolved { correct };
        }

        self.state.last_verdict = Some(verdict);
        Ok(&self.state)
    }

    /// Move on once the current word is resolved.
    pub fn advance(&mut self) -> Result<&SpeakState, QuizError> {
        if !matches!(self.state.phase, SpeakPhase::Resolved { .. }) {
            return Err(QuizError::InvalidTransition {
                action: "advance",
                phase: self.state.phase.name(),
            });
        }
        self.draw();
        Ok(&self.state)
    }

    fn draw(&mut self) {
        self.state.last_verdict = None;
        let next = if self.state.word_index >= self.state.session_length {
            None
        } else {
            self.working_set.pop()
        };

        match next {
            Some(card) => {
                let grader = SpeechGrader::new(card.answer.clone(), self.settings.speak_attempts);
                self.state.attempts_remaining = grader.attempts_remaining();
                self.state.word_index += 1;
                self.state.remaining = self.working_set.len();
                self.state.card = Some(card);
                self.state.phase = SpeakPhase::Listening;
                self.grader = Some(grader);
            }
            None => {
                self.grader = None;
                self.state.card = None;
                self.state.phase = SpeakPhase::Finished;
                self.state.finished_at = Some((self.clock)());
                tracing::debug!(
                    correct = self.state.correct_count,
                    incorrect = self.state.incorrect_count,
                    "speak drill finished"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentStore;
    use crate::progress::{InMemoryProgress, NoopRecorder, ProgressStore};
    use crate::types::{SubjectId, VocabularyItem};
    use pretty_assertions::assert_eq;

    fn drill<P: ProgressRecorder>(length: u32, recorder: P) -> SpeakDrill<P> {
        let settings = DrillSettings {
            session_length: length,
            ..Default::default()
        };
        SpeakDrill::with_rng(settings, recorder, StdRng::seed_from_u64(17))
    }

    fn house() -> Vec<VocabularyItem> {
        let store = ContentStore::builtin();
        vec![store.word(1).cloned().unwrap()]
    }

    #[test]
    fn empty_attempts_run_out() {
        let mut grader = SpeechGrader::new("بيت", 3);
        assert_eq!(grader.state(), GradeState::Waiting);

        let mut states = vec![];
        let mut remaining = vec![grader.attempts_remaining()];
        for _ in 0..3 {
            let verdict = grader.grade("").unwrap();
            states.push(verdict.state);
            remaining.push(verdict.attempts_remaining);
        }

        assert_eq!(
            states,
            vec![GradeState::Retry, GradeState::Retry, GradeState::Incorrect]
        );
        assert_eq!(remaining, vec![3, 2, 1, 0]);
        assert!(grader.grade("بيت").is_err());
    }

    #[test]
    fn match_after_retry() {
        let mut grader = SpeechGrader::new("بيت", 3);
        assert_eq!(grader.grade("قلم").unwrap().state, GradeState::Retry);
        let verdict = grader.grade(" بيت ").unwrap();
        assert_eq!(verdict.state, GradeState::Correct);
        assert_eq!(verdict.attempts_remaining, 2);
        assert_eq!(verdict.similarity, 1.0);
        assert_eq!(verdict.heard, "بيت");
    }

    #[test]
    fn zero_attempts_fails_immediately() {
        let mut grader = SpeechGrader::new("بيت", 0);
        assert_eq!(grader.grade("").unwrap().state, GradeState::Incorrect);
    }

    #[test]
    fn drill_records_failed_word() {
        let mut progress = InMemoryProgress::new();
        {
            let mut speak = drill(10, &mut progress);
            speak.start(&house());
            assert_eq!(speak.state().phase, SpeakPhase::Listening);
            assert_eq!(speak.state().card.as_ref().unwrap().answer, "بيت");

            for _ in 0..2 {
                assert_eq!(speak.grade("").unwrap().phase, SpeakPhase::Listening);
            }
            let state = speak.grade("").unwrap();
            assert_eq!(state.phase, SpeakPhase::Resolved { correct: false });
            assert_eq!(state.attempts_remaining, 0);

            assert!(speak.grade("بيت").is_err());
            assert!(speak.advance().unwrap().is_finished());
        }

        let counter = progress.counter(SubjectId::Word(1)).unwrap().unwrap();
        assert_eq!(counter.incorrect_count, 1);
        assert_eq!(counter.correct_count, 0);
    }

    #[test]
    fn retries_are_not_recorded() {
        let mut progress = InMemoryProgress::new();
        {
            let mut speak = drill(10, &mut progress);
            speak.start(&house());
            speak.grade("شيء").unwrap();
            speak.grade("هذا بيت").unwrap();
        }
        let counter = progress.counter(SubjectId::Word(1)).unwrap().unwrap();
        assert_eq!(counter.attempts(), 1);
        assert_eq!(counter.correct_count, 1);
    }

    #[test]
    fn drill_stops_at_length() {
        let words = ContentStore::builtin().words().to_vec();
        let mut speak = drill(4, NoopRecorder);
        speak.start(&words);

        let mut said = 0;
        while !speak.state().is_finished() {
            let target = speak.state().card.as_ref().unwrap().answer.clone();
            speak.grade(&target).unwrap();
            speak.advance().unwrap();
            said += 1;
        }

        assert_eq!(said, 4);
        let summary = speak.state().summary().unwrap();
        assert_eq!(summary.correct, 4);
        assert_eq!(summary.asked, 4);
    }

    #[test]
    fn empty_drill() {
        let mut speak = drill(10, NoopRecorder);
        let state = speak.start::<VocabularyItem>(&[]);
        assert_eq!(state.empty_message(), Some(EMPTY_STATE_MESSAGE));
        assert!(speak.grade("x").is_err());
    }

    #[test]
    fn advance_requires_resolution() {
        let mut speak = drill(10, NoopRecorder);
        speak.start(&house());
        assert_eq!(
            speak.advance().unwrap_err(),
            QuizError::InvalidTransition {
                action: "advance",
                phase: "listening"
            }
        );
    }
}
