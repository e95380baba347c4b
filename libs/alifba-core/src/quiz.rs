//! Multiple-choice quiz session controller.
//!
//! A session moves through these phases:
//!
//! ```text
//! Idle --start--> Asking --submit--> ShowingResult --advance--> Asking ...
//!   |                                      |
//!   +--start (no items)--> Empty           +--advance (N asked or set exhausted)--> Finished
//! ```
//!
//! Every transition publishes the new [`SessionState`] to subscribed observers.

use crate::error::QuizError;
use crate::progress::ProgressRecorder;
use crate::types::{Drillable, DrillSettings, QuizDirection, SubjectId};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashSet;

/// Shown when a session is started with no items.
pub const EMPTY_STATE_MESSAGE: &str = "Nothing to practice here yet.";

/// Clock used for session timing.
pub type Clock = fn() -> DateTime<Utc>;

/// One item rendered for a given direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizCard {
    pub subject: SubjectId,
    pub prompt: String,
    pub answer: String,
}

impl QuizCard {
    pub fn from_item<T: Drillable>(item: &T, direction: QuizDirection) -> Self {
        Self {
            subject: item.subject(),
            prompt: direction.prompt(item).to_string(),
            answer: direction.answer(item).to_string(),
        }
    }
}

/// The question currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// 1-based question number.
    pub number: usize,
    pub card: QuizCard,
    pub options: Vec<String>,
}

impl Question {
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.card.answer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    /// Started with no items; show [`EMPTY_STATE_MESSAGE`].
    Empty,
    Asking,
    ShowingResult {
        selected: String,
        correct: bool,
    },
    Finished,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Empty => "empty",
            Self::Asking => "asking",
            Self::ShowingResult { .. } => "showing result",
            Self::Finished => "finished",
        }
    }
}

/// Final counts of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub correct: u32,
    pub incorrect: u32,
    pub asked: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}

impl SessionSummary {
    pub fn elapsed(&self) -> Duration {
        Duration::milliseconds(self.elapsed_ms)
    }
}

/// Read-only snapshot of a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub phase: Phase,
    pub question: Option<Question>,
    /// Questions drawn so far.
    pub question_index: usize,
    pub session_length: usize,
    /// Items left in the working set.
    pub remaining: usize,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SessionState {
    fn idle(session_length: usize) -> Self {
        Self {
            phase: Phase::Idle,
            question: None,
            question_index: 0,
            session_length,
            remaining: 0,
            correct_count: 0,
            incorrect_count: 0,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        (self.phase == Phase::Empty).then_some(EMPTY_STATE_MESSAGE)
    }

    /// Final counts, available once the session has finished.
    pub fn summary(&self) -> Option<SessionSummary> {
        match (&self.phase, self.started_at, self.finished_at) {
            (Phase::Finished, Some(started), Some(finished)) => Some(SessionSummary {
                correct: self.correct_count,
                incorrect: self.incorrect_count,
                asked: self.question_index,
                started_at: started,
                elapsed_ms: (finished - started).num_milliseconds().max(0),
            }),
            _ => None,
        }
    }
}

/// Shuffled working set plus the full pool for distractors.
pub(crate) fn build_cards<T: Drillable, R: Rng + ?Sized>(
    items: &[T],
    direction: QuizDirection,
    rng: &mut R,
) -> (Vec<QuizCard>, Vec<QuizCard>) {
    let pool: Vec<QuizCard> = items
        .iter()
        .map(|item| QuizCard::from_item(item, direction))
        .collect();
    let mut working_set = pool.clone();
    working_set.shuffle(rng);
    (pool, working_set)
}

/// Quiz session controller.
///
/// The recorder and RNG are injected; [`QuizSession::new`] seeds a [`StdRng`]
/// from the OS.
pub struct QuizSession<P, R = StdRng> {
    settings: DrillSettings,
    direction: QuizDirection,
    recorder: P,
    rng: R,
    clock: Clock,
    pool: Vec<QuizCard>,
    working_set: Vec<QuizCard>,
    state: SessionState,
    observers: Vec<Box<dyn FnMut(&SessionState)>>,
}

impl<P: ProgressRecorder> QuizSession<P, StdRng> {
    pub fn new(settings: DrillSettings, direction: QuizDirection, recorder: P) -> Self {
        Self::with_rng(settings, direction, recorder, StdRng::from_os_rng())
    }
}

impl<P: ProgressRecorder, R: Rng> QuizSession<P, R> {
    pub fn with_rng(settings: DrillSettings, direction: QuizDirection, recorder: P, rng: R) -> Self {
        let session_length = settings.session_length as usize;
        Self {
            settings,
            direction,
            recorder,
            rng,
            clock: Utc::now,
            pool: Vec::new(),
            working_set: Vec::new(),
            state: SessionState::idle(session_length),
            observers: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Register an observer called with the new state after every transition.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&SessionState) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn direction(&self) -> QuizDirection {
        self.direction
    }

    pub fn recorder(&self) -> &P {
        &self.recorder
    }

    pub fn into_recorder(self) -> P {
        self.recorder
    }

    /// Start (or restart) a session over `items`.
    pub fn start<T: Drillable>(&mut self, items: &[T]) -> &SessionState {
        let (pool, working_set) = build_cards(items, self.direction, &mut self.rng);
        self.pool = pool;
        self.working_set = working_set;
        self.state = SessionState::idle(self.settings.session_length as usize);
        self.state.remaining = self.working_set.len();

        if self.working_set.is_empty() {
            tracing::debug!("quiz started with no items");
            self.state.phase = Phase::Empty;
            self.notify();
            return &self.state;
        }

        tracing::debug!(
            items = self.working_set.len(),
            length = self.state.session_length,
            direction = ?self.direction,
            "quiz started"
        );
        self.state.started_at = Some((self.clock)());
        self.draw();
        &self.state
    }

    /// Draw the next question, or finish the session.
    ///
    /// Not allowed while a question is waiting for an answer.
    pub fn next_question(&mut self) -> Result<&SessionState, QuizError> {
        match self.state.phase {
            Phase::Idle | Phase::Asking => Err(self.invalid("draw a question")),
            Phase::Empty | Phase::Finished => Ok(&self.state),
            Phase::ShowingResult { .. } => {
                self.draw();
                Ok(&self.state)
            }
        }
    }

    /// Answer the current question with one of its options.
    pub fn submit(&mut self, option: &str) -> Result<&SessionState, QuizError> {
        if self.state.phase != Phase::Asking {
            return Err(self.invalid("submit an answer"));
        }
        let Some(question) = self.state.question.as_ref() else {
            return Err(self.invalid("submit an answer"));
        };
        if !question.options.iter().any(|o| o == option) {
            return Err(QuizError::UnknownOption(option.to_string()));
        }

        let subject = question.card.subject;
        let correct = question.card.answer == option;
        if correct {
            self.state.correct_count += 1;
        } else {
            self.state.incorrect_count += 1;
        }

        if let Err(e) = self.recorder.record_outcome(subject, correct, (self.clock)()) {
            tracing::warn!(%subject, error = %e, "failed to record quiz outcome");
        }

        self.state.phase = Phase::ShowingResult {
            selected: option.to_string(),
            correct,
        };
        self.notify();
        Ok(&self.state)
    }

    /// Move on from a shown result.
    pub fn advance(&mut self) -> Result<&SessionState, QuizError> {
        if !matches!(self.state.phase, Phase::ShowingResult { .. }) {
            return Err(self.invalid("advance"));
        }
        self.next_question()
    }

    fn draw(&mut self) {
        if self.state.question_index >= self.state.session_length {
            self.finish();
            return;
        }
        let Some(target) = self.working_set.pop() else {
            self.finish();
            return;
        };

        let options = self.options_for(&target);
        self.state.question_index += 1;
        self.state.remaining = self.working_set.len();
        self.state.question = Some(Question {
            number: self.state.question_index,
            card: target,
            options,
        });
        self.state.phase = Phase::Asking;
        self.notify();
    }

    /// Correct answer plus up to `distractor_count` other answers, all distinct, shuffled.
    fn options_for(&mut self, target: &QuizCard) -> Vec<String> {
        let mut seen = HashSet::new();
        seen.insert(target.answer.as_str());

        let mut distractors: Vec<&str> = self
            .pool
            .iter()
            .filter(|card| card.subject != target.subject)
            .map(|card| card.answer.as_str())
            .filter(|answer| seen.insert(*answer))
            .collect();
        distractors.shuffle(&mut self.rng);
        distractors.truncate(self.settings.distractor_count as usize);

        let mut options = vec![target.answer.clone()];
        options.extend(distractors.into_iter().map(str::to_string));
        options.shuffle(&mut self.rng);
        options
    }

    fn finish(&mut self) {
        self.state.phase = Phase::Finished;
        self.state.question = None;
        self.state.remaining = self.working_set.len();
        self.state.finished_at = Some((self.clock)());
        tracing::debug!(
            correct = self.state.correct_count,
            incorrect = self.state.incorrect_count,
            "quiz finished"
        );
        self.notify();
    }

    fn invalid(&self, action: &'static str) -> QuizError {
        QuizError::InvalidTransition {
            action,
            phase: self.state.phase.name(),
        }
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer(&self.state);
        }
    }
}
