//! Per-subject progress tracking.

use crate::error::ProgressError;
use crate::types::{ProgressCounter, SubjectId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, ProgressError>;

/// Receives attempt outcomes from quiz sessions and speak drills.
pub trait ProgressRecorder {
    fn record_outcome(&mut self, subject: SubjectId, success: bool, at: DateTime<Utc>) -> Result<()>;
}

impl<T: ProgressRecorder + ?Sized> ProgressRecorder for &mut T {
    fn record_outcome(&mut self, subject: SubjectId, success: bool, at: DateTime<Utc>) -> Result<()> {
        (**self).record_outcome(subject, success, at)
    }
}

/// Recorder plus read access to the stored counters.
pub trait ProgressStore: ProgressRecorder {
    fn counter(&self, subject: SubjectId) -> Result<Option<ProgressCounter>>;
    fn counters(&self) -> Result<Vec<ProgressCounter>>;
}

/// Discards every outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl ProgressRecorder for NoopRecorder {
    fn record_outcome(&mut self, _subject: SubjectId, _success: bool, _at: DateTime<Utc>) -> Result<()> {
        Ok(())
    }
}

/// Counters kept in memory, created on first attempt.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgress {
    counters: HashMap<SubjectId, ProgressCounter>,
}

impl InMemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressRecorder for InMemoryProgress {
    fn record_outcome(&mut self, subject: SubjectId, success: bool, at: DateTime<Utc>) -> Result<()> {
        self.counters
            .entry(subject)
            .and_modify(|c| c.record(success, at))
            .or_insert_with(|| ProgressCounter::first_attempt(subject, success, at));
        Ok(())
    }
}

impl ProgressStore for InMemoryProgress {
    fn counter(&self, subject: SubjectId) -> Result<Option<ProgressCounter>> {
        Ok(self.counters.get(&subject).cloned())
    }

    fn counters(&self) -> Result<Vec<ProgressCounter>> {
        let mut all: Vec<_> = self.counters.values().cloned().collect();
        all.sort_by_key(|c| c.subject);
        Ok(all)
    }
}

/// Totals over a set of counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub subjects_practiced: usize,
    pub correct: u64,
    pub incorrect: u64,
    pub accuracy: f64,
}

impl ProgressSummary {
    pub fn from_counters(counters: &[ProgressCounter]) -> Self {
        let correct: u64 = counters.iter().map(|c| u64::from(c.correct_count)).sum();
        let incorrect: u64 = counters.iter().map(|c| u64::from(c.incorrect_count)).sum();
        let total = correct + incorrect;

        Self {
            subjects_practiced: counters.iter().filter(|c| c.attempts() > 0).count(),
            correct,
            incorrect,
            accuracy: if total == 0 {
                0.0
            } else {
                correct as f64 / total as f64
            },
        }
    }
}
