//! Interactive multiple-choice quiz.

use super::{filtered_words, is_quit, read_line};
use crate::cli::{QuizArgs, QuizSubject};
use crate::db::{SessionKind, SessionRecord, SessionRepository, SettingsRepository, SqliteRepository};
use crate::state::AppState;
use alifba_core::{
    Drillable, DrillSettings, Phase, ProgressRecorder, QuizDirection, QuizSession, SessionSummary,
    SettingsOverride,
};
use anyhow::Context;
use rand::Rng;
use std::io::{BufRead, Write};

pub fn run_quiz<R: BufRead, W: Write>(
    state: &mut AppState,
    args: &QuizArgs,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<()> {
    if args.subject == QuizSubject::Letters
        && (args.filter.category.is_some() || args.filter.letter.is_some())
    {
        anyhow::bail!("--category and --letter only apply to word quizzes");
    }

    let stored = state.repository.get_settings().context("loading settings")?;
    let settings = DrillSettings::merge(&stored, Some(&SettingsOverride::from(&args.overrides)));
    let direction = QuizDirection::from(args.direction);
    let label = format!(
        "{} {:?}",
        match args.subject {
            QuizSubject::Letters => "letters",
            QuizSubject::Words => "words",
        },
        direction
    );

    let summary = match args.subject {
        QuizSubject::Letters => {
            let letters = state.content.letters().to_vec();
            let quiz = QuizSession::new(settings, direction, &mut state.repository);
            play(quiz, &letters, input, out)?
        }
        QuizSubject::Words => {
            let words = filtered_words(&state.content, &args.filter);
            let quiz = QuizSession::new(settings, direction, &mut state.repository);
            play(quiz, &words, input, out)?
        }
    };

    if let Some(summary) = summary {
        save_session(&state.repository, SessionKind::Quiz, &label, summary);
    }
    Ok(())
}

/// Drive a session from the terminal. Returns the summary if it was completed.
pub(crate) fn play<P, G, T, R, W>(
    mut quiz: QuizSession<P, G>,
    items: &[T],
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<Option<SessionSummary>>
where
    P: ProgressRecorder,
    G: Rng,
    T: Drillable,
    R: BufRead,
    W: Write,
{
    quiz.subscribe(|state| {
        tracing::debug!(
            phase = state.phase.name(),
            question = state.question_index,
            remaining = state.remaining,
            "quiz state changed"
        );
    });
    quiz.start(items);

    if let Some(message) = quiz.state().empty_message() {
        writeln!(out, "{message}")?;
        return Ok(None);
    }

    loop {
        let state = quiz.state().clone();
        match state.phase {
            Phase::Asking => {
                let Some(question) = state.question else {
                    break;
                };
                writeln!(
                    out,
                    "\nQuestion {}/{}: {}",
                    question.number,
                    state.session_length.min(question.number + state.remaining),
                    question.card.prompt
                )?;
                for (idx, option) in question.options.iter().enumerate() {
                    writeln!(out, "  {}) {}", idx + 1, option)?;
                }
                write!(out, "> ")?;
                out.flush()?;

                let Some(line) = read_line(input)? else {
                    writeln!(out, "\nStopped.")?;
                    return Ok(None);
                };
                if is_quit(&line) {
                    writeln!(out, "Stopped.")?;
                    return Ok(None);
                }
                match line.parse::<usize>() {
                    Ok(n) if (1..=question.options.len()).contains(&n) => {
                        quiz.submit(&question.options[n - 1])?;
                    }
                    _ => {
                        writeln!(out, "Pick a number from 1 to {}.", question.options.len())?;
                    }
                }
            }
            Phase::ShowingResult { correct, .. } => {
                if correct {
                    writeln!(out, "Correct!")?;
                } else if let Some(question) = &state.question {
                    writeln!(out, "Not quite. The answer is {}.", question.card.answer)?;
                }
                quiz.advance()?;
            }
            Phase::Finished => {
                let Some(summary) = state.summary() else {
                    break;
                };
                print_summary(out, &summary)?;
                return Ok(Some(summary));
            }
            Phase::Idle | Phase::Empty => break,
        }
    }

    Ok(None)
}

pub(crate) fn print_summary<W: Write>(out: &mut W, summary: &SessionSummary) -> std::io::Result<()> {
    let elapsed = summary.elapsed();
    writeln!(
        out,
        "\nScore: {}/{} in {}m {:02}s",
        summary.correct,
        summary.asked,
        elapsed.num_minutes(),
        elapsed.num_seconds() % 60
    )
}

/// Log and continue on failure; the drill itself already finished.
pub(crate) fn save_session(
    repository: &SqliteRepository,
    kind: SessionKind,
    label: &str,
    summary: SessionSummary,
) {
    let record = SessionRecord::new(kind, label, summary);
    if let Err(e) = repository.insert_session(&record) {
        tracing::warn!(error = %e, "failed to save session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{DirectionArg, Overrides, WordFilter};
    use alifba_core::{Category, ContentStore, ProgressStore};
    use std::io::Cursor;

    fn state() -> AppState {
        AppState::new(SqliteRepository::open_in_memory().unwrap(), ContentStore::builtin())
    }

    fn args(subject: QuizSubject, length: u32) -> QuizArgs {
        QuizArgs {
            subject,
            direction: DirectionArg::ScriptToSound,
            filter: WordFilter::default(),
            overrides: Overrides {
                length: Some(length),
                ..Default::default()
            },
        }
    }

    #[test]
    fn full_session_is_saved() {
        let mut state = state();
        let mut input = Cursor::new("1\n".repeat(5));
        let mut out = Vec::new();

        run_quiz(&mut state, &args(QuizSubject::Letters, 5), &mut input, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Question 1/5"));
        assert!(text.contains("Score: "));

        let sessions = state.repository.recent_sessions(10).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].summary.asked, 5);

        let attempts: u32 = state
            .repository
            .counters()
            .unwrap()
            .iter()
            .map(|c| c.attempts())
            .sum();
        assert_eq!(attempts, 5);
    }

    #[test]
    fn invalid_choice_asks_again() {
        let mut state = state();
        let mut input = Cursor::new("9\nx\n2\n");
        let mut out = Vec::new();

        run_quiz(&mut state, &args(QuizSubject::Letters, 1), &mut input, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Pick a number from 1 to 4.").count(), 2);
        assert_eq!(state.repository.recent_sessions(10).unwrap().len(), 1);
    }

    #[test]
    fn quitting_records_answers_but_not_session() {
        let mut state = state();
        let mut input = Cursor::new("1\nq\n");
        let mut out = Vec::new();

        run_quiz(&mut state, &args(QuizSubject::Letters, 10), &mut input, &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("Stopped."));
        assert!(state.repository.recent_sessions(10).unwrap().is_empty());
        assert_eq!(state.repository.counters().unwrap().len(), 1);
    }

    #[test]
    fn letter_quiz_rejects_word_filters() {
        let mut state = state();
        let mut quiz_args = args(QuizSubject::Letters, 5);
        quiz_args.filter.category = Some(Category::Food);
        let mut out = Vec::new();

        let err = run_quiz(&mut state, &quiz_args, &mut Cursor::new("1\n"), &mut out).unwrap_err();

        assert!(err.to_string().contains("only apply to word quizzes"));
        assert!(out.is_empty());
        assert!(state.repository.counters().unwrap().is_empty());
    }

    #[test]
    fn empty_filter_shows_message() {
        let mut state = state();
        let mut quiz_args = args(QuizSubject::Words, 10);
        quiz_args.filter = WordFilter {
            category: Some(Category::Colors),
            letter: Some(21),
        };
        let mut out = Vec::new();

        run_quiz(&mut state, &quiz_args, &mut Cursor::new(""), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap().trim(),
            alifba_core::EMPTY_STATE_MESSAGE
        );
    }

    #[test]
    fn small_word_set_ends_early() {
        let mut state = state();
        let mut quiz_args = args(QuizSubject::Words, 10);
        quiz_args.filter.category = Some(Category::Colors);
        let mut input = Cursor::new("1\n".repeat(10));
        let mut out = Vec::new();

        run_quiz(&mut state, &quiz_args, &mut input, &mut out).unwrap();

        let sessions = state.repository.recent_sessions(1).unwrap();
        assert_eq!(sessions[0].summary.asked, 4);
        assert!(String::from_utf8(out).unwrap().contains("Question 4/4"));
    }
}
