//! Interactive speak drill.
//!
//! Each input line stands in for what the speech recognizer heard; an empty
//! line is a failed recognition.

use super::quiz::{print_summary, save_session};
use super::{filtered_words, is_quit, read_line};
use crate::cli::SpeakArgs;
use crate::db::{SessionKind, SettingsRepository};
use crate::state::AppState;
use alifba_core::{DrillSettings, GradeState, SettingsOverride, SpeakDrill, SpeakPhase};
use anyhow::Context;
use std::io::{BufRead, Write};

pub fn run_speak<R: BufRead, W: Write>(
    state: &mut AppState,
    args: &SpeakArgs,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<()> {
    let stored = state.repository.get_settings().context("loading settings")?;
    let settings = DrillSettings::merge(&stored, Some(&SettingsOverride::from(&args.overrides)));
    let words = filtered_words(&state.content, &args.filter);

    let mut drill = SpeakDrill::new(settings, &mut state.repository);
    drill.start(&words);

    if let Some(message) = drill.state().empty_message() {
        writeln!(out, "{message}")?;
        return Ok(());
    }

    let summary = loop {
        let current = drill.state().clone();
        match current.phase {
            SpeakPhase::Listening => {
                let Some(card) = &current.card else {
                    break None;
                };
                if current.last_verdict.is_none() {
                    writeln!(
                        out,
                        "\nWord {}: say {} ({})",
                        current.word_index, card.answer, card.prompt
                    )?;
                }
                write!(out, "heard> ")?;
                out.flush()?;

                let Some(line) = read_line(input)? else {
                    writeln!(out, "\nStopped.")?;
                    break None;
                };
                if is_quit(&line) {
                    writeln!(out, "Stopped.")?;
                    break None;
                }

                let graded = drill.grade(&line)?;
                if let Some(verdict) = &graded.last_verdict {
                    if verdict.state == GradeState::Retry {
                        writeln!(
                            out,
                            "Not quite ({:.0}% close). {} tries left.",
                            verdict.similarity * 100.0,
                            verdict.attempts_remaining
                        )?;
                    }
                }
            }
            SpeakPhase::Resolved { correct } => {
                if correct {
                    writeln!(out, "Correct!")?;
                } else if let Some(card) = &current.card {
                    writeln!(out, "Out of tries. The word is {}.", card.answer)?;
                }
                drill.advance()?;
            }
            SpeakPhase::Finished => {
                let summary = current.summary();
                if let Some(summary) = &summary {
                    print_summary(out, summary)?;
                }
                break summary;
            }
            SpeakPhase::Idle | SpeakPhase::Empty => break None,
        }
    };

    drop(drill);
    if let Some(summary) = summary {
        save_session(&state.repository, SessionKind::Speak, "speak", summary);
    }
    Ok(())
}
