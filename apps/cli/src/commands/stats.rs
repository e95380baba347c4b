//! Progress statistics.

use crate::db::SessionRepository;
use crate::state::AppState;
use alifba_core::{ProgressStore, ProgressSummary};
use anyhow::Context;
use std::io::Write;

const RECENT_SESSIONS: usize = 5;

pub fn show_stats<W: Write>(state: &AppState, out: &mut W) -> anyhow::Result<()> {
    let counters = state.repository.counters().context("loading progress")?;
    let totals = ProgressSummary::from_counters(&counters);

    writeln!(
        out,
        "Practiced {} items: {} correct, {} incorrect ({:.0}% accuracy)",
        totals.subjects_practiced,
        totals.correct,
        totals.incorrect,
        totals.accuracy * 100.0
    )?;

    for counter in &counters {
        writeln!(
            out,
            "  {:<24} {:>3} / {:<3} {:>4.0}%  last {}",
            state.content.label(counter.subject),
            counter.correct_count,
            counter.attempts(),
            counter.accuracy() * 100.0,
            counter.last_practiced.format("%Y-%m-%d %H:%M")
        )?;
    }

    let sessions = state
        .repository
        .recent_sessions(RECENT_SESSIONS)
        .context("loading sessions")?;
    if !sessions.is_empty() {
        writeln!(out, "\nRecent sessions:")?;
        for session in sessions {
            writeln!(
                out,
                "  {}  {:<5} {:<28} {}/{}",
                session.summary.started_at.format("%Y-%m-%d %H:%M"),
                session.kind.as_str(),
                session.label,
                session.summary.correct,
                session.summary.asked
            )?;
        }
    }
    Ok(())
}
