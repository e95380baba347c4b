//! Drill settings commands.

use crate::cli::Overrides;
use crate::db::SettingsRepository;
use crate::state::AppState;
use alifba_core::{DrillSettings, SettingsOverride};
use anyhow::Context;
use std::io::Write;

pub fn show_settings<W: Write>(state: &AppState, out: &mut W) -> anyhow::Result<()> {
    let settings = state.repository.get_settings().context("loading settings")?;
    print_settings(out, &settings)
}

pub fn update_settings<W: Write>(
    state: &AppState,
    overrides: &Overrides,
    out: &mut W,
) -> anyhow::Result<()> {
    let stored = state.repository.get_settings().context("loading settings")?;
    let merged = DrillSettings::merge(&stored, Some(&SettingsOverride::from(overrides)));
    state
        .repository
        .save_settings(&merged)
        .context("saving settings")?;
    tracing::info!(?merged, "settings saved");
    print_settings(out, &merged)
}

fn print_settings<W: Write>(out: &mut W, settings: &DrillSettings) -> anyhow::Result<()> {
    writeln!(out, "session length:   {}", settings.session_length)?;
    writeln!(out, "distractors:      {}", settings.distractor_count)?;
    writeln!(out, "speak attempts:   {}", settings.speak_attempts)?;
    Ok(())
}
