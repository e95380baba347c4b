mod cli;
mod commands;
mod db;
mod state;

use alifba_core::ContentStore;
use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, SettingsAction};
use db::SqliteRepository;
use state::AppState;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn get_db_path() -> PathBuf {
    // Use app data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("alifba")
        .join("progress.db")
}

fn load_content(path: Option<&Path>) -> anyhow::Result<ContentStore> {
    let Some(path) = path else {
        return Ok(ContentStore::builtin());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading content pack {}", path.display()))?;
    let content = ContentStore::from_json(&json)
        .with_context(|| format!("loading content pack {}", path.display()))?;
    tracing::info!(
        letters = content.letters().len(),
        words = content.words().len(),
        "loaded content pack"
    );
    Ok(content)
}

pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Ensure data directory exists
    let db_path = cli.db.clone().unwrap_or_else(get_db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    tracing::debug!(path = %db_path.display(), "opening database");
    let repository = SqliteRepository::open(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;
    let content = load_content(cli.content.as_deref())?;
    let mut state = AppState::new(repository, content);

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Letters => commands::content::list_letters(&state, &mut out),
        Command::Words(filter) => commands::content::list_words(&state, filter, &mut out),
        Command::Quiz(args) => commands::quiz::run_quiz(&mut state, args, &mut input, &mut out),
        Command::Speak(args) => commands::speak::run_speak(&mut state, args, &mut input, &mut out),
        Command::Stats => commands::stats::show_stats(&state, &mut out),
        Command::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show_settings(&state, &mut out),
            SettingsAction::Set(overrides) => {
                commands::settings::update_settings(&state, overrides, &mut out)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_content_without_pack() {
        let content = load_content(None).unwrap();
        assert_eq!(content.letters().len(), 28);
    }

    #[test]
    fn missing_pack_is_an_error() {
        let err = load_content(Some(Path::new("/nonexistent/pack.json"))).unwrap_err();
        assert!(err.to_string().contains("reading content pack"));
    }

    #[test]
    fn db_path_ends_with_app_dir() {
        assert!(get_db_path().ends_with("alifba/progress.db"));
    }
}
