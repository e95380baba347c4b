//! Command-line arguments.

use alifba_core::{Category, QuizDirection, SettingsOverride};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "alifba", version, about = "Arabic alphabet and vocabulary drills")]
pub struct Cli {
    /// Progress database (defaults to the platform data directory).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// JSON content pack to use instead of the built-in letters and words.
    #[arg(long, global = true)]
    pub content: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the alphabet.
    Letters,
    /// List vocabulary.
    Words(WordFilter),
    /// Multiple-choice quiz.
    Quiz(QuizArgs),
    /// Say each word; type what the recognizer heard.
    Speak(SpeakArgs),
    /// Progress counters and recent sessions.
    Stats,
    /// Show or change drill settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct WordFilter {
    /// Only words in this category.
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,

    /// Only words tagged with this letter id.
    #[arg(long)]
    pub letter: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuizSubject {
    Letters,
    Words,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    ScriptToSound,
    SoundToScript,
    ScriptToMeaning,
    MeaningToScript,
}

impl From<DirectionArg> for QuizDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::ScriptToSound => Self::ScriptToSound,
            DirectionArg::SoundToScript => Self::SoundToScript,
            DirectionArg::ScriptToMeaning => Self::ScriptToMeaning,
            DirectionArg::MeaningToScript => Self::MeaningToScript,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Questions in this session.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub length: Option<u32>,

    /// Wrong options per question.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=10))]
    pub distractors: Option<u32>,

    /// Tries per word in the speak drill.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: Option<u32>,
}

impl From<&Overrides> for SettingsOverride {
    fn from(o: &Overrides) -> Self {
        Self {
            session_length: o.length,
            distractor_count: o.distractors,
            speak_attempts: o.attempts,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct QuizArgs {
    #[arg(value_enum)]
    pub subject: QuizSubject,

    #[arg(long, value_enum, default_value_t = DirectionArg::ScriptToSound)]
    pub direction: DirectionArg,

    #[command(flatten)]
    pub filter: WordFilter,

    #[command(flatten)]
    pub overrides: Overrides,
}

#[derive(Debug, Clone, Args)]
pub struct SpeakArgs {
    #[command(flatten)]
    pub filter: WordFilter,

    #[command(flatten)]
    pub overrides: Overrides,
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    Show,
    Set(Overrides),
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_str(&s.to_lowercase()).ok_or_else(|| {
        let names: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown category '{s}' (expected one of: {})", names.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quiz_with_overrides() {
        let cli = Cli::try_parse_from([
            "alifba",
            "quiz",
            "words",
            "--direction",
            "meaning-to-script",
            "--category",
            "Food",
            "--length",
            "5",
        ])
        .unwrap();

        let Command::Quiz(args) = cli.command else {
            panic!("expected quiz command");
        };
        assert_eq!(args.subject, QuizSubject::Words);
        assert_eq!(QuizDirection::from(args.direction), QuizDirection::MeaningToScript);
        assert_eq!(args.filter.category, Some(Category::Food));
        assert_eq!(SettingsOverride::from(&args.overrides).session_length, Some(5));
    }

    #[test]
    fn rejects_zero_length() {
        assert!(Cli::try_parse_from(["alifba", "speak", "--length", "0"]).is_err());
    }

    #[test]
    fn rejects_unknown_category() {
        assert!(Cli::try_parse_from(["alifba", "words", "--category", "sports"]).is_err());
    }

    #[test]
    fn global_db_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["alifba", "stats", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }
}
