//! Letter and word listings.

use super::filtered_words;
use crate::cli::WordFilter;
use crate::state::AppState;
use std::io::Write;

pub fn list_letters<W: Write>(state: &AppState, out: &mut W) -> anyhow::Result<()> {
    for letter in state.content.letters() {
        writeln!(
            out,
            "{:>2}. {}  {:<4} {}",
            letter.ordinal, letter.script, letter.transliteration, letter.name
        )?;
    }
    Ok(())
}

pub fn list_words<W: Write>(state: &AppState, filter: &WordFilter, out: &mut W) -> anyhow::Result<()> {
    let words = filtered_words(&state.content, filter);
    if words.is_empty() {
        writeln!(out, "{}", alifba_core::EMPTY_STATE_MESSAGE)?;
        return Ok(());
    }

    for word in words {
        writeln!(
            out,
            "{:>3}. {}  {:<10} {:<10} [{}]",
            word.id,
            word.script,
            word.transliteration,
            word.translation,
            word.category.as_str()
        )?;
        for tag in &word.letters {
            if let Some(letter) = state.content.letter(tag.letter_id) {
                writeln!(out, "       {} {}", letter.script, tag.position.as_str())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteRepository;
    use alifba_core::{Category, ContentStore};

    fn state() -> AppState {
        AppState::new(SqliteRepository::open_in_memory().unwrap(), ContentStore::builtin())
    }

    #[test]
    fn letters_listed_in_order() {
        let mut out = Vec::new();
        list_letters(&state(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 28);
        assert!(text.lines().next().unwrap().contains("alif"));
        assert!(text.lines().last().unwrap().contains("yāʾ"));
    }

    #[test]
    fn words_show_letter_positions() {
        let filter = WordFilter {
            category: Some(Category::Nature),
            letter: Some(21),
        };
        let mut out = Vec::new();
        list_words(&state(), &filter, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("moon"));
        assert!(text.contains("ق initial"));
    }

    #[test]
    fn no_matching_words() {
        let filter = WordFilter {
            category: Some(Category::Colors),
            letter: Some(21),
        };
        let mut out = Vec::new();
        list_words(&state(), &filter, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap().trim(),
            alifba_core::EMPTY_STATE_MESSAGE
        );
    }
}
