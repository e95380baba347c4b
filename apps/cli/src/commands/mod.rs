//! Terminal commands.

pub mod content;
pub mod quiz;
pub mod settings;
pub mod speak;
pub mod stats;

use crate::cli::WordFilter;
use alifba_core::{ContentStore, VocabularyItem};
use std::io::BufRead;

/// Words matching the filter, in store order.
pub(crate) fn filtered_words(content: &ContentStore, filter: &WordFilter) -> Vec<VocabularyItem> {
    content
        .words()
        .iter()
        .filter(|w| filter.category.map_or(true, |c| w.category == c))
        .filter(|w| filter.letter.map_or(true, |id| w.has_letter(id)))
        .cloned()
        .collect()
}

/// Next trimmed input line, `None` on end of input.
///
/// Invalid UTF-8 is replaced rather than rejected, so garbled input still
/// reaches the drill.
pub(crate) fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
}

/// Whether the learner asked to stop.
pub(crate) fn is_quit(line: &str) -> bool {
    matches!(line, "q" | "quit" | "exit")
}
