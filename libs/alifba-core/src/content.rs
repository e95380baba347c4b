//! Letter and vocabulary content.
//!
//! The built-in content is compiled into the binary. A content pack with the
//! same shape can be loaded from JSON:
//!
//! ```json
//! {
//!   "letters": [{"id": 1, "script": "ا", "transliteration": "a", "name": "alif", "ordinal": 1}],
//!   "words": [{"id": 1, "script": "أب", "transliteration": "ab", "translation": "father",
//!              "category": "family"}]
//! }
//! ```

use crate::error::ContentError;
use crate::types::{Category, LetterItem, LetterPosition, LetterTag, SubjectId, VocabularyItem};
use serde::Deserialize;
use std::collections::HashSet;

use crate::types::LetterPosition::{Final, Initial, Medial};

// (script, transliteration, name)
const LETTERS: &[(&str, &str, &str)] = &[
    ("ا", "a", "alif"),
    ("ب", "b", "bāʾ"),
    ("ت", "t", "tāʾ"),
    ("ث", "th", "thāʾ"),
    ("ج", "j", "jīm"),
    ("ح", "ḥ", "ḥāʾ"),
    ("خ", "kh", "khāʾ"),
    ("د", "d", "dāl"),
    ("ذ", "dh", "dhāl"),
    ("ر", "r", "rāʾ"),
    ("ز", "z", "zāy"),
    ("س", "s", "sīn"),
    ("ش", "sh", "shīn"),
    ("ص", "ṣ", "ṣād"),
    ("ض", "ḍ", "ḍād"),
    ("ط", "ṭ", "ṭāʾ"),
    ("ظ", "ẓ", "ẓāʾ"),
    ("ع", "ʿ", "ʿayn"),
    ("غ", "gh", "ghayn"),
    ("ف", "f", "fāʾ"),
    ("ق", "q", "qāf"),
    ("ك", "k", "kāf"),
    ("ل", "l", "lām"),
    ("م", "m", "mīm"),
    ("ن", "n", "nūn"),
    ("ه", "h", "hāʾ"),
    ("و", "w", "wāw"),
    ("ي", "y", "yāʾ"),
];

type WordRow = (
    &'static str,
    &'static str,
    &'static str,
    Category,
    &'static [(u32, LetterPosition)],
);

const WORDS: &[WordRow] = &[
    ("بيت", "bayt", "house", Category::Home, &[(2, Initial), (28, Medial), (3, Final)]),
    ("باب", "bāb", "door", Category::Home, &[(2, Initial), (1, Medial), (2, Final)]),
    ("كتاب", "kitāb", "book", Category::School, &[(22, Initial), (3, Medial), (1, Medial), (2, Final)]),
    ("قلم", "qalam", "pen", Category::School, &[(21, Initial), (23, Medial), (24, Final)]),
    ("مدرسة", "madrasa", "school", Category::School, &[]),
    ("ماء", "māʾ", "water", Category::Food, &[]),
    ("خبز", "khubz", "bread", Category::Food, &[(7, Initial), (2, Medial), (11, Final)]),
    ("تفاح", "tuffāḥ", "apple", Category::Food, &[(3, Initial), (20, Medial), (6, Final)]),
    ("حليب", "ḥalīb", "milk", Category::Food, &[(6, Initial), (23, Medial), (2, Final)]),
    ("شاي", "shāy", "tea", Category::Food, &[]),
    ("أب", "ab", "father", Category::Family, &[]),
    ("أم", "umm", "mother", Category::Family, &[]),
    ("أخ", "akh", "brother", Category::Family, &[]),
    ("أخت", "ukht", "sister", Category::Family, &[]),
    ("ولد", "walad", "boy", Category::Family, &[(27, Initial), (23, Medial), (8, Final)]),
    ("بنت", "bint", "girl", Category::Family, &[(2, Initial), (25, Medial), (3, Final)]),
    ("شمس", "shams", "sun", Category::Nature, &[(13, Initial), (24, Medial), (12, Final)]),
    ("قمر", "qamar", "moon", Category::Nature, &[(21, Initial), (24, Medial), (10, Final)]),
    ("بحر", "baḥr", "sea", Category::Nature, &[(2, Initial), (6, Medial), (10, Final)]),
    ("شجرة", "shajara", "tree", Category::Nature, &[]),
    ("وردة", "warda", "flower", Category::Nature, &[]),
    ("قطة", "qiṭṭa", "cat", Category::Animals, &[]),
    ("كلب", "kalb", "dog", Category::Animals, &[(22, Initial), (23, Medial), (2, Final)]),
    ("حصان", "ḥiṣān", "horse", Category::Animals, &[]),
    ("جمل", "jamal", "camel", Category::Animals, &[(5, Initial), (24, Medial), (23, Final)]),
    ("سمكة", "samaka", "fish", Category::Animals, &[]),
    ("أحمر", "aḥmar", "red", Category::Colors, &[]),
    ("أزرق", "azraq", "blue", Category::Colors, &[]),
    ("أخضر", "akhḍar", "green", Category::Colors, &[]),
    ("أبيض", "abyaḍ", "white", Category::Colors, &[]),
    ("واحد", "wāḥid", "one", Category::Numbers, &[]),
    ("اثنان", "ithnān", "two", Category::Numbers, &[]),
    ("ثلاثة", "thalātha", "three", Category::Numbers, &[]),
];

#[derive(Debug, Deserialize)]
struct ContentPack {
    #[serde(default)]
    letters: Vec<LetterItem>,
    #[serde(default)]
    words: Vec<VocabularyItem>,
}

/// Read-only store of letters and words.
#[derive(Debug, Clone)]
pub struct ContentStore {
    letters: Vec<LetterItem>,
    words: Vec<VocabularyItem>,
}

impl ContentStore {
    /// Build a store, checking id uniqueness and letter tags.
    pub fn new(letters: Vec<LetterItem>, words: Vec<VocabularyItem>) -> Result<Self, ContentError> {
        let mut letter_ids = HashSet::new();
        for letter in &letters {
            if !letter_ids.insert(letter.id) {
                return Err(ContentError::DuplicateLetter(letter.id));
            }
        }

        let mut word_ids = HashSet::new();
        for word in &words {
            if !word_ids.insert(word.id) {
                return Err(ContentError::DuplicateWord(word.id));
            }
            if let Some(tag) = word.letters.iter().find(|t| !letter_ids.contains(&t.letter_id)) {
                return Err(ContentError::UnknownLetterTag {
                    word: word.id,
                    letter: tag.letter_id,
                });
            }
        }

        Ok(Self { letters, words })
    }

    /// The full alphabet and the starter vocabulary.
    pub fn builtin() -> Self {
        let letters = LETTERS
            .iter()
            .zip(1u32..)
            .map(|(&(script, transliteration, name), ordinal)| LetterItem {
                id: ordinal,
                script: script.to_string(),
                transliteration: transliteration.to_string(),
                name: name.to_string(),
                ordinal,
            })
            .collect();

        let words = WORDS
            .iter()
            .zip(1u32..)
            .map(|(&(script, transliteration, translation, category, tags), id)| VocabularyItem {
                id,
                script: script.to_string(),
                transliteration: transliteration.to_string(),
                translation: translation.to_string(),
                category,
                letters: tags
                    .iter()
                    .map(|&(letter_id, position)| LetterTag { letter_id, position })
                    .collect(),
            })
            .collect();

        Self { letters, words }
    }

    /// Load a content pack from JSON.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let pack: ContentPack = serde_json::from_str(json)?;
        Self::new(pack.letters, pack.words)
    }

    pub fn letters(&self) -> &[LetterItem] {
        &self.letters
    }

    pub fn words(&self) -> &[VocabularyItem] {
        &self.words
    }

    pub fn letter(&self, id: u32) -> Option<&LetterItem> {
        self.letters.iter().find(|l| l.id == id)
    }

    pub fn word(&self, id: u32) -> Option<&VocabularyItem> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn words_in(&self, category: Category) -> Vec<VocabularyItem> {
        self.words
            .iter()
            .filter(|w| w.category == category)
            .cloned()
            .collect()
    }

    pub fn words_with_letter(&self, letter_id: u32) -> Vec<VocabularyItem> {
        self.words
            .iter()
            .filter(|w| w.has_letter(letter_id))
            .cloned()
            .collect()
    }

    /// Whether a subject id refers to an item in this store.
    pub fn contains(&self, subject: SubjectId) -> bool {
        match subject {
            SubjectId::Letter(id) => self.letter(id).is_some(),
            SubjectId::Word(id) => self.word(id).is_some(),
        }
    }

    /// Display label for a subject, falling back to its id.
    pub fn label(&self, subject: SubjectId) -> String {
        let found = match subject {
            SubjectId::Letter(id) => self.letter(id).map(|l| format!("{} ({})", l.script, l.name)),
            SubjectId::Word(id) => self.word(id).map(|w| format!("{} ({})", w.script, w.translation)),
        };
        found.unwrap_or_else(|| subject.to_string())
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_has_full_alphabet_in_order() {
        let store = ContentStore::builtin();
        assert_eq!(store.letters().len(), 28);
        for (idx, letter) in store.letters().iter().enumerate() {
            assert_eq!(letter.ordinal as usize, idx + 1);
        }
        assert_eq!(store.letter(2).map(|l| l.script.as_str()), Some("ب"));
    }

    #[test]
    fn builtin_passes_validation() {
        let store = ContentStore::builtin();
        let rebuilt = ContentStore::new(store.letters().to_vec(), store.words().to_vec());
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn builtin_answers_are_distinct() {
        let store = ContentStore::builtin();
        let sounds: HashSet<_> = store.letters().iter().map(|l| &l.transliteration).collect();
        assert_eq!(sounds.len(), store.letters().len());
        let translations: HashSet<_> = store.words().iter().map(|w| &w.translation).collect();
        assert_eq!(translations.len(), store.words().len());
    }

    #[test]
    fn words_with_letter_uses_tags() {
        let store = ContentStore::builtin();
        let with_qaf: Vec<_> = store
            .words_with_letter(21)
            .into_iter()
            .map(|w| w.translation)
            .collect();
        assert_eq!(with_qaf, vec!["pen".to_string(), "moon".to_string()]);
    }

    #[test]
    fn words_in_category() {
        let store = ContentStore::builtin();
        let colors = store.words_in(Category::Colors);
        assert_eq!(colors.len(), 4);
        assert!(colors.iter().all(|w| w.category == Category::Colors));
    }

    #[test]
    fn contains_checks_references() {
        let store = ContentStore::builtin();
        assert!(store.contains(SubjectId::Letter(28)));
        assert!(!store.contains(SubjectId::Letter(29)));
        assert!(store.contains(SubjectId::Word(1)));
        assert!(!store.contains(SubjectId::Word(0)));
    }

    #[test]
    fn from_json_loads_pack() {
        let json = r#"{
            "letters": [{"id": 1, "script": "ا", "transliteration": "a", "name": "alif", "ordinal": 1}],
            "words": [{"id": 9, "script": "أب", "transliteration": "ab", "translation": "father",
                       "category": "family", "letters": [{"letter_id": 1, "position": "initial"}]}]
        }"#;
        let store = ContentStore::from_json(json).unwrap();
        assert_eq!(store.letters().len(), 1);
        assert_eq!(store.word(9).unwrap().letters[0].position, LetterPosition::Initial);
    }

    #[test]
    fn from_json_rejects_dangling_tag() {
        let json = r#"{
            "words": [{"id": 1, "script": "أب", "transliteration": "ab", "translation": "father",
                       "category": "family", "letters": [{"letter_id": 5, "position": "final"}]}]
        }"#;
        let err = ContentStore::from_json(json).unwrap_err();
        assert!(matches!(err, ContentError::UnknownLetterTag { word: 1, letter: 5 }));
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let store = ContentStore::builtin();
        let mut words = store.words().to_vec();
        words.push(words[0].clone());
        let err = ContentStore::new(store.letters().to_vec(), words).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateWord(1)));
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            ContentStore::from_json("not json"),
            Err(ContentError::Json(_))
        ));
    }
}
