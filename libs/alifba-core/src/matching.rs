//! String matching for spoken-word attempts.
//!
//! The verdict comes from [`is_lenient_match`], which accepts partial
//! transcriptions. [`normalized_similarity`] is only used to show the learner
//! how close the attempt was.

/// Normalize a string for comparison (trim and lowercase).
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Whether a recognized utterance counts as the target.
///
/// Matches when the recognized text is non-empty and either string contains the
/// other, or the first half of either string is a prefix of the other.
pub fn is_lenient_match(target: &str, recognized: &str) -> bool {
    let target = normalize(target);
    let recognized = normalize(recognized);

    if recognized.is_empty() {
        return false;
    }

    target.contains(&recognized)
        || recognized.contains(&target)
        || half_prefix_match(&target, &recognized)
        || half_prefix_match(&recognized, &target)
}

/// First half of `a` (in chars) is a prefix of `b`. Strings shorter than two
/// chars have no usable half.
fn half_prefix_match(a: &str, b: &str) -> bool {
    let half = a.chars().count() / 2;
    if half == 0 {
        return false;
    }
    let prefix: String = a.chars().take(half).collect();
    b.starts_with(&prefix)
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Normalized similarity (0.0 to 1.0) based on Levenshtein distance over chars.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(&a, &b);
    1.0 - (distance as f64 / max_len as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("بيت", "بنت"), 1);
    }

    #[test]
    fn test_similarity_counts_chars_not_bytes() {
        assert_eq!(normalized_similarity("بيت", "بيت"), 1.0);
        let sim = normalized_similarity("بيت", "بنت");
        assert!((sim - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(normalized_similarity("", ""), 1.0);
    }

    #[test]
    fn test_exact_always_matches() {
        for word in ["بيت", "كتاب", "qalam", "a"] {
            assert!(is_lenient_match(word, word));
        }
    }

    #[test]
    fn test_empty_never_matches() {
        assert!(!is_lenient_match("بيت", ""));
        assert!(!is_lenient_match("بيت", "   "));
        assert!(!is_lenient_match("", ""));
    }

    #[test]
    fn test_trim_and_case() {
        assert!(is_lenient_match("  Kitab ", "kitab"));
        assert!(is_lenient_match("بيت", "\tبيت \n"));
    }

    #[test]
    fn test_containment() {
        // recognizer heard a longer phrase
        assert!(is_lenient_match("بيت", "هذا بيت"));
        // recognizer caught only part of the word
        assert!(is_lenient_match("مدرسة", "مدرس"));
    }

    #[test]
    fn test_half_prefix() {
        // first half of the target ("كت") starts the attempt
        assert!(is_lenient_match("كتاب", "كتب"));
        assert!(!is_lenient_match("كتاب", "قلم"));
    }

    #[test]
    fn test_single_char_has_no_half() {
        assert!(!is_lenient_match("ب", "ت"));
    }
}
