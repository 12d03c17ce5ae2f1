//! Lexical acceptance checks for submitted words.
//!
//! These run in a fixed order and short-circuit on the first failure, without
//! touching session state. Dictionary validation happens afterwards in the
//! service layer because it performs I/O; its failure modes are represented
//! here so every rejection shares one vocabulary.

use std::collections::HashSet;

/// Why a submitted word was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Not purely alphabetic, or contains whitespace.
    NotAlphabetic,
    /// Degenerate repeated-character pattern such as "aaaa" or "ababab".
    Degenerate,
    /// Already played earlier in this session.
    AlreadyUsed,
    /// Shorter than the current round's minimum.
    TooShort { min: usize },
    /// Does not start with the required chain letter.
    WrongLetter { expected: char },
    /// The dictionary says this is not a real word.
    NotAWord,
    /// The dictionary could not be consulted; rejected fail-closed.
    Unverifiable,
}

/// Run the lexical pipeline for a lowercased candidate word.
///
/// `chain_letter` is `None` only if a session reaches Active without an
/// assigned starting letter; the letter check is then skipped rather than
/// wedging the game.
pub fn check_word(
    word: &str,
    used_words: &HashSet<String>,
    min_word_length: usize,
    chain_letter: Option<char>,
) -> Result<(), RejectReason> {
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(RejectReason::NotAlphabetic);
    }
    if is_degenerate(word) {
        return Err(RejectReason::Degenerate);
    }
    if used_words.contains(word) {
        return Err(RejectReason::AlreadyUsed);
    }
    if word.len() < min_word_length {
        return Err(RejectReason::TooShort {
            min: min_word_length,
        });
    }
    if let Some(expected) = chain_letter {
        if !word.starts_with(expected) {
            return Err(RejectReason::WrongLetter { expected });
        }
    }
    Ok(())
}

/// A word made of one repeated character, or of a repeating one- or
/// two-character unit ("aaaa", "ababab"). Legitimate words repeat syllables
/// ("banana") but never consist of nothing else.
fn is_degenerate(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() >= 2 && chars.iter().all(|&c| c == chars[0]) {
        return true;
    }
    for unit in 1..=2usize {
        if chars.len() >= unit * 3 && chars.len() % unit == 0 {
            let pattern = &chars[..unit];
            if chars.chunks(unit).all(|chunk| chunk == pattern) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn used(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn accepts_a_plain_word() {
        assert_eq!(check_word("table", &used(&[]), 4, Some('t')), Ok(()));
    }

    #[test]
    fn rejects_non_alphabetic_input() {
        let empty = used(&[]);
        assert_eq!(
            check_word("two words", &empty, 1, None),
            Err(RejectReason::NotAlphabetic)
        );
        assert_eq!(
            check_word("c4t", &empty, 1, None),
            Err(RejectReason::NotAlphabetic)
        );
        assert_eq!(
            check_word("", &empty, 1, None),
            Err(RejectReason::NotAlphabetic)
        );
    }

    #[test]
    fn rejects_degenerate_patterns() {
        let empty = used(&[]);
        assert_eq!(
            check_word("aaaa", &empty, 1, None),
            Err(RejectReason::Degenerate)
        );
        assert_eq!(
            check_word("ababab", &empty, 1, None),
            Err(RejectReason::Degenerate)
        );
        // Repeated syllables inside a longer word are fine.
        assert_eq!(check_word("banana", &empty, 1, Some('b')), Ok(()));
    }

    #[test]
    fn rejects_duplicates_before_length_and_letter() {
        // "cat" is both used and too short; the duplicate check fires first.
        assert_eq!(
            check_word("cat", &used(&["cat"]), 5, Some('x')),
            Err(RejectReason::AlreadyUsed)
        );
    }

    #[test]
    fn rejects_short_words_with_the_current_minimum() {
        assert_eq!(
            check_word("cat", &used(&[]), 5, Some('c')),
            Err(RejectReason::TooShort { min: 5 })
        );
    }

    #[test]
    fn rejects_chain_letter_mismatch() {
        assert_eq!(
            check_word("dog", &used(&[]), 3, Some('t')),
            Err(RejectReason::WrongLetter { expected: 't' })
        );
    }

    #[test]
    fn skips_letter_check_without_a_chain_letter() {
        assert_eq!(check_word("dog", &used(&[]), 3, None), Ok(()));
    }
}
