//! Starting-letter selection for new games.

use rand::Rng;

/// Pick a random lowercase ASCII letter.
pub fn random_letter() -> char {
    let mut rng = rand::rng();
    rng.random_range(b'a'..=b'z') as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_letter_is_lowercase_ascii() {
        for _ in 0..100 {
            let letter = random_letter();
            assert!(letter.is_ascii_lowercase());
        }
    }
}
