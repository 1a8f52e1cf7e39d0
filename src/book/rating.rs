use crate::{Result, ScrapeError};

/// Accepted rating words, indexed by their value
const RATING_WORDS: [&str; 6] = ["zero", "one", "two", "three", "four", "five"];

/// Converts a lowercase rating word into its value 0-5
///
/// The caller lowercases the token; anything outside the vocabulary,
/// including capitalised words, is `UnrecognizedRating`.
pub fn parse_rating(token: &str) -> Result<u8> {
    RATING_WORDS
        .iter()
        .position(|word| *word == token)
        .map(|value| value as u8)
        .ok_or_else(|| ScrapeError::UnrecognizedRating(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_word_maps_to_its_value() {
        let expected = [
            ("zero", 0),
            ("one", 1),
            ("two", 2),
            ("three", 3),
            ("four", 4),
            ("five", 5),
        ];
        for (token, value) in expected {
            assert_eq!(parse_rating(token).unwrap(), value, "token {}", token);
        }
    }

    #[test]
    fn test_unknown_tokens_are_rejected() {
        for token in ["six", "", "Three", "3", " one"] {
            assert!(
                matches!(parse_rating(token), Err(ScrapeError::UnrecognizedRating(ref t)) if t == token),
                "token {:?} should be rejected",
                token
            );
        }
    }
}
