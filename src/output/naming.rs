//! File names derived from scraped text

/// Turns scraped text into a single path component
///
/// Path separators become `-`, so the result never leaves the output
/// directory. A stem made only of dots (or nothing) would still name a
/// directory, so it is replaced by `_` characters.
pub fn file_stem(text: &str) -> String {
    let stem: String = text
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();

    if stem.chars().all(|c| c == '.') {
        return "_".repeat(stem.len().max(1));
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_become_hyphens() {
        assert_eq!(file_stem("Sci-Fi/Fantasy"), "Sci-Fi-Fantasy");
        assert_eq!(file_stem(r"Art\Design"), "Art-Design");
        assert_eq!(file_stem("../escaped"), "..-escaped");
    }

    #[test]
    fn test_dot_only_stems_are_replaced() {
        assert_eq!(file_stem(".."), "__");
        assert_eq!(file_stem("."), "_");
        assert_eq!(file_stem(""), "_");
    }

    #[test]
    fn test_plain_names_unchanged() {
        assert_eq!(file_stem("Historical Fiction"), "Historical Fiction");
    }
}
