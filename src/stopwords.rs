//! Stopword list loading.
//!
//! The list is a newline-delimited file of tokens, loaded once per pipeline
//! run and treated as read-only. Entries are matched against already
//! lowercased tokens, so the set itself is lowercased on load.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub type StopwordSet = HashSet<String>;

pub fn load_stopwords(path: &Path) -> Result<StopwordSet, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read stopword file {}: {}", path.display(), e))?;
    Ok(parse_stopwords(&content))
}

pub fn parse_stopwords(content: &str) -> StopwordSet {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_lowercases() {
        let set = parse_stopwords("The\n  and \n\nOF\n");
        assert_eq!(set.len(), 3);
        assert!(set.contains("the"));
        assert!(set.contains("and"));
        assert!(set.contains("of"));
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        assert!(parse_stopwords("").is_empty());
        assert!(parse_stopwords("\n\n  \n").is_empty());
    }
}
