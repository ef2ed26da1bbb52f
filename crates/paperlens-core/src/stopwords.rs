use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Terms excluded from n-gram generation, stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwords {
    words: BTreeSet<String>,
}

impl Stopwords {
    /// Read a newline-delimited list; blank lines are ignored.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::NotFound(format!("stopword list {}: {}", path.display(), e)))?;
        Ok(Self::from_words(content.lines()))
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_and_case_are_normalized() {
        let stopwords = Stopwords::from_words("The\n\n  of \r\nand\n".lines());
        assert_eq!(stopwords.len(), 3);
        assert!(stopwords.contains("the"));
        assert!(stopwords.contains("of"));
        assert!(!stopwords.contains("The"));
    }
}
