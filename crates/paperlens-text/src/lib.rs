//! paperlens-text
//!
//! Stopword-aware, optionally stemmed word n-grams on top of tantivy's text
//! analysis, memoized per processing run.

pub mod cache;
pub mod language;
pub mod ngram;

pub use cache::{TokenizerCache, TokenizerKey};
pub use language::{language_for, StemLanguage};
pub use ngram::NgramTokenizer;
