use std::path::PathBuf;

use crate::context::ProcessingContext;

/// Turns text into an ordered sequence of n-gram tokens.
///
/// Implementations must be deterministic: identical input yields identical
/// output, and tokenizing never mutates state visible to other calls.
pub trait Tokenizer {
    fn order(&self) -> usize;
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Files written by a [`ReportEmitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub html: PathBuf,
    pub data: PathBuf,
}

pub trait ReportEmitter {
    fn emit(
        &self,
        ctx: &ProcessingContext,
        data: serde_json::Map<String, serde_json::Value>,
    ) -> anyhow::Result<ReportFiles>;
}
