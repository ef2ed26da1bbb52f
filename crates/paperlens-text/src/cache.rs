//! Per-run memo of n-gram tokenizers.
//!
//! A tokenizer is built once per `(n, stemming, language)` key and shared by
//! handle afterwards. The stemming language is looked up at most once per
//! cache, and only when a stemming tokenizer is first requested.

use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

use paperlens_core::traits::Tokenizer;
use paperlens_core::{Error, ProcessingContext, Result};

use crate::language::{language_for, StemLanguage};
use crate::ngram::NgramTokenizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenizerKey {
    pub n: usize,
    pub stemming: bool,
    pub language: Option<StemLanguage>,
}

#[derive(Default)]
pub struct TokenizerCache {
    tokenizers: HashMap<TokenizerKey, Rc<NgramTokenizer>>,
    language: Option<StemLanguage>,
}

impl TokenizerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached tokenizer for `(n, stemming)` under the run's language setting.
    pub fn get(
        &mut self,
        ctx: &ProcessingContext,
        n: usize,
        stemming: bool,
    ) -> Result<Rc<NgramTokenizer>> {
        if n == 0 {
            return Err(Error::InvalidConfig(
                "n-gram order must be at least 1".to_string(),
            ));
        }
        let language = if stemming {
            Some(self.stem_language(&ctx.settings.lang))
        } else {
            None
        };
        let key = TokenizerKey {
            n,
            stemming,
            language,
        };
        let tokenizer = self.tokenizers.entry(key).or_insert_with(|| {
            debug!(n, stemming, ?language, "building tokenizer");
            Rc::new(NgramTokenizer::new(n, language, &ctx.stopwords))
        });
        Ok(Rc::clone(tokenizer))
    }

    /// Tokenize one document's text with the cached tokenizer for `(n, stemming)`.
    pub fn ngrams(
        &mut self,
        ctx: &ProcessingContext,
        filename: &str,
        n: usize,
        stemming: bool,
    ) -> Result<Vec<String>> {
        let tokenizer = self.get(ctx, n, stemming)?;
        let text = ctx.read_document(filename)?;
        Ok(tokenizer.tokenize(&text))
    }

    pub fn len(&self) -> usize {
        self.tokenizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokenizers.is_empty()
    }

    fn stem_language(&mut self, code: &str) -> StemLanguage {
        *self.language.get_or_insert_with(|| language_for(code))
    }
}
