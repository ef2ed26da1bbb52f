use tantivy::tokenizer::{
    LowerCaser, SimpleTokenizer, Stemmer, StopWordFilter, TextAnalyzer, TokenStream,
};

use paperlens_core::stopwords::Stopwords;
use paperlens_core::traits::Tokenizer;

use crate::language::StemLanguage;

/// Word n-gram tokenizer over a tantivy analyzer chain:
/// `SimpleTokenizer -> LowerCaser -> StopWordFilter -> [Stemmer]`.
///
/// The stopword filter drops tokens but keeps the positions of the rest, so an
/// n-gram is only emitted for `n` words that were adjacent in the source text.
/// Any window that contained a stopword is never produced.
pub struct NgramTokenizer {
    n: usize,
    language: Option<StemLanguage>,
    analyzer: TextAnalyzer,
}

impl NgramTokenizer {
    pub fn new(n: usize, language: Option<StemLanguage>, stopwords: &Stopwords) -> Self {
        let stop = StopWordFilter::remove(stopwords.iter().map(str::to_string));
        let analyzer = match language {
            Some(lang) => TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(LowerCaser)
                .filter(stop)
                .filter(Stemmer::new(lang.into()))
                .build(),
            None => TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(LowerCaser)
                .filter(stop)
                .build(),
        };
        Self {
            n,
            language,
            analyzer,
        }
    }

    pub fn language(&self) -> Option<StemLanguage> {
        self.language
    }

    fn words(&self, text: &str) -> Vec<(usize, String)> {
        // token_stream needs `&mut`; a private clone keeps `tokenize` read-only.
        let mut analyzer = self.analyzer.clone();
        let mut stream = analyzer.token_stream(text);
        let mut words = Vec::new();
        while stream.advance() {
            let token = stream.token();
            words.push((token.position, token.text.clone()));
        }
        words
    }
}

impl Tokenizer for NgramTokenizer {
    fn order(&self) -> usize {
        self.n
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        if self.n == 0 {
            return Vec::new();
        }
        let words = self.words(text);
        words
            .windows(self.n)
            .filter(|window| window.windows(2).all(|pair| pair[1].0 == pair[0].0 + 1))
            .map(|window| {
                window
                    .iter()
                    .map(|(_, w)| w.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}
