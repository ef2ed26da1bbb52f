use std::fs;
use std::rc::Rc;

use tempfile::TempDir;

use paperlens_core::config::ProcessingSettings;
use paperlens_core::stopwords::Stopwords;
use paperlens_core::traits::Tokenizer;
use paperlens_core::{DuplicatePolicy, MetadataStore, ProcessingContext};
use paperlens_text::{StemLanguage, TokenizerCache};

fn context(dir: &std::path::Path, lang: &str) -> ProcessingContext {
    let rows = vec![[("filename", "a.txt"), ("date", "2021-01-01")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()];
    let (metadata, _) = MetadataStore::load(rows, DuplicatePolicy::LastWins).expect("load");
    let settings = ProcessingSettings {
        lang: lang.to_string(),
        ..Default::default()
    };
    let stopwords = Stopwords::from_words(["the", "of"]);
    ProcessingContext::new(settings, dir.to_path_buf(), metadata, stopwords)
}

#[test]
fn same_key_returns_same_instance() {
    let tmp = TempDir::new().unwrap();
    let ctx = context(tmp.path(), "en");
    let mut cache = TokenizerCache::new();

    let first = cache.get(&ctx, 2, false).unwrap();
    let again = cache.get(&ctx, 2, false).unwrap();
    assert!(Rc::ptr_eq(&first, &again));

    let other_n = cache.get(&ctx, 1, false).unwrap();
    let stemmed = cache.get(&ctx, 2, true).unwrap();
    assert!(!Rc::ptr_eq(&first, &other_n));
    assert!(!Rc::ptr_eq(&first, &stemmed));
    assert_eq!(cache.len(), 3);
}

#[test]
fn non_stemming_tokenizers_carry_no_language() {
    let tmp = TempDir::new().unwrap();
    let ctx = context(tmp.path(), "de");
    let mut cache = TokenizerCache::new();
    assert_eq!(cache.get(&ctx, 1, false).unwrap().language(), None);
    let stemmed = cache.get(&ctx, 1, true).unwrap();
    assert_eq!(stemmed.language(), Some(StemLanguage::German));
}

#[test]
fn language_is_resolved_once_per_cache() {
    let tmp = TempDir::new().unwrap();
    let english = context(tmp.path(), "en");
    let french = context(tmp.path(), "fr");
    let mut cache = TokenizerCache::new();

    let first = cache.get(&english, 1, true).unwrap();
    let second = cache.get(&french, 1, true).unwrap();
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(second.language(), Some(StemLanguage::English));
}

#[test]
fn zero_order_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let ctx = context(tmp.path(), "en");
    assert!(TokenizerCache::new().get(&ctx, 0, false).is_err());
}

#[test]
fn document_ngrams_are_deterministic() {
    let tmp = TempDir::new().unwrap();
    let text = "The fall of the Western Roman Empire\n\nWestern Roman trade";
    fs::write(tmp.path().join("a.txt"), text).unwrap();
    let ctx = context(tmp.path(), "en");
    let mut cache = TokenizerCache::new();

    let once = cache.ngrams(&ctx, "a.txt", 2, false).unwrap();
    let twice = cache.ngrams(&ctx, "a.txt", 2, false).unwrap();
    assert_eq!(once, twice);
    assert_eq!(
        once,
        vec![
            "western roman",
            "roman empire",
            "empire western",
            "western roman",
            "roman trade"
        ]
    );
    assert_eq!(cache.len(), 1);

    let tokenizer = cache.get(&ctx, 2, false).unwrap();
    assert_eq!(tokenizer.order(), 2);
    assert_eq!(tokenizer.tokenize("Roman Empire"), vec!["roman empire"]);
}

#[test]
fn missing_document_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let ctx = context(tmp.path(), "en");
    assert!(TokenizerCache::new().ngrams(&ctx, "absent.txt", 1, false).is_err());
}
