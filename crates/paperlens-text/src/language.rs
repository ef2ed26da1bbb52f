use serde::{Deserialize, Serialize};
use tantivy::tokenizer::Language;

/// Stemming languages supported by the analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StemLanguage {
    Arabic,
    Danish,
    Dutch,
    #[default]
    English,
    Finnish,
    French,
    German,
    Greek,
    Hungarian,
    Italian,
    Norwegian,
    Portuguese,
    Romanian,
    Russian,
    Spanish,
    Swedish,
    Tamil,
    Turkish,
}

/// Map a language code (`en`, `fr-CA`, `deu`, ...) to a stemmer.
///
/// Total over its input: unknown codes fall back to English.
pub fn language_for(code: &str) -> StemLanguage {
    let code = code.trim().to_ascii_lowercase();
    let primary = code.split(['-', '_']).next().unwrap_or_default();
    match primary {
        "ar" | "ara" => StemLanguage::Arabic,
        "da" | "dan" => StemLanguage::Danish,
        "nl" | "nld" | "dut" => StemLanguage::Dutch,
        "fi" | "fin" => StemLanguage::Finnish,
        "fr" | "fra" | "fre" => StemLanguage::French,
        "de" | "deu" | "ger" => StemLanguage::German,
        "el" | "ell" | "gre" => StemLanguage::Greek,
        "hu" | "hun" => StemLanguage::Hungarian,
        "it" | "ita" => StemLanguage::Italian,
        "no" | "nb" | "nn" | "nor" => StemLanguage::Norwegian,
        "pt" | "por" => StemLanguage::Portuguese,
        "ro" | "ron" | "rum" => StemLanguage::Romanian,
        "ru" | "rus" => StemLanguage::Russian,
        "es" | "spa" => StemLanguage::Spanish,
        "sv" | "swe" => StemLanguage::Swedish,
        "ta" | "tam" => StemLanguage::Tamil,
        "tr" | "tur" => StemLanguage::Turkish,
        _ => StemLanguage::English,
    }
}

impl From<StemLanguage> for Language {
    fn from(language: StemLanguage) -> Self {
        match language {
            StemLanguage::Arabic => Language::Arabic,
            StemLanguage::Danish => Language::Danish,
            StemLanguage::Dutch => Language::Dutch,
            StemLanguage::English => Language::English,
            StemLanguage::Finnish => Language::Finnish,
            StemLanguage::French => Language::French,
            StemLanguage::German => Language::German,
            StemLanguage::Greek => Language::Greek,
            StemLanguage::Hungarian => Language::Hungarian,
            StemLanguage::Italian => Language::Italian,
            StemLanguage::Norwegian => Language::Norwegian,
            StemLanguage::Portuguese => Language::Portuguese,
            StemLanguage::Romanian => Language::Romanian,
            StemLanguage::Russian => Language::Russian,
            StemLanguage::Spanish => Language::Spanish,
            StemLanguage::Swedish => Language::Swedish,
            StemLanguage::Tamil => Language::Tamil,
            StemLanguage::Turkish => Language::Turkish,
        }
    }
}
