//! Per-interval summary of the corpus: which items fall in each bucket, the
//! n-gram sequence of each item, and the n-grams that dominate the bucket.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use paperlens_core::{Error, Partition, ProcessingContext, Result};
use paperlens_text::TokenizerCache;

pub const TIMELINE_KEY: &str = "TIMELINE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NgramCount {
    pub text: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineBucket {
    pub label: String,
    pub start: String,
    pub end: String,
    pub items: Vec<String>,
    /// Item id to that document's n-grams, in text order.
    pub tokens: BTreeMap<String, Vec<String>>,
    pub ngrams: Vec<NgramCount>,
}

/// Summarize every interval of `partition` in chronological order.
///
/// Documents whose file is missing are skipped with a warning and get no
/// token entry. `on_document` runs once per document visited, skipped or not.
pub fn build_timeline<F>(
    ctx: &ProcessingContext,
    partition: &Partition,
    cache: &mut TokenizerCache,
    mut on_document: F,
) -> Result<Vec<TimelineBucket>>
where
    F: FnMut(&str) -> Result<()>,
{
    let n = ctx.settings.ngram;
    let stemming = ctx.settings.stemming;
    let top_k = ctx.settings.top_ngrams;

    let mut buckets = Vec::with_capacity(partition.intervals.len());
    for interval in &partition.intervals {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut items = Vec::new();
        let mut tokens = BTreeMap::new();
        for filename in partition.documents(&interval.label).into_iter().flatten() {
            let item = ctx.item_id(filename);
            items.push(item.clone());
            match cache.ngrams(ctx, filename, n, stemming) {
                Ok(grams) => {
                    for gram in &grams {
                        *counts.entry(gram.clone()).or_default() += 1;
                    }
                    tokens.insert(item, grams);
                }
                Err(Error::NotFound(what)) => {
                    warn!(%filename, %what, "skipping unreadable document")
                }
                Err(e) => return Err(e),
            }
            on_document(filename)?;
        }
        debug!(
            label = %interval.label,
            documents = items.len(),
            distinct = counts.len(),
            "bucket summarized"
        );
        buckets.push(TimelineBucket {
            label: interval.label.clone(),
            start: interval.start.to_string(),
            end: interval.end.to_string(),
            items,
            tokens,
            ngrams: top_ngrams(counts, top_k),
        });
    }
    Ok(buckets)
}

/// Highest counts first; equal counts in lexicographic order.
pub fn top_ngrams(counts: HashMap<String, usize>, k: usize) -> Vec<NgramCount> {
    let mut ranked: Vec<NgramCount> = counts
        .into_iter()
        .map(|(text, count)| NgramCount { text, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
    ranked.truncate(k);
    ranked
}

/// Data payload for the report script.
pub fn timeline_payload(buckets: &[TimelineBucket]) -> Result<Map<String, Value>> {
    let mut data = Map::new();
    data.insert(TIMELINE_KEY.to_string(), serde_json::to_value(buckets)?);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_break_lexicographically() {
        let counts: HashMap<String, usize> = [("pear", 2), ("apple", 2), ("fig", 5), ("kiwi", 1)]
            .iter()
            .map(|(t, c)| (t.to_string(), *c))
            .collect();
        let top = top_ngrams(counts, 3);
        let texts: Vec<&str> = top.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(texts, vec!["fig", "apple", "pear"]);
    }

    #[test]
    fn k_larger_than_vocabulary_keeps_everything() {
        let counts: HashMap<String, usize> = [("a".to_string(), 1)].into_iter().collect();
        assert_eq!(top_ngrams(counts, 10).len(), 1);
        assert!(top_ngrams(HashMap::new(), 0).is_empty());
    }
}
