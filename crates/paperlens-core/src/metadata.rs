//! Filename-keyed metadata table.
//!
//! Rows come from a CSV export (or a JSON array of objects); each must carry
//! a `filename` column, every other column is kept verbatim.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::{Meta, DATE_FIELD, FILENAME_FIELD};

/// What to do when two rows name the same file.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the later row and log a warning.
    #[default]
    LastWins,
    /// Fail the load with [`Error::DuplicateKey`].
    Reject,
}

/// Summary of a load: how many documents ended up in the store and which
/// filenames were seen more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub duplicates: Vec<String>,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    records: BTreeMap<String, Meta>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from ordered rows.
    pub fn load<I>(rows: I, policy: DuplicatePolicy) -> Result<(Self, LoadReport)>
    where
        I: IntoIterator<Item = Meta>,
    {
        let mut store = Self::new();
        let mut report = LoadReport::default();
        for (row_index, mut row) in rows.into_iter().enumerate() {
            let Some(filename) = row.remove(FILENAME_FIELD) else {
                warn!(row = row_index, "metadata row has no filename -- skipping");
                report.skipped_rows += 1;
                continue;
            };
            if store.records.contains_key(&filename) {
                if policy == DuplicatePolicy::Reject {
                    return Err(Error::DuplicateKey(filename));
                }
                warn!(
                    %filename,
                    row = row_index,
                    "duplicate filename in metadata -- later row wins"
                );
                report.duplicates.push(filename.clone());
            }
            store.records.insert(filename, row);
        }
        report.loaded = store.records.len();
        Ok((store, report))
    }

    /// Load a metadata table from disk, choosing the decoder by extension
    /// (`.json` for an array of objects, anything else as CSV with headers).
    pub fn from_path(path: &Path, policy: DuplicatePolicy) -> Result<(Self, LoadReport)> {
        let file = File::open(path)
            .map_err(|e| Error::NotFound(format!("metadata file {}: {}", path.display(), e)))?;
        let rows = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            read_json_rows(BufReader::new(file))?
        } else {
            read_csv_rows(BufReader::new(file))?
        };
        let (store, report) = Self::load(rows, policy)?;
        info!(
            path = %path.display(),
            documents = report.loaded,
            duplicates = report.duplicates.len(),
            "loaded metadata"
        );
        Ok((store, report))
    }

    /// Delete a document. Removing an absent filename is a no-op.
    pub fn remove(&mut self, filename: &str) -> Option<Meta> {
        self.records.remove(filename)
    }

    pub fn keys(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    pub fn get(&self, filename: &str) -> Option<&Meta> {
        self.records.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.records.contains_key(filename)
    }

    /// Raw `date` value for a document; missing columns read as empty.
    pub fn raw_date(&self, filename: &str) -> Option<&str> {
        self.records
            .get(filename)
            .map(|meta| meta.get(DATE_FIELD).map_or("", String::as_str))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Meta)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn read_csv_rows<R: std::io::Read>(reader: R) -> Result<Vec<Meta>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<Meta>() {
        rows.push(record?);
    }
    Ok(rows)
}

fn read_json_rows<R: std::io::Read>(reader: R) -> Result<Vec<Meta>> {
    let values: Vec<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_reader(reader)?;
    Ok(values
        .into_iter()
        .map(|object| {
            object
                .into_iter()
                .map(|(k, v)| {
                    let text = match v {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (k, text)
                })
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Meta {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn csv_rows_decode_with_headers() {
        let data = "filename,date,itemID\na.txt,2021-01-01,1\nb.txt,,2\n";
        let rows = read_csv_rows(data.as_bytes()).expect("csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("date").map(String::as_str), Some("2021-01-01"));
        assert_eq!(rows[1].get("date").map(String::as_str), Some(""));
    }

    #[test]
    fn json_rows_stringify_scalars() {
        let data = r#"[{"filename": "a.txt", "date": "2021-01-01", "itemID": 7, "note": null}]"#;
        let rows = read_json_rows(data.as_bytes()).expect("json");
        assert_eq!(rows[0].get("itemID").map(String::as_str), Some("7"));
        assert_eq!(rows[0].get("note").map(String::as_str), Some(""));
    }

    #[test]
    fn rows_without_filename_are_skipped() {
        let (store, report) = MetadataStore::load(
            vec![row(&[("date", "2021-01-01")]), row(&[("filename", "a.txt")])],
            DuplicatePolicy::LastWins,
        )
        .expect("load");
        assert_eq!(store.keys(), vec!["a.txt".to_string()]);
        assert_eq!(report.skipped_rows, 1);
        assert_eq!(store.raw_date("a.txt"), Some(""));
    }
}
