//! Explicit state for one processing run.
//!
//! Everything a run needs (settings, metadata, stopwords, where documents
//! live) is held here and passed to each operation instead of living in
//! process-wide fields.

use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::args::RunArgs;
use crate::config::{resolve_with_base, ProcessingSettings};
use crate::error::{Error, Result};
use crate::intervals::{IntervalPartitioner, Partition};
use crate::metadata::MetadataStore;
use crate::stopwords::Stopwords;
use crate::types::FILENAME_FIELD;

#[derive(Debug, Clone)]
pub struct ProcessingContext {
    pub settings: ProcessingSettings,
    /// Relative document paths resolve against this directory.
    pub base_dir: PathBuf,
    pub metadata: MetadataStore,
    pub stopwords: Stopwords,
}

impl ProcessingContext {
    pub fn new(
        settings: ProcessingSettings,
        base_dir: PathBuf,
        metadata: MetadataStore,
        stopwords: Stopwords,
    ) -> Self {
        Self {
            settings,
            base_dir,
            metadata,
            stopwords,
        }
    }

    /// Load metadata and the stopword list named by the run arguments.
    pub fn from_run_args(args: &RunArgs, settings: ProcessingSettings) -> Result<Self> {
        settings.validate()?;
        let (metadata, report) =
            MetadataStore::from_path(&args.metadata_file, settings.duplicates)?;
        let stopwords = Stopwords::load(&args.stopwords_path())?;
        info!(
            collection = %args.collection_name,
            documents = report.loaded,
            stopwords = stopwords.len(),
            "processing context ready"
        );
        Ok(Self::new(settings, args.cwd.clone(), metadata, stopwords))
    }

    /// Prune and bucket the metadata store using the run's settings.
    pub fn split_into_intervals(&mut self) -> Result<Partition> {
        IntervalPartitioner::from_settings(&self.settings)?
            .partition(&mut self.metadata)
    }

    pub fn document_path(&self, filename: &str) -> PathBuf {
        resolve_with_base(&self.base_dir, filename)
    }

    /// Read a document's text, falling back to lossy UTF-8 for odd encodings.
    pub fn read_document(&self, filename: &str) -> Result<String> {
        let path = self.document_path(filename);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("document {}", path.display())))
            }
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(&path)?).to_string()),
        }
    }

    /// The configured item id for a document, or its filename when missing.
    pub fn item_id(&self, filename: &str) -> String {
        self.metadata
            .get(filename)
            .and_then(|meta| meta.get(&self.settings.item_id_field))
            .filter(|id| !id.is_empty())
            .cloned()
            .unwrap_or_else(|| filename.to_string())
    }

    /// Item id to verbatim metadata (plus `filename`) for every remaining document.
    pub fn doc_metadata(&self) -> Map<String, Value> {
        self.metadata
            .iter()
            .map(|(filename, meta)| {
                let mut fields: Map<String, Value> = meta
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                    .collect();
                fields.insert(FILENAME_FIELD.to_string(), Value::from(filename.as_str()));
                (self.item_id(filename), Value::Object(fields))
            })
            .collect()
    }
}
