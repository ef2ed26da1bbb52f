use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use paperlens_core::traits::{ReportEmitter, ReportFiles};
use paperlens_core::ProcessingContext;

use crate::error::ReportError;

pub const COLLECTION_NAME_PLACEHOLDER: &str = "COLLECTION_NAME";
pub const DATA_PATH_PLACEHOLDER: &str = "DATA_PATH";
pub const DOC_METADATA_KEY: &str = "DOC_METADATA";

/// HTML page rendered from a template, with its data in a sibling `.js` file.
#[derive(Debug, Clone)]
pub struct HtmlReport {
    html_path: PathBuf,
    data_path: PathBuf,
    template_path: PathBuf,
    collection_name: String,
}

impl HtmlReport {
    pub fn new(
        html_path: PathBuf,
        template_path: PathBuf,
        collection_name: impl Into<String>,
    ) -> Self {
        let data_path = html_path.with_extension("js");
        Self {
            html_path,
            data_path,
            template_path,
            collection_name: collection_name.into(),
        }
    }

    pub fn html_path(&self) -> &Path {
        &self.html_path
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Substitute the collection name and the data script's file name.
    pub fn render(&self, template: &str) -> String {
        let data_name = self
            .data_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        template
            .replace(COLLECTION_NAME_PLACEHOLDER, &self.collection_name)
            .replace(DATA_PATH_PLACEHOLDER, &data_name)
    }

    /// Write both files. `doc_metadata` lands under `DOC_METADATA` in the payload.
    ///
    /// Both files are fully written to temporary files before either is moved
    /// into place. The page is persisted first, so a failure leaves any
    /// previous data script untouched.
    pub fn write(
        &self,
        doc_metadata: Map<String, Value>,
        mut data: Map<String, Value>,
    ) -> Result<ReportFiles, ReportError> {
        let template = match fs::read_to_string(&self.template_path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ReportError::TemplateMissing(self.template_path.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        data.insert(DOC_METADATA_KEY.to_string(), Value::Object(doc_metadata));
        let script = format!("var data={};", serde_json::to_string(&Value::Object(data))?);

        let html = stage(&self.html_path, self.render(&template).as_bytes())?;
        let script = stage(&self.data_path, script.as_bytes())?;
        persist(html, &self.html_path)?;
        persist(script, &self.data_path)?;

        info!(
            html = %self.html_path.display(),
            data = %self.data_path.display(),
            "report written"
        );
        Ok(ReportFiles {
            html: self.html_path.clone(),
            data: self.data_path.clone(),
        })
    }
}

impl ReportEmitter for HtmlReport {
    fn emit(
        &self,
        ctx: &ProcessingContext,
        data: Map<String, Value>,
    ) -> anyhow::Result<ReportFiles> {
        Ok(self.write(ctx.doc_metadata(), data)?)
    }
}

/// Write `bytes` to a temporary file in the directory of `path`.
fn stage(path: &Path, bytes: &[u8]) -> Result<NamedTempFile, ReportError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;
    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    Ok(tmp)
}

fn persist(tmp: NamedTempFile, path: &Path) -> Result<(), ReportError> {
    tmp.persist(path).map_err(|e| ReportError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
