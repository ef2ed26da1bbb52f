//! Run arguments handed to a processor by the launcher.
//!
//! The launcher writes a JSON array to a file:
//! `[cwd, metadata_file, out_dir, collection_name, extra..., "json", "<named args>"]`.
//! Everything after the `"json"` marker is a JSON object of named arguments.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const NAMED_ARGS_MARKER: &str = "json";

#[derive(Debug, Clone, PartialEq)]
pub struct RunArgs {
    pub args_file: PathBuf,
    pub cwd: PathBuf,
    pub metadata_file: PathBuf,
    pub out_dir: PathBuf,
    pub collection_name: String,
    pub extra_args: Vec<String>,
    pub named_args: Map<String, Value>,
}

impl RunArgs {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::NotFound(format!("run arguments {}: {}", path.display(), e)))?;
        let values: Vec<String> = serde_json::from_str(&content)?;
        Self::from_values(path, values)
    }

    pub fn from_values(args_file: &Path, values: Vec<String>) -> Result<Self> {
        if values.len() < 4 {
            return Err(Error::InvalidConfig(format!(
                "run arguments need cwd, metadata, output dir and collection; got {} values",
                values.len()
            )));
        }
        let mut values = values.into_iter();
        let cwd = PathBuf::from(values.next().unwrap_or_default());
        let metadata_file = PathBuf::from(values.next().unwrap_or_default());
        let out_dir = PathBuf::from(values.next().unwrap_or_default());
        let collection_name = values.next().unwrap_or_default();
        let mut extra_args: Vec<String> = values.collect();

        let mut named_args = Map::new();
        if let Some(marker) = extra_args.iter().position(|a| a == NAMED_ARGS_MARKER) {
            if let Some(raw) = extra_args.get(marker + 1) {
                named_args = serde_json::from_str(raw)?;
            }
            extra_args.truncate(marker);
        }

        Ok(Self {
            args_file: args_file.to_path_buf(),
            cwd,
            metadata_file,
            out_dir,
            collection_name,
            extra_args,
            named_args,
        })
    }

    /// Collection id: the metadata file name without its extension.
    pub fn collection(&self) -> String {
        stem(&self.metadata_file)
    }

    pub fn args_basename(&self) -> String {
        stem(&self.args_file)
    }

    /// `<out_dir>/<processor><collection>-<args_basename>.<ext>`
    pub fn output_path(&self, processor: &str, ext: &str) -> PathBuf {
        self.out_dir.join(format!(
            "{}{}-{}.{}",
            processor,
            self.collection(),
            self.args_basename(),
            ext
        ))
    }

    /// `<out_dir>/<processor><collection>progress.txt`
    pub fn progress_path(&self, processor: &str) -> PathBuf {
        self.out_dir.join(format!("{}{}progress.txt", processor, self.collection()))
    }

    pub fn stopwords_path(&self) -> PathBuf {
        self.cwd.join("stopwords.txt")
    }

    pub fn template_path(&self, processor: &str) -> PathBuf {
        self.cwd.join("templates").join(format!("{processor}.html"))
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_positional_extra_and_named_args() {
        let args = RunArgs::from_values(
            Path::new("/tmp/run42.json"),
            values(&[
                "/app",
                "/data/news.csv",
                "/out",
                "News",
                "x",
                "json",
                r#"{"interval": 7}"#,
            ]),
        )
        .expect("args");
        assert_eq!(args.cwd, PathBuf::from("/app"));
        assert_eq!(args.collection(), "news");
        assert_eq!(args.collection_name, "News");
        assert_eq!(args.extra_args, vec!["x".to_string()]);
        assert_eq!(args.named_args.get("interval"), Some(&Value::from(7)));
        assert_eq!(
            args.output_path("timeline", "html"),
            PathBuf::from("/out/timelinenews-run42.html")
        );
        assert_eq!(
            args.progress_path("timeline"),
            PathBuf::from("/out/timelinenewsprogress.txt")
        );
    }

    #[test]
    fn too_few_values_is_a_config_error() {
        let err = RunArgs::from_values(Path::new("a.json"), values(&["/app", "m.csv"]));
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }
}
