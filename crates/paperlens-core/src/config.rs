//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml`
//! and `PAPERLENS_*` env vars (`__` separates nested keys). Run-specific named
//! arguments can be layered on top with [`Config::with_overrides`].

use chrono::NaiveDate;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::dates::resolve_date;
use crate::error::{Error, Result};
use crate::metadata::DuplicatePolicy;

pub const PROCESSING_KEY: &str = "processing";

pub struct Config {
    figment: Figment,
}

/// Built-in defaults only; no files or environment.
impl Default for Config {
    fn default() -> Self {
        Self {
            figment: Self::defaults(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Self::defaults().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("PAPERLENS_").split("__"));

        Ok(Self { figment })
    }

    /// Wrap an already-assembled figment on top of the built-in defaults.
    pub fn from_figment(figment: Figment) -> Self {
        Self {
            figment: Self::defaults().merge(figment),
        }
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::default(PROCESSING_KEY, ProcessingSettings::default()))
    }

    /// Layer named run arguments over the `processing` section.
    pub fn with_overrides(self, named: &serde_json::Map<String, serde_json::Value>) -> Self {
        if named.is_empty() {
            return self;
        }
        // The launcher names the step `interval`.
        let named: serde_json::Map<String, serde_json::Value> = named
            .iter()
            .map(|(k, v)| {
                let key = if k == "interval" { "interval_days".to_string() } else { k.clone() };
                (key, v.clone())
            })
            .collect();
        let figment = self.figment.merge(Serialized::global(PROCESSING_KEY, named));
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed, validated `processing` section.
    pub fn processing(&self) -> Result<ProcessingSettings> {
        let settings: ProcessingSettings = self
            .figment
            .extract_inner(PROCESSING_KEY)
            .map_err(|e| Error::InvalidConfig(format!("{PROCESSING_KEY}: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Knobs for one processing run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProcessingSettings {
    /// Inclusive lower bound; documents dated earlier are dropped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Inclusive upper bound; documents dated later are dropped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub interval_days: u32,
    /// Label buckets `YYYY/MM/DD-YYYY/MM/DD` instead of the ISO start date.
    pub start_and_end_labels: bool,
    pub ngram: usize,
    pub stemming: bool,
    pub lang: String,
    pub item_id_field: String,
    pub duplicates: DuplicatePolicy,
    pub top_ngrams: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            interval_days: 1,
            start_and_end_labels: false,
            ngram: 1,
            stemming: false,
            lang: "en".to_string(),
            item_id_field: "itemID".to_string(),
            duplicates: DuplicatePolicy::LastWins,
            top_ngrams: 20,
            template: None,
        }
    }
}

impl ProcessingSettings {
    pub fn validate(&self) -> Result<()> {
        if self.interval_days == 0 {
            return Err(Error::InvalidConfig(
                "interval_days must be at least 1".to_string(),
            ));
        }
        if self.ngram == 0 {
            return Err(Error::InvalidConfig("ngram must be at least 1".to_string()));
        }
        self.bounds()?;
        Ok(())
    }

    /// Explicit `(start, end)` bounds, resolved like document dates.
    pub fn bounds(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
        Ok((
            resolve_bound("start_date", self.start_date.as_deref())?,
            resolve_bound("end_date", self.end_date.as_deref())?,
        ))
    }
}

fn resolve_bound(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => resolve_date(s).map(Some).ok_or_else(|| {
            Error::InvalidConfig(format!("{name} '{s}' is not a YYYY-MM-DD date"))
        }),
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_any_files() {
        let config = Config::from_figment(Figment::new());
        let settings = config.processing().expect("settings");
        assert_eq!(settings, ProcessingSettings::default());
        assert_eq!(settings.interval_days, 1);
        assert_eq!(settings.lang, "en");
    }

    #[test]
    fn toml_section_overrides_defaults() {
        let toml = r#"
            [processing]
            interval_days = 7
            stemming = true
            start_date = "2021-00-00"
            duplicates = "reject"
        "#;
        let config = Config::from_figment(Figment::new().merge(Toml::string(toml)));
        let settings = config.processing().expect("settings");
        assert_eq!(settings.interval_days, 7);
        assert!(settings.stemming);
        assert_eq!(settings.ngram, 1);
        assert_eq!(settings.duplicates, DuplicatePolicy::Reject);
        assert_eq!(
            settings.bounds().expect("bounds").0,
            NaiveDate::from_ymd_opt(2021, 1, 1)
        );
    }

    #[test]
    fn named_args_win_over_files() {
        let toml = "[processing]\ninterval_days = 7\n";
        let named: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(r#"{"interval": 30, "end_date": "2021-12-31"}"#).expect("json");
        let config =
            Config::from_figment(Figment::new().merge(Toml::string(toml))).with_overrides(&named);
        let settings = config.processing().expect("settings");
        assert_eq!(settings.interval_days, 30);
        assert_eq!(settings.end_date.as_deref(), Some("2021-12-31"));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let zero_step = ProcessingSettings {
            interval_days: 0,
            ..Default::default()
        };
        assert!(matches!(zero_step.validate(), Err(Error::InvalidConfig(_))));
        let bad_bound = ProcessingSettings {
            start_date: Some("someday".into()),
            ..Default::default()
        };
        assert!(matches!(bad_bound.validate(), Err(Error::InvalidConfig(_))));
        let blank_bound = ProcessingSettings {
            end_date: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(blank_bound.bounds().expect("bounds"), (None, None));
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/srv/corpus");
        assert_eq!(
            resolve_with_base(base, "docs/a.txt"),
            PathBuf::from("/srv/corpus/docs/a.txt")
        );
        assert_eq!(
            resolve_with_base(base, "/abs/a.txt"),
            PathBuf::from("/abs/a.txt")
        );
    }

    #[test]
    fn load_layers_files_environment_and_env_vars() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[processing]\ninterval_days = 7\nngram = 2\nlang = \"fr\"\n",
            )?;
            jail.create_file("config.test.toml", "[processing]\nngram = 3\n")?;
            jail.create_file("config.prod.toml", "[processing]\nngram = 9\n")?;
            jail.set_env("RUST_ENV", "test");
            jail.set_env("PAPERLENS_PROCESSING__LANG", "de");
            jail.set_env("PAPERLENS_PROCESSING__TOP_NGRAMS", "5");

            let config = Config::load().map_err(|e| e.to_string())?;
            let settings = config.processing().map_err(|e| e.to_string())?;
            assert_eq!(settings.interval_days, 7);
            assert_eq!(settings.ngram, 3);
            assert_eq!(settings.lang, "de");
            assert_eq!(settings.top_ngrams, 5);
            assert_eq!(settings.item_id_field, "itemID");
            Ok(())
        });
    }

    #[test]
    fn load_without_files_uses_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RUST_ENV", "prod");
            let config = Config::load().map_err(|e| e.to_string())?;
            let settings = config.processing().map_err(|e| e.to_string())?;
            assert_eq!(settings, ProcessingSettings::default());
            Ok(())
        });
    }
}
