//! Extraction settings
//!
//! Loaded from `codestylo.toml` in the corpus directory:
//!
//! ```toml
//! # codestylo.toml
//! workers = 8
//! error_policy = "skip-failed"      # or "fail-fast" (default)
//! extensions = ["java"]
//! disabled_extractors = ["word_unigram_tf"]
//!
//! [export]
//! missing = "nan"                   # or "empty" (default)
//! label = "author"                  # "none" (default), "path", "author"
//! ```

use crate::error::{FeatureError, Result};
use crate::matrix::CsvOptions;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "codestylo.toml";
pub const DEFAULT_WORKERS: usize = 4;
pub const MAX_WORKERS: usize = 64;

/// What a batch does when one file fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// The first failure aborts the batch; no matrix is produced
    #[default]
    FailFast,
    /// Failing files are recorded and left out; the rest continue
    SkipFailed,
}

impl FromStr for ErrorPolicy {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fail-fast" => Ok(ErrorPolicy::FailFast),
            "skip-failed" => Ok(ErrorPolicy::SkipFailed),
            other => Err(FeatureError::Config(format!(
                "unknown error policy `{}` (expected fail-fast or skip-failed)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Worker threads for the per-file phase
    pub workers: usize,
    pub error_policy: ErrorPolicy,
    /// File extensions picked up from the corpus directory
    pub extensions: Vec<String>,
    /// Extractor names to leave out
    pub disabled_extractors: Vec<String>,
    pub export: CsvOptions,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            error_policy: ErrorPolicy::default(),
            extensions: vec!["java".to_string()],
            disabled_extractors: Vec::new(),
            export: CsvOptions::default(),
        }
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(FeatureError::Config(format!(
                "workers must be between 1 and {}, got {}",
                MAX_WORKERS, self.workers
            )));
        }
        if self.extensions.is_empty() {
            return Err(FeatureError::Config(
                "at least one file extension is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load and validate a config file.
pub fn load_config_file(path: &Path) -> Result<ExtractionConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| FeatureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ExtractionConfig = toml::from_str(&content)
        .map_err(|e| FeatureError::Config(format!("{}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Load `codestylo.toml` from a corpus directory, falling back to defaults
/// when it is absent or invalid.
pub fn load_config(corpus_dir: &Path) -> ExtractionConfig {
    let path = corpus_dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        return ExtractionConfig::default();
    }

    match load_config_file(&path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load {}: {}", path.display(), e);
            ExtractionConfig::default()
        }
    }
}
