//! Error types for the extraction pipeline

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while turning a corpus into a feature matrix
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tokenize error in {} at {line}:{column}: {message}", path.display())]
    Tokenize {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Parse error in {} at {line}:{column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Extractor `{extractor}` failed on {}: {message}", path.display())]
    Extractor {
        path: PathBuf,
        extractor: &'static str,
        message: String,
    },

    #[error("Feature `{key}` is not part of the finalized schema")]
    SchemaMismatch { key: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Coarse classification of a [`FeatureError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Tokenize,
    Parse,
    Extractor,
    SchemaMismatch,
    Config,
    WorkerPool,
}

impl FeatureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeatureError::Io { .. } => ErrorKind::Io,
            FeatureError::Tokenize { .. } => ErrorKind::Tokenize,
            FeatureError::Parse { .. } => ErrorKind::Parse,
            FeatureError::Extractor { .. } => ErrorKind::Extractor,
            FeatureError::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            FeatureError::Config(_) => ErrorKind::Config,
            FeatureError::WorkerPool(_) => ErrorKind::WorkerPool,
        }
    }

    /// The file this error is about, if it concerns a single file
    pub fn path(&self) -> Option<&Path> {
        match self {
            FeatureError::Io { path, .. }
            | FeatureError::Tokenize { path, .. }
            | FeatureError::Parse { path, .. }
            | FeatureError::Extractor { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FeatureError>;
