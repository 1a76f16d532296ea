//! Extraction pipeline
//!
//! Runs the per-file work in parallel, then builds the matrix:
//!
//! ```text
//!  files ──► [worker pool] read → tokenize/parse → extractors → aggregate
//!        ──► Vec<FeatureSet> (input order)
//!        ──► FeatureSchema ──► FeatureMatrix
//! ```
//!
//! Per-file work shares no mutable state. The pool is created for each batch
//! and dropped when the batch returns, on success and failure alike. Schema
//! and matrix construction need every file's result, so they run afterwards
//! on the calling thread.

mod corpus;

pub use corpus::discover_files;

use crate::config::{ErrorPolicy, ExtractionConfig, DEFAULT_WORKERS};
use crate::error::{FeatureError, Result};
use crate::features::{ExtractorRegistry, FeatureSet};
use crate::matrix::FeatureMatrix;
use crate::models::SourceFile;
use crate::parsers::represent;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Progress callback: (completed files, total files)
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Extract the feature set of an in-memory source file.
pub fn extract_source(source: &SourceFile, registry: &ExtractorRegistry) -> Result<FeatureSet> {
    let repr = represent(source)?;
    registry.extract(&repr)
}

/// Read and extract one file.
pub fn extract_file(path: &Path, registry: &ExtractorRegistry) -> Result<FeatureSet> {
    let source = SourceFile::read(path).map_err(|source| FeatureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_source(&source, registry)
}

/// Run `op` on a dedicated pool of `workers` threads.
///
/// The pool lives only for this call.
fn with_pool<R, F>(workers: usize, op: F) -> Result<R>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("codestylo-worker-{}", i))
        .build()?;
    Ok(pool.install(op))
}

/// Features of one successfully processed file
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFile {
    pub path: PathBuf,
    pub features: FeatureSet,
}

/// A file left out under [`ErrorPolicy::SkipFailed`]
#[derive(Debug)]
pub struct FileFailure {
    /// Position in the input list
    pub index: usize,
    pub path: PathBuf,
    pub error: FeatureError,
}

/// Result of the parallel phase
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Successful files, in input order
    pub files: Vec<ExtractedFile>,
    /// Always empty under fail-fast
    pub failures: Vec<FileFailure>,
}

/// End-to-end result: the matrix plus any files that were skipped
#[derive(Debug)]
pub struct ExtractionReport {
    pub matrix: FeatureMatrix,
    pub failures: Vec<FileFailure>,
}

/// Corpus extraction: parallel per-file features, then schema and matrix.
pub struct Extraction {
    registry: ExtractorRegistry,
    workers: usize,
    policy: ErrorPolicy,
    progress: Option<ProgressCallback>,
}

impl Extraction {
    pub fn new(registry: ExtractorRegistry) -> Self {
        Self {
            registry,
            workers: DEFAULT_WORKERS,
            policy: ErrorPolicy::default(),
            progress: None,
        }
    }

    /// Standard extractors minus the disabled ones, with the configured
    /// worker count and error policy.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        config.validate()?;
        let registry = ExtractorRegistry::standard().without(&config.disabled_extractors)?;
        Ok(Self::new(registry)
            .with_workers(config.workers)
            .with_error_policy(config.error_policy))
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Extract every file in parallel. Output order equals input order.
    pub fn extract_files(&self, files: &[PathBuf]) -> Result<BatchOutput> {
        let total = files.len();
        let completed = AtomicUsize::new(0);

        let task = |path: &PathBuf| {
            let result = extract_file(path, &self.registry);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref callback) = self.progress {
                callback(done, total);
            }
            result
        };

        match self.policy {
            ErrorPolicy::FailFast => {
                let sets = with_pool(self.workers, || {
                    files.par_iter().map(task).collect::<Result<Vec<_>>>()
                })??;
                let files = files
                    .iter()
                    .cloned()
                    .zip(sets)
                    .map(|(path, features)| ExtractedFile { path, features })
                    .collect();
                Ok(BatchOutput {
                    files,
                    failures: Vec::new(),
                })
            }
            ErrorPolicy::SkipFailed => {
                let results: Vec<Result<FeatureSet>> =
                    with_pool(self.workers, || files.par_iter().map(task).collect())?;

                let mut output = BatchOutput::default();
                for (index, (path, result)) in files.iter().zip(results).enumerate() {
                    match result {
                        Ok(features) => output.files.push(ExtractedFile {
                            path: path.clone(),
                            features,
                        }),
                        Err(error) => {
                            warn!("Skipping {}: {}", path.display(), error);
                            output.failures.push(FileFailure {
                                index,
                                path: path.clone(),
                                error,
                            });
                        }
                    }
                }
                Ok(output)
            }
        }
    }

    /// Extract a batch and assemble its feature matrix.
    pub fn run(&self, files: &[PathBuf]) -> Result<ExtractionReport> {
        let start = Instant::now();
        info!(
            "Extracting features from {} files with {} workers ({} extractors)",
            files.len(),
            self.workers,
            self.registry.len()
        );

        let batch = self.extract_files(files)?;
        debug!("Parallel phase done in {:?}", start.elapsed());

        let (paths, sets): (Vec<PathBuf>, Vec<FeatureSet>) = batch
            .files
            .into_iter()
            .map(|f| (f.path, f.features))
            .unzip();
        let matrix = FeatureMatrix::from_feature_sets(paths, &sets)?;

        info!(
            "Feature matrix: {} rows x {} columns, {} files skipped, in {:?}",
            matrix.n_rows(),
            matrix.n_cols(),
            batch.failures.len(),
            start.elapsed()
        );

        Ok(ExtractionReport {
            matrix,
            failures: batch.failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn corpus(files: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let paths = files
            .iter()
            .map(|(name, text)| {
                let path = dir.path().join(name);
                std::fs::write(&path, text).unwrap();
                path
            })
            .collect();
        (dir, paths)
    }

    fn java(i: usize) -> String {
        let mut body = String::new();
        for m in 0..(i % 4) {
            body.push_str(&format!("    int m{}(int a) {{ return a > {} ? a : {}; }}\n", m, i, m));
        }
        format!("class C{} {{\n{}}}\n", i, body)
    }

    #[test]
    fn test_rows_follow_input_order() {
        let sources: Vec<(String, String)> =
            (0..24).map(|i| (format!("f{:02}.java", i), java(i))).collect();
        let refs: Vec<(&str, &str)> = sources
            .iter()
            .map(|(n, t)| (n.as_str(), t.as_str()))
            .collect();
        let (_dir, paths) = corpus(&refs);

        let report = Extraction::new(ExtractorRegistry::standard())
            .with_workers(4)
            .run(&paths)
            .unwrap();

        assert_eq!(report.matrix.n_rows(), 24);
        assert_eq!(report.matrix.paths(), paths.as_slice());
        for (i, path) in paths.iter().enumerate() {
            let expected = extract_file(path, &ExtractorRegistry::standard()).unwrap();
            for (j, name) in report.matrix.columns().iter().enumerate() {
                assert_eq!(report.matrix.get(i, j), expected.get(name));
            }
        }
    }

    #[test]
    fn test_worker_count_does_not_change_result() {
        let sources: Vec<(String, String)> =
            (0..10).map(|i| (format!("f{}.java", i), java(i))).collect();
        let refs: Vec<(&str, &str)> = sources
            .iter()
            .map(|(n, t)| (n.as_str(), t.as_str()))
            .collect();
        let (_dir, paths) = corpus(&refs);

        let one = Extraction::new(ExtractorRegistry::standard())
            .with_workers(1)
            .run(&paths)
            .unwrap();
        let many = Extraction::new(ExtractorRegistry::standard())
            .with_workers(8)
            .run(&paths)
            .unwrap();
        assert_eq!(one.matrix, many.matrix);
    }

    #[test]
    fn test_fail_fast_reports_parse_error_path() {
        let (_dir, paths) = corpus(&[
            ("good.java", "class A {}"),
            ("bad.java", "class B { void f( }"),
            ("also_good.java", "class C {}"),
        ]);

        let err = Extraction::new(ExtractorRegistry::standard())
            .run(&paths)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.path(), Some(paths[1].as_path()));
    }

    #[test]
    fn test_skip_failed_records_failures() {
        let (_dir, paths) = corpus(&[
            ("good.java", "class A {}"),
            ("bad.java", "class B { String s = \"open; }"),
            ("also_good.java", "class C { int f() { return 1; } }"),
        ]);

        let report = Extraction::new(ExtractorRegistry::standard())
            .with_error_policy(ErrorPolicy::SkipFailed)
            .run(&paths)
            .unwrap();

        assert_eq!(report.matrix.n_rows(), 2);
        assert_eq!(report.matrix.path(0), paths[0].as_path());
        assert_eq!(report.matrix.path(1), paths[2].as_path());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].error.kind(), ErrorKind::Tokenize);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Extraction::new(ExtractorRegistry::standard())
            .run(&[dir.path().join("ghost.java")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_empty_file_row() {
        let (_dir, paths) = corpus(&[("empty.java", ""), ("full.java", "class A { int x; }")]);
        let report = Extraction::new(ExtractorRegistry::standard())
            .run(&paths)
            .unwrap();
        let m = &report.matrix;

        assert_eq!(m.value(0, "lexical/num_tokens"), None);
        assert_eq!(m.value(0, "lexical/num_functions"), None);
        assert_eq!(m.value(0, "layout/num_tabs"), Some(0.0));
        assert_eq!(m.value(1, "lexical/num_functions"), Some(0.0));
    }

    #[test]
    fn test_single_line_file_has_zero_function_count() {
        let source = SourceFile::new("one.java", "class A { int x = 1; }");
        let features = extract_source(&source, &ExtractorRegistry::standard()).unwrap();
        assert_eq!(features.get("lexical/num_functions"), Some(0.0));
    }

    #[test]
    fn test_keyword_inside_string_counts_nowhere() {
        let source = SourceFile::new("s.java", "class A { String s = \"while\"; }");
        let features = extract_source(&source, &ExtractorRegistry::standard()).unwrap();
        assert_eq!(features.get("lexical/keyword/while"), None);
        assert_eq!(features.get("syntactic/keyword_tf/while"), None);
        assert_eq!(features.get("syntactic/keyword_tf/class"), Some(1.0));
    }

    #[test]
    fn test_file_with_byte_order_mark() {
        let (_dir, paths) = corpus(&[("bom.java", "\u{FEFF}class A { int f() { return 1; } }")]);
        let features = extract_file(&paths[0], &ExtractorRegistry::standard()).unwrap();
        assert!(features.get("lexical/num_functions").unwrap() > 0.0);
    }

    #[test]
    fn test_progress_reaches_total() {
        let (_dir, paths) = corpus(&[("a.java", "class A {}"), ("b.java", "class B {}")]);
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_callback = Arc::clone(&seen);

        Extraction::new(ExtractorRegistry::standard())
            .with_progress(Box::new(move |done: usize, total: usize| {
                assert!(done <= total);
                seen_in_callback.fetch_max(done, Ordering::SeqCst);
            }))
            .run(&paths)
            .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            workers: 2,
            error_policy: ErrorPolicy::SkipFailed,
            disabled_extractors: vec!["word_unigram_tf".to_string()],
            ..Default::default()
        };
        let extraction = Extraction::from_config(&config).unwrap();
        assert_eq!(extraction.workers(), 2);
        assert_eq!(extraction.error_policy(), ErrorPolicy::SkipFailed);
        assert!(!extraction.registry().contains("word_unigram_tf"));

        let bad = ExtractionConfig {
            disabled_extractors: vec!["nope".to_string()],
            ..Default::default()
        };
        assert!(Extraction::from_config(&bad).is_err());
    }

    #[test]
    fn test_empty_batch() {
        let report = Extraction::new(ExtractorRegistry::standard())
            .run(&[])
            .unwrap();
        assert_eq!(report.matrix.n_rows(), 0);
        assert_eq!(report.matrix.n_cols(), 0);
    }
}
