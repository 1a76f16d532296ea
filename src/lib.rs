//! codestylo - stylometric feature extraction for source-code authorship
//!
//! Turns a corpus of Java files into a numeric feature matrix, one row per
//! file and one column per feature observed anywhere in the corpus:
//!
//! ```text
//! path ──► SourceFile ──► Representation (length, tokens, syntax tree)
//!      ──► extractors (lexical, layout, syntactic) ──► FeatureSet
//!      ──► FeatureSchema ──► FeatureMatrix ──► CSV
//! ```
//!
//! Cells a file does not produce are missing (`None`), never zero.
//!
//! ```no_run
//! use codestylo::{discover_files, Extraction, ExtractorRegistry};
//!
//! # fn main() -> codestylo::Result<()> {
//! let files = discover_files("corpus".as_ref(), &["java".to_string()])?;
//! let report = Extraction::new(ExtractorRegistry::standard())
//!     .with_workers(8)
//!     .run(&files)?;
//! println!("{} x {}", report.matrix.n_rows(), report.matrix.n_cols());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod matrix;
pub mod models;
pub mod parsers;
pub mod pipeline;

pub use config::{ErrorPolicy, ExtractionConfig};
pub use error::{ErrorKind, FeatureError, Result};
pub use features::{Category, Extractor, ExtractorRegistry, FeatureFragment, FeatureSet};
pub use matrix::{CsvOptions, FeatureMatrix, FeatureSchema, MissingMarker, RowLabel};
pub use models::SourceFile;
pub use parsers::{represent, Representation};
pub use pipeline::{
    discover_files, extract_file, extract_source, BatchOutput, Extraction, ExtractionReport,
    FileFailure,
};
