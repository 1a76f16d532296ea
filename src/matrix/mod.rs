//! Schema building, matrix assembly and export
//!
//! Per-file feature sets have open-ended keys, so fixed-width rows only exist
//! once the whole corpus has been seen:
//!
//! ```text
//! [FeatureSet; N] ──► FeatureSchema (sorted key union, K columns)
//!                 ──► FeatureMatrix (N × K, None = missing) ──► CSV
//! ```

mod assemble;
mod export;
mod schema;

pub use assemble::FeatureMatrix;
pub use export::{CsvOptions, MissingMarker, RowLabel};
pub use schema::FeatureSchema;
