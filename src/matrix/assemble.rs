//! Matrix assembly
//!
//! Projects each file's feature set onto the schema. A feature a file did not
//! produce is a missing cell (`None`), never zero.

use super::FeatureSchema;
use crate::error::{FeatureError, Result};
use crate::features::FeatureSet;
use std::path::{Path, PathBuf};

/// Row-major feature matrix: one row per file, one column per schema entry
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    schema: FeatureSchema,
    paths: Vec<PathBuf>,
    cells: Vec<Option<f64>>,
}

impl FeatureMatrix {
    /// Lay out rows in the order given. `paths[i]` labels `feature_sets[i]`.
    ///
    /// Every key of every set must be in `schema`.
    pub fn assemble(
        schema: FeatureSchema,
        paths: Vec<PathBuf>,
        feature_sets: &[FeatureSet],
    ) -> Result<Self> {
        if paths.len() != feature_sets.len() {
            return Err(FeatureError::Config(format!(
                "{} row labels for {} feature sets",
                paths.len(),
                feature_sets.len()
            )));
        }

        let width = schema.len();
        let mut cells = vec![None; width * feature_sets.len()];

        for (row, set) in feature_sets.iter().enumerate() {
            let offset = row * width;
            for (key, value) in set.iter() {
                let column = schema
                    .column(key)
                    .ok_or_else(|| FeatureError::SchemaMismatch {
                        key: key.to_string(),
                    })?;
                cells[offset + column] = Some(value);
            }
        }

        Ok(Self {
            schema,
            paths,
            cells,
        })
    }

    /// Build the schema from the feature sets themselves, then assemble.
    pub fn from_feature_sets(paths: Vec<PathBuf>, feature_sets: &[FeatureSet]) -> Result<Self> {
        let schema = FeatureSchema::build(feature_sets);
        Self::assemble(schema, paths, feature_sets)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn columns(&self) -> &[String] {
        self.schema.names()
    }

    pub fn n_rows(&self) -> usize {
        self.paths.len()
    }

    pub fn n_cols(&self) -> usize {
        self.schema.len()
    }

    /// Source file of a row
    pub fn path(&self, row: usize) -> &Path {
        &self.paths[row]
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn row(&self, row: usize) -> &[Option<f64>] {
        let width = self.n_cols();
        &self.cells[row * width..(row + 1) * width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<f64>]> {
        (0..self.n_rows()).map(move |r| self.row(r))
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.row(row)[column]
    }

    /// Cell by feature name; `None` when missing or not in the schema
    pub fn value(&self, row: usize, feature: &str) -> Option<f64> {
        self.schema.column(feature).and_then(|c| self.get(row, c))
    }

    pub fn is_missing(&self, row: usize, column: usize) -> bool {
        self.get(row, column).is_none()
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn set(pairs: &[(&str, f64)]) -> FeatureSet {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("{}.java", i))).collect()
    }

    #[test]
    fn test_three_file_scenario() {
        let sets = vec![
            set(&[("a", 1.0), ("b", 2.0)]),
            set(&[("b", 3.0), ("c", 4.0)]),
            set(&[("a", 5.0)]),
        ];
        let matrix = FeatureMatrix::from_feature_sets(paths(3), &sets).unwrap();

        assert_eq!(matrix.columns(), &["a", "b", "c"]);
        assert_eq!(matrix.row(0), &[Some(1.0), Some(2.0), None]);
        assert_eq!(matrix.row(1), &[None, Some(3.0), Some(4.0)]);
        assert_eq!(matrix.row(2), &[Some(5.0), None, None]);
        assert_eq!(matrix.missing_count(), 4);
    }

    #[test]
    fn test_zero_is_not_missing() {
        let sets = vec![set(&[("a", 0.0)]), set(&[("b", 1.0)])];
        let matrix = FeatureMatrix::from_feature_sets(paths(2), &sets).unwrap();
        assert_eq!(matrix.get(0, 0), Some(0.0));
        assert!(!matrix.is_missing(0, 0));
        assert!(matrix.is_missing(1, 0));
        assert_eq!(matrix.value(1, "b"), Some(1.0));
        assert_eq!(matrix.value(1, "zzz"), None);
    }

    #[test]
    fn test_missing_iff_absent() {
        let sets = vec![
            set(&[("x", 1.5), ("y", -2.0)]),
            set(&[("z", 0.25)]),
            set(&[]),
            set(&[("x", 0.0), ("z", 9.0)]),
        ];
        let matrix = FeatureMatrix::from_feature_sets(paths(4), &sets).unwrap();
        assert_eq!(matrix.n_rows(), 4);
        assert_eq!(matrix.n_cols(), 3);
        for (i, s) in sets.iter().enumerate() {
            for (j, name) in matrix.columns().iter().enumerate() {
                assert_eq!(matrix.get(i, j), s.get(name));
            }
        }
    }

    #[test]
    fn test_unknown_key_is_schema_mismatch() {
        let schema = FeatureSchema::build(&[set(&[("a", 1.0)])]);
        let err = FeatureMatrix::assemble(schema, paths(1), &[set(&[("b", 1.0)])]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
        assert!(err.to_string().contains("`b`"));
    }

    #[test]
    fn test_label_count_must_match() {
        let sets = vec![set(&[("a", 1.0)])];
        assert!(FeatureMatrix::from_feature_sets(paths(2), &sets).is_err());
    }

    #[test]
    fn test_empty_corpus() {
        let matrix = FeatureMatrix::from_feature_sets(Vec::new(), &[]).unwrap();
        assert_eq!(matrix.n_rows(), 0);
        assert_eq!(matrix.n_cols(), 0);
        assert_eq!(matrix.rows().count(), 0);
    }
}
