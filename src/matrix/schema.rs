//! Corpus-wide column schema

use crate::features::FeatureSet;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Sorted union of every feature name in a corpus, with column indices.
///
/// Built once per run and immutable afterwards. Ordering is plain byte-wise
/// lexicographic order, so it never depends on worker scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
    columns: FxHashMap<String, usize>,
}

impl FeatureSchema {
    pub fn build<'a, I>(feature_sets: I) -> Self
    where
        I: IntoIterator<Item = &'a FeatureSet>,
    {
        let mut union: BTreeSet<&str> = BTreeSet::new();
        for set in feature_sets {
            union.extend(set.keys());
        }

        let names: Vec<String> = union.into_iter().map(str::to_string).collect();
        let columns = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Self { names, columns }
    }

    /// Column index of a feature
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(&str, f64)]) -> FeatureSet {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_union_sorted() {
        let sets = vec![
            set(&[("b", 2.0), ("a", 1.0)]),
            set(&[("c", 4.0), ("b", 3.0)]),
            set(&[("a", 5.0)]),
        ];
        let schema = FeatureSchema::build(&sets);
        assert_eq!(schema.names(), &["a", "b", "c"]);
        assert_eq!(schema.column("a"), Some(0));
        assert_eq!(schema.column("c"), Some(2));
        assert_eq!(schema.column("d"), None);
    }

    #[test]
    fn test_order_independent_of_input_order() {
        let a = set(&[("lexical/x", 1.0), ("layout/y", 1.0)]);
        let b = set(&[("syntactic/z", 1.0)]);
        let forward = FeatureSchema::build([&a, &b]);
        let backward = FeatureSchema::build([&b, &a]);
        assert_eq!(forward, backward);
        assert_eq!(
            forward.names(),
            &["layout/y", "lexical/x", "syntactic/z"]
        );
    }

    #[test]
    fn test_empty_corpus() {
        let schema = FeatureSchema::build(Vec::<&FeatureSet>::new());
        assert!(schema.is_empty());
    }
}
