//! Feature extraction
//!
//! Extractors are pure functions from a file's [`Representation`] to a
//! [`FeatureFragment`]. Each belongs to one [`Category`]; the registry runs
//! them in category order and the aggregator merges their fragments into the
//! file's [`FeatureSet`].
//!
//! # Feature names
//!
//! ```text
//! <category>/<feature>            fixed cardinality, e.g. lexical/num_tokens
//! <category>/<feature>/<symbol>   open vocabulary,   e.g. syntactic/node_type_tf/if_statement
//! ```
//!
//! The category prefix plus the extractor-owned feature name keeps keys unique
//! across extractors.

pub mod aggregate;
pub mod layout;
pub mod lexical;
pub mod registry;
pub mod syntactic;

pub use aggregate::aggregate;
pub use registry::ExtractorRegistry;

use crate::error::{FeatureError, Result};
use crate::parsers::Representation;
use std::collections::BTreeMap;
use std::fmt;

/// Tree node kinds counted as functions
pub const FUNCTION_KINDS: &[&str] = &[
    "method_declaration",
    "constructor_declaration",
    "compact_constructor_declaration",
];

/// Capability group of an extractor. Declaration order is aggregation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Lexical,
    Layout,
    Syntactic,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Lexical => "lexical",
            Category::Layout => "layout",
            Category::Syntactic => "syntactic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a fixed-cardinality feature
pub fn feature_key(category: Category, name: &str) -> String {
    format!("{}/{}", category.as_str(), name)
}

/// Key of one symbol of an open-vocabulary feature
pub fn term_key(category: Category, name: &str, symbol: &str) -> String {
    format!("{}/{}/{}", category.as_str(), name, symbol)
}

/// Named values produced by one extractor for one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFragment {
    values: BTreeMap<String, f64>,
}

impl FeatureFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    /// Insert only when a value was produced
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<f64>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Add one occurrence of a term
    pub fn increment(&mut self, key: impl Into<String>) {
        *self.values.entry(key.into()).or_insert(0.0) += 1.0;
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl IntoIterator for FeatureFragment {
    type Item = (String, f64);
    type IntoIter = std::collections::btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// All features of one file. Keys are unique; order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    values: BTreeMap<String, f64>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous one if the key was taken
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut set = FeatureSet::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

/// A named feature computation over one file's representations
///
/// # Example Implementation
///
/// ```ignore
/// pub struct NumSemicolons;
///
/// impl Extractor for NumSemicolons {
///     fn name(&self) -> &'static str { "semicolon_count" }
///     fn category(&self) -> Category { Category::Lexical }
///     fn description(&self) -> &'static str { "Semicolons per character" }
///
///     fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
///         let count = repr.tokens.iter().filter(|t| t.value == ";").count();
///         let mut fragment = FeatureFragment::new();
///         fragment.insert_opt(
///             feature_key(self.category(), "num_semicolons"),
///             normalize(self, repr, count)?,
///         );
///         Ok(fragment)
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// Unique identifier, used to disable the extractor from config
    fn name(&self) -> &'static str;

    fn category(&self) -> Category;

    /// Human-readable description of what is measured
    fn description(&self) -> &'static str;

    /// Compute this extractor's fragment. Must be deterministic and free of
    /// side effects.
    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment>;
}

/// Divide a count by the file length.
///
/// A zero-length file yields `None` (the feature is omitted). A non-zero
/// count on a zero-length file means the representations disagree and is
/// reported as an extractor error.
pub fn normalize<E: Extractor + ?Sized>(
    extractor: &E,
    repr: &Representation<'_>,
    count: usize,
) -> Result<Option<f64>> {
    if repr.length > 0 {
        return Ok(Some(count as f64 / repr.length as f64));
    }
    if count > 0 {
        return Err(FeatureError::Extractor {
            path: repr.path().to_path_buf(),
            extractor: extractor.name(),
            message: format!("{} occurrences in a zero-length file", count),
        });
    }
    Ok(None)
}

/// Mean and population standard deviation, `None` for an empty sample
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(feature_key(Category::Lexical, "num_tokens"), "lexical/num_tokens");
        assert_eq!(
            term_key(Category::Syntactic, "node_type_tf", "if_statement"),
            "syntactic/node_type_tf/if_statement"
        );
    }

    #[test]
    fn test_category_order() {
        assert!(Category::Lexical < Category::Layout);
        assert!(Category::Layout < Category::Syntactic);
    }

    #[test]
    fn test_fragment_increment() {
        let mut fragment = FeatureFragment::new();
        fragment.increment("a");
        fragment.increment("a");
        fragment.increment("b");
        fragment.insert_opt("c", None);
        assert_eq!(fragment.get("a"), Some(2.0));
        assert_eq!(fragment.get("b"), Some(1.0));
        assert_eq!(fragment.get("c"), None);
        assert_eq!(fragment.len(), 2);
    }

    #[test]
    fn test_feature_set_from_pairs() {
        let set: FeatureSet = [("a", 1.0), ("b", 2.0)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("b"), Some(2.0));
        assert!(!set.contains_key("c"));
    }

    #[test]
    fn test_mean_std() {
        assert_eq!(mean_std(&[]), None);
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(mean, 5.0);
        assert_eq!(std, 2.0);
    }
}
