//! Extractor registry
//!
//! Holds the active extractors, kept sorted by category so aggregation order is
//! fixed: lexical, layout, syntactic, and registration order within each.

use super::{aggregate, layout, lexical, syntactic, Category, Extractor, FeatureSet};
use crate::error::{FeatureError, Result};
use crate::parsers::Representation;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in extractor
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for extractor in lexical::extractors()
            .into_iter()
            .chain(layout::extractors())
            .chain(syntactic::extractors())
        {
            registry.extractors.push(extractor);
        }
        registry
    }

    /// Add an extractor after the others of its category.
    ///
    /// Names must be unique; they are how extractors are disabled.
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) -> Result<()> {
        if self.contains(extractor.name()) {
            return Err(FeatureError::Config(format!(
                "extractor `{}` is already registered",
                extractor.name()
            )));
        }
        let category = extractor.category();
        let at = self
            .extractors
            .iter()
            .position(|e| e.category() > category)
            .unwrap_or(self.extractors.len());
        self.extractors.insert(at, extractor);
        Ok(())
    }

    /// Drop extractors by name. Unknown names are a configuration error.
    pub fn without<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        for name in names {
            let name = name.as_ref();
            if !self.contains(name) {
                return Err(FeatureError::Config(format!(
                    "unknown extractor `{}` (known: {})",
                    name,
                    self.names().join(", ")
                )));
            }
            self.extractors.retain(|e| e.name() != name);
        }
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.extractors.iter().any(|e| e.name() == name)
    }

    /// Extractor names in aggregation order
    pub fn names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Extractor> {
        self.extractors.iter().map(|e| e.as_ref())
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &dyn Extractor> {
        self.iter().filter(move |e| e.category() == category)
    }

    /// Run every extractor on one file and merge the fragments.
    pub fn extract(&self, repr: &Representation<'_>) -> Result<FeatureSet> {
        let mut fragments = Vec::with_capacity(self.extractors.len());
        for extractor in self.iter() {
            fragments.push((extractor, extractor.extract(repr)?));
        }
        let features = aggregate(repr.path(), fragments);
        debug!(
            "Extracted {} features from {}",
            features.len(),
            repr.path().display()
        );
        Ok(features)
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extractors", &self.names())
            .finish()
    }
}
