//! Lexical features
//!
//! Token-level habits: vocabulary, keyword usage, token and literal density,
//! function and ternary density, line lengths and parameter counts.
//! Densities are per character of source.

use super::{
    feature_key, mean_std, normalize, term_key, Category, Extractor, FeatureFragment,
    FUNCTION_KINDS,
};
use crate::error::Result;
use crate::models::TokenKind;
use crate::parsers::Representation;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lexical extractors in aggregation order
pub fn extractors() -> Vec<Arc<dyn Extractor>> {
    vec![
        Arc::new(WordUnigramTf),
        Arc::new(KeywordFrequency),
        Arc::new(TokenCount),
        Arc::new(LiteralCount),
        Arc::new(KeywordCount),
        Arc::new(FunctionCount),
        Arc::new(TernaryCount),
        Arc::new(LineLength),
        Arc::new(ParameterCount),
    ]
}

/// Occurrences of each identifier and literal spelling
pub struct WordUnigramTf;

impl Extractor for WordUnigramTf {
    fn name(&self) -> &'static str {
        "word_unigram_tf"
    }
    fn category(&self) -> Category {
        Category::Lexical
    }
    fn description(&self) -> &'static str {
        "Term frequency of identifier and literal words"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let mut fragment = FeatureFragment::new();
        for token in &repr.tokens {
            if matches!(token.kind, TokenKind::Identifier | TokenKind::Literal(_)) {
                fragment.increment(term_key(self.category(), "word_unigram_tf", &token.value));
            }
        }
        Ok(fragment)
    }
}

/// Density of each keyword that occurs in the file
pub struct KeywordFrequency;

impl Extractor for KeywordFrequency {
    fn name(&self) -> &'static str {
        "keyword_frequency"
    }
    fn category(&self) -> Category {
        Category::Lexical
    }
    fn description(&self) -> &'static str {
        "Per-keyword occurrences per character"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for token in repr.tokens.iter().filter(|t| t.kind == TokenKind::Keyword) {
            *counts.entry(token.value.as_str()).or_default() += 1;
        }

        let mut fragment = FeatureFragment::new();
        for (keyword, count) in counts {
            fragment.insert_opt(
                term_key(self.category(), "keyword", keyword),
                normalize(self, repr, count)?,
            );
        }
        Ok(fragment)
    }
}

pub struct TokenCount;

impl Extractor for TokenCount {
    fn name(&self) -> &'static str {
        "token_count"
    }
    fn category(&self) -> Category {
        Category::Lexical
    }
    fn description(&self) -> &'static str {
        "Tokens per character"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let mut fragment = FeatureFragment::new();
        fragment.insert_opt(
            feature_key(self.category(), "num_tokens"),
            normalize(self, repr, repr.tokens.len())?,
        );
        Ok(fragment)
    }
}

pub struct LiteralCount;

impl Extractor for LiteralCount {
    fn name(&self) -> &'static str {
        "literal_count"
    }
    fn category(&self) -> Category {
        Category::Lexical
    }
    fn description(&self) -> &'static str {
        "Literals per character"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let literals = repr.tokens.iter().filter(|t| t.kind.is_literal()).count();
        let mut fragment = FeatureFragment::new();
        fragment.insert_opt(
            feature_key(self.category(), "num_literals"),
            normalize(self, repr, literals)?,
        );
        Ok(fragment)
    }
}

/// Overall keyword density plus how many distinct keywords the author uses
pub struct KeywordCount;

impl Extractor for KeywordCount {
    fn name(&self) -> &'static str {
        "keyword_count"
    }
    fn category(&self) -> Category {
        Category::Lexical
    }
    fn description(&self) -> &'static str {
        "Keywords per character and distinct keyword count"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let keywords: Vec<&str> = repr
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Keyword)
            .map(|t| t.value.as_str())
            .collect();
        let mut distinct = keywords.clone();
        distinct.sort_unstable();
        distinct.dedup();

        let mut fragment = FeatureFragment::new();
        fragment.insert_opt(
            feature_key(self.category(), "num_keywords"),
            normalize(self, repr, keywords.len())?,
        );
        fragment.insert(
            feature_key(self.category(), "distinct_keywords"),
            distinct.len() as f64,
        );
        Ok(fragment)
    }
}

/// Method and constructor declarations per character
pub struct FunctionCount;

impl Extractor for FunctionCount {
    fn name(&self) -> &'static str {
        "function_count"
    }
    fn category(&self) -> Category {
        Category::Lexical
    }
    fn description(&self) -> &'static str {
        "Function declarations per character"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let functions = repr.tree.nodes_of_kind(FUNCTION_KINDS).count();
        let mut fragment = FeatureFragment::new();
        fragment.insert_opt(
            feature_key(self.category(), "num_functions"),
            normalize(self, repr, functions)?,
        );
        Ok(fragment)
    }
}

pub struct TernaryCount;

impl Extractor for TernaryCount {
    fn name(&self) -> &'static str {
        "ternary_count"
    }
    fn category(&self) -> Category {
        Category::Lexical
    }
    fn description(&self) -> &'static str {
        "Ternary expressions per character"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let ternaries = repr.tree.nodes_of_kind(&["ternary_expression"]).count();
        let mut fragment = FeatureFragment::new();
        fragment.insert_opt(
            feature_key(self.category(), "num_ternary"),
            normalize(self, repr, ternaries)?,
        );
        Ok(fragment)
    }
}

/// Mean and standard deviation of physical line length
pub struct LineLength;

impl Extractor for LineLength {
    fn name(&self) -> &'static str {
        "line_length"
    }
    fn category(&self) -> Category {
        Category::Lexical
    }
    fn description(&self) -> &'static str {
        "Mean and standard deviation of line length"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let lengths: Vec<f64> = repr
            .text()
            .lines()
            .map(|line| line.chars().count() as f64)
            .collect();

        let mut fragment = FeatureFragment::new();
        if let Some((mean, std)) = mean_std(&lengths) {
            fragment.insert(feature_key(self.category(), "avg_line_length"), mean);
            fragment.insert(feature_key(self.category(), "std_line_length"), std);
        }
        Ok(fragment)
    }
}

/// Mean and standard deviation of parameters per function
pub struct ParameterCount;

impl Extractor for ParameterCount {
    fn name(&self) -> &'static str {
        "parameter_count"
    }
    fn category(&self) -> Category {
        Category::Lexical
    }
    fn description(&self) -> &'static str {
        "Mean and standard deviation of function parameter counts"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let tree = &repr.tree;
        let counts: Vec<f64> = tree
            .nodes_of_kind(FUNCTION_KINDS)
            .map(|(id, _)| {
                tree.children(id)
                    .filter(|c| c.kind == "formal_parameters")
                    .flat_map(|params| params.children.iter().map(|&p| tree.node(p)))
                    .filter(|p| matches!(p.kind, "formal_parameter" | "spread_parameter"))
                    .count() as f64
            })
            .collect();

        let mut fragment = FeatureFragment::new();
        if let Some((mean, std)) = mean_std(&counts) {
            fragment.insert(feature_key(self.category(), "avg_params"), mean);
            fragment.insert(feature_key(self.category(), "std_params"), std);
        }
        Ok(fragment)
    }
}
