//! Syntactic features
//!
//! Features of the syntax tree. Only named nodes (grammar rules) take part in
//! depth, node types and bigrams; unnamed nodes are punctuation and keyword
//! leaves.
//!
//! A node bigram is a parent→child edge between two named nodes, keyed
//! `parent>child`. Sibling adjacency is not counted.

use super::{feature_key, term_key, Category, Extractor, FeatureFragment};
use crate::error::Result;
use crate::parsers::{is_keyword, Representation};
use std::sync::Arc;

/// Syntactic extractors in aggregation order
pub fn extractors() -> Vec<Arc<dyn Extractor>> {
    vec![
        Arc::new(MaxDepth),
        Arc::new(NodeBigramTf),
        Arc::new(NodeTypeTf),
        Arc::new(TreeKeywordTf),
    ]
}

/// Named nodes on the longest root-to-leaf path
pub struct MaxDepth;

impl Extractor for MaxDepth {
    fn name(&self) -> &'static str {
        "max_depth"
    }
    fn category(&self) -> Category {
        Category::Syntactic
    }
    fn description(&self) -> &'static str {
        "Maximum syntax tree depth"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let depth = repr.tree.named_depths().into_iter().max().unwrap_or(0);
        let mut fragment = FeatureFragment::new();
        fragment.insert(feature_key(self.category(), "max_depth"), depth as f64);
        Ok(fragment)
    }
}

pub struct NodeBigramTf;

impl Extractor for NodeBigramTf {
    fn name(&self) -> &'static str {
        "node_bigram_tf"
    }
    fn category(&self) -> Category {
        Category::Syntactic
    }
    fn description(&self) -> &'static str {
        "Term frequency of parent>child node type pairs"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let tree = &repr.tree;
        let mut fragment = FeatureFragment::new();
        for (id, parent) in tree.nodes().enumerate().filter(|(_, n)| n.named) {
            for child in tree.children(id).filter(|c| c.named) {
                let bigram = format!("{}>{}", parent.kind, child.kind);
                fragment.increment(term_key(self.category(), "node_bigram_tf", &bigram));
            }
        }
        Ok(fragment)
    }
}

pub struct NodeTypeTf;

impl Extractor for NodeTypeTf {
    fn name(&self) -> &'static str {
        "node_type_tf"
    }
    fn category(&self) -> Category {
        Category::Syntactic
    }
    fn description(&self) -> &'static str {
        "Term frequency of node types"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let mut fragment = FeatureFragment::new();
        for node in repr.tree.named_nodes() {
            fragment.increment(term_key(self.category(), "node_type_tf", node.kind));
        }
        Ok(fragment)
    }
}

/// Named leaves whose text is a keyword. Every other keyword appears as an
/// unnamed leaf; named leaves such as `string_fragment` carry user text.
const NAMED_KEYWORD_LEAVES: &[&str] = &["void_type", "boolean_type", "this", "super"];

/// Keywords as they appear among tree leaves: unnamed keyword tokens plus the
/// named leaves the grammar uses for `void`, `boolean`, `this` and `super`.
pub struct TreeKeywordTf;

impl Extractor for TreeKeywordTf {
    fn name(&self) -> &'static str {
        "tree_keyword_tf"
    }
    fn category(&self) -> Category {
        Category::Syntactic
    }
    fn description(&self) -> &'static str {
        "Term frequency of keywords among syntax tree leaves"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let mut fragment = FeatureFragment::new();
        let keyword_leaves = repr
            .tree
            .nodes()
            .filter(|n| n.is_leaf() && (!n.named || NAMED_KEYWORD_LEAVES.contains(&n.kind)));
        for node in keyword_leaves {
            let text = repr.node_text(node);
            if is_keyword(text) {
                fragment.increment(term_key(self.category(), "keyword_tf", text));
            }
        }
        Ok(fragment)
    }
}
