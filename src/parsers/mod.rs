//! Source representations
//!
//! Turns one source file into the bundle every extractor works from: the raw
//! text, its token stream, and its syntax tree. Tokenizing and parsing are pure
//! functions of the text.

pub mod java;
pub mod tokenizer;
pub mod tree;

pub use tokenizer::{is_keyword, tokenize, LexError, JAVA_KEYWORDS};
pub use tree::{NodeId, SyntaxNode, SyntaxTree};

use crate::error::{FeatureError, Result};
use crate::models::{SourceFile, TokenStream};
use std::path::Path;

/// Everything extractors may look at for one file
#[derive(Debug)]
pub struct Representation<'a> {
    pub source: &'a SourceFile,
    /// Length in characters
    pub length: usize,
    pub tokens: TokenStream,
    pub tree: SyntaxTree,
}

impl<'a> Representation<'a> {
    pub fn text(&self) -> &'a str {
        &self.source.text
    }

    pub fn path(&self) -> &'a Path {
        &self.source.path
    }

    /// Source text covered by a tree node
    pub fn node_text(&self, node: &SyntaxNode) -> &'a str {
        self.source
            .text
            .get(node.start_byte..node.end_byte)
            .unwrap_or("")
    }
}

/// Tokenize and parse one file.
///
/// Tokenizing runs first, so lexically broken input reports a tokenize error
/// rather than a parse error.
pub fn represent(source: &SourceFile) -> Result<Representation<'_>> {
    let tokens = tokenize(&source.text).map_err(|e| FeatureError::Tokenize {
        path: source.path.clone(),
        line: e.line,
        column: e.column,
        message: e.message,
    })?;

    let tree = java::parse_tree(&source.text).map_err(|e| FeatureError::Parse {
        path: source.path.clone(),
        line: e.line,
        column: e.column,
        message: e.message,
    })?;

    Ok(Representation {
        source,
        length: source.length(),
        tokens,
        tree,
    })
}

/// Whether a path has one of the given extensions
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
