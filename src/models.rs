//! Core data models shared across the extraction pipeline

use std::path::{Path, PathBuf};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// A source file loaded from the corpus. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path the file was read from
    pub path: PathBuf,
    /// Raw text content
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a file from disk.
    ///
    /// Invalid UTF-8 is replaced rather than rejected, so a stray byte in a
    /// submission never aborts a batch. A leading byte order mark is dropped
    /// and does not count towards the file length.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let decoded = String::from_utf8_lossy(&bytes);
        let text = decoded.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&*decoded);
        Ok(Self::new(path, text))
    }

    /// Length in characters, the denominator for length-normalized features
    pub fn length(&self) -> usize {
        self.text.chars().count()
    }

    /// Author identifier embedded in the file name (`<author>.java`)
    pub fn author(&self) -> Option<&str> {
        author_of(&self.path)
    }
}

/// Author identifier for a corpus path: the file stem.
pub fn author_of(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// 1-based line/column position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Kind of literal token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    FloatingPoint,
    Character,
    String,
    TextBlock,
    Boolean,
    Null,
}

/// Type tag of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Literal(LiteralKind),
    Operator,
    Separator,
}

impl TokenKind {
    pub fn is_literal(&self) -> bool {
        matches!(self, TokenKind::Literal(_))
    }
}

/// A lexical unit of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }
}

/// Ordered tokens of one file
pub type TokenStream = Vec<Token>;
