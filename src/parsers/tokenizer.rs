//! Java lexer
//!
//! Produces the ordered token stream used by lexical features. Whitespace and
//! comments are consumed but not emitted. Scanning stops at the first lexical
//! error (unterminated literal or comment, malformed number, stray character).

use crate::models::{LiteralKind, Position, Token, TokenKind, TokenStream};
use thiserror::Error;

/// Reserved words of the Java language. Contextual words (`var`, `record`,
/// `yield`, `sealed`, `permits`, ...) lex as identifiers.
pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while",
];

pub fn is_keyword(word: &str) -> bool {
    JAVA_KEYWORDS.contains(&word)
}

/// Punctuation, longest spellings first so the first match is the longest.
const PUNCTUATION: &[(&str, TokenKind)] = &[
    (">>>=", TokenKind::Operator),
    ("...", TokenKind::Separator),
    ("<<=", TokenKind::Operator),
    (">>=", TokenKind::Operator),
    (">>>", TokenKind::Operator),
    ("::", TokenKind::Separator),
    ("->", TokenKind::Operator),
    ("++", TokenKind::Operator),
    ("--", TokenKind::Operator),
    ("&&", TokenKind::Operator),
    ("||", TokenKind::Operator),
    ("==", TokenKind::Operator),
    ("!=", TokenKind::Operator),
    ("<=", TokenKind::Operator),
    (">=", TokenKind::Operator),
    ("+=", TokenKind::Operator),
    ("-=", TokenKind::Operator),
    ("*=", TokenKind::Operator),
    ("/=", TokenKind::Operator),
    ("&=", TokenKind::Operator),
    ("|=", TokenKind::Operator),
    ("^=", TokenKind::Operator),
    ("%=", TokenKind::Operator),
    ("<<", TokenKind::Operator),
    (">>", TokenKind::Operator),
    ("(", TokenKind::Separator),
    (")", TokenKind::Separator),
    ("{", TokenKind::Separator),
    ("}", TokenKind::Separator),
    ("[", TokenKind::Separator),
    ("]", TokenKind::Separator),
    (";", TokenKind::Separator),
    (",", TokenKind::Separator),
    (".", TokenKind::Separator),
    ("@", TokenKind::Separator),
    ("=", TokenKind::Operator),
    (">", TokenKind::Operator),
    ("<", TokenKind::Operator),
    ("!", TokenKind::Operator),
    ("~", TokenKind::Operator),
    ("?", TokenKind::Operator),
    (":", TokenKind::Operator),
    ("+", TokenKind::Operator),
    ("-", TokenKind::Operator),
    ("*", TokenKind::Operator),
    ("/", TokenKind::Operator),
    ("&", TokenKind::Operator),
    ("|", TokenKind::Operator),
    ("^", TokenKind::Operator),
    ("%", TokenKind::Operator),
];

/// Lexical scanning could not proceed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at {line}:{column}")]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Tokenize Java source text.
pub fn tokenize(text: &str) -> Result<TokenStream, LexError> {
    Lexer::new(text).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: TokenStream,
}

impl Lexer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<TokenStream, LexError> {
        while let Some(c) = self.peek(0) {
            if c.is_whitespace() {
                self.bump();
            } else if c == '/' && self.peek(1) == Some('/') {
                self.skip_line_comment();
            } else if c == '/' && self.peek(1) == Some('*') {
                self.skip_block_comment()?;
            } else if c == '"' {
                self.string_literal()?;
            } else if c == '\'' {
                self.char_literal()?;
            } else if c.is_ascii_digit()
                || (c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit()))
            {
                self.number_literal()?;
            } else if is_ident_start(c) {
                self.word();
            } else {
                self.punctuation()?;
            }
        }
        Ok(self.tokens)
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.pos += 1;
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            // A lone CR ends a line; CRLF is counted once, at the LF.
            '\r' if self.peek(0) != Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            '\r' => {}
            _ => self.column += 1,
        }
        Some(c)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn error(&self, at: Position, message: impl Into<String>) -> LexError {
        LexError {
            line: at.line,
            column: at.column,
            message: message.into(),
        }
    }

    fn text_from(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn push(&mut self, kind: TokenKind, start: usize, at: Position) {
        let value = self.text_from(start);
        self.tokens.push(Token::new(kind, value, at));
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' || c == '\r' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let at = self.position();
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek(0) == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(self.error(at, "unterminated block comment")),
            }
        }
    }

    fn string_literal(&mut self) -> Result<(), LexError> {
        if self.peek(1) == Some('"') && self.peek(2) == Some('"') {
            return self.text_block();
        }

        let start = self.pos;
        let at = self.position();
        self.bump();
        loop {
            match self.peek(0) {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    match self.peek(0) {
                        Some('\n') | Some('\r') | None => {
                            return Err(self.error(at, "unterminated string literal"))
                        }
                        Some(_) => {
                            self.bump();
                        }
                    }
                }
                Some('\n') | Some('\r') | None => {
                    return Err(self.error(at, "unterminated string literal"))
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        self.push(TokenKind::Literal(LiteralKind::String), start, at);
        Ok(())
    }

    fn text_block(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let at = self.position();
        for _ in 0..3 {
            self.bump();
        }

        // The opening delimiter must be followed by a line terminator.
        while matches!(self.peek(0), Some(' ') | Some('\t') | Some('\x0C')) {
            self.bump();
        }
        match self.peek(0) {
            Some('\n') | Some('\r') => {}
            _ => return Err(self.error(at, "text block must start on a new line")),
        }

        loop {
            match self.peek(0) {
                Some('"') if self.peek(1) == Some('"') && self.peek(2) == Some('"') => {
                    for _ in 0..3 {
                        self.bump();
                    }
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if self.bump().is_none() {
                        return Err(self.error(at, "unterminated text block"));
                    }
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.error(at, "unterminated text block")),
            }
        }
        self.push(TokenKind::Literal(LiteralKind::TextBlock), start, at);
        Ok(())
    }

    fn char_literal(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let at = self.position();
        self.bump();

        if self.peek(0) == Some('\'') {
            return Err(self.error(at, "empty character literal"));
        }

        loop {
            match self.peek(0) {
                Some('\'') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    match self.peek(0) {
                        Some('\n') | Some('\r') | None => {
                            return Err(self.error(at, "unterminated character literal"))
                        }
                        Some(_) => {
                            self.bump();
                        }
                    }
                }
                Some('\n') | Some('\r') | None => {
                    return Err(self.error(at, "unterminated character literal"))
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        self.push(TokenKind::Literal(LiteralKind::Character), start, at);
        Ok(())
    }

    fn eat_digits(&mut self, accept: impl Fn(char) -> bool) -> usize {
        let mut digits = 0;
        while let Some(c) = self.peek(0) {
            if accept(c) {
                digits += 1;
                self.bump();
            } else if c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        digits
    }

    /// Optional signed exponent after `e`/`p`; returns false when malformed.
    fn eat_exponent(&mut self) -> bool {
        self.bump();
        if matches!(self.peek(0), Some('+') | Some('-')) {
            self.bump();
        }
        self.eat_digits(|c| c.is_ascii_digit()) > 0
    }

    fn number_literal(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let at = self.position();
        let mut floating = false;

        let radix_prefix = if self.peek(0) == Some('0') {
            self.peek(1).map(|c| c.to_ascii_lowercase())
        } else {
            None
        };

        match radix_prefix {
            Some('x') => {
                self.bump();
                self.bump();
                let mut digits = self.eat_digits(|c| c.is_ascii_hexdigit());
                if self.peek(0) == Some('.') {
                    self.bump();
                    digits += self.eat_digits(|c| c.is_ascii_hexdigit());
                    floating = true;
                }
                if digits == 0 {
                    return Err(self.error(at, "malformed hexadecimal literal"));
                }
                if matches!(self.peek(0), Some('p') | Some('P')) {
                    if !self.eat_exponent() {
                        return Err(self.error(at, "malformed floating-point exponent"));
                    }
                    floating = true;
                } else if floating {
                    return Err(self.error(at, "hexadecimal float requires an exponent"));
                }
            }
            Some('b') => {
                self.bump();
                self.bump();
                if self.eat_digits(|c| c == '0' || c == '1') == 0 {
                    return Err(self.error(at, "malformed binary literal"));
                }
            }
            _ => {
                self.eat_digits(|c| c.is_ascii_digit());
                if self.peek(0) == Some('.') && self.peek(1) != Some('.') {
                    self.bump();
                    self.eat_digits(|c| c.is_ascii_digit());
                    floating = true;
                }
                if matches!(self.peek(0), Some('e') | Some('E')) {
                    if !self.eat_exponent() {
                        return Err(self.error(at, "malformed floating-point exponent"));
                    }
                    floating = true;
                }
            }
        }

        match self.peek(0) {
            Some('l') | Some('L') if !floating => {
                self.bump();
            }
            Some('f') | Some('F') | Some('d') | Some('D') if radix_prefix != Some('b') => {
                self.bump();
                floating = true;
            }
            _ => {}
        }

        if self.peek(0).is_some_and(is_ident_part) {
            return Err(self.error(at, "malformed numeric literal"));
        }

        let kind = if floating {
            LiteralKind::FloatingPoint
        } else {
            LiteralKind::Integer
        };
        self.push(TokenKind::Literal(kind), start, at);
        Ok(())
    }

    fn word(&mut self) {
        let start = self.pos;
        let at = self.position();
        while self.peek(0).is_some_and(is_ident_part) {
            self.bump();
        }
        let word = self.text_from(start);
        let kind = match word.as_str() {
            "true" | "false" => TokenKind::Literal(LiteralKind::Boolean),
            "null" => TokenKind::Literal(LiteralKind::Null),
            w if is_keyword(w) => TokenKind::Keyword,
            _ => TokenKind::Identifier,
        };
        self.tokens.push(Token::new(kind, word, at));
    }

    fn punctuation(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let at = self.position();
        for (text, kind) in PUNCTUATION {
            let matches = text
                .chars()
                .enumerate()
                .all(|(i, c)| self.peek(i) == Some(c));
            if matches {
                for _ in 0..text.chars().count() {
                    self.bump();
                }
                self.push(*kind, start, at);
                return Ok(());
            }
        }

        let c = self.peek(0).unwrap_or_default();
        Err(self.error(at, format!("unexpected character {:?}", c)))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn values(text: &str) -> Vec<String> {
        tokenize(text).unwrap().into_iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_simple_class() {
        let tokens = tokenize("public class A { int x = 42; }").unwrap();
        let vals: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(
            vals,
            vec!["public", "class", "A", "{", "int", "x", "=", "42", ";", "}"]
        );
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[7].kind, TokenKind::Literal(LiteralKind::Integer));
        assert_eq!(tokens[3].kind, TokenKind::Separator);
        assert_eq!(tokens[6].kind, TokenKind::Operator);
    }

    #[test]
    fn test_positions_are_one_based() {
        let tokens = tokenize("int a;\n  a = 1;").unwrap();
        assert_eq!(tokens[0].position, Position::new(1, 1));
        assert_eq!(tokens[3].position, Position::new(2, 3));
    }

    #[test]
    fn test_comments_are_skipped() {
        let vals = values("// line\nint /* block\n comment */ x;");
        assert_eq!(vals, vec!["int", "x", ";"]);
    }

    #[test]
    fn test_longest_operator_match() {
        assert_eq!(values("a >>>= b"), vec!["a", ">>>=", "b"]);
        assert_eq!(values("x->x"), vec!["x", "->", "x"]);
        assert_eq!(values("String::valueOf"), vec!["String", "::", "valueOf"]);
        assert_eq!(values("int... xs"), vec!["int", "...", "xs"]);
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds("1 0x1F 0b101 1_000L 3.14 .5 1e10 2f 'c' '\\n' \"s\" true null"),
            vec![
                TokenKind::Literal(LiteralKind::Integer),
                TokenKind::Literal(LiteralKind::Integer),
                TokenKind::Literal(LiteralKind::Integer),
                TokenKind::Literal(LiteralKind::Integer),
                TokenKind::Literal(LiteralKind::FloatingPoint),
                TokenKind::Literal(LiteralKind::FloatingPoint),
                TokenKind::Literal(LiteralKind::FloatingPoint),
                TokenKind::Literal(LiteralKind::FloatingPoint),
                TokenKind::Literal(LiteralKind::Character),
                TokenKind::Literal(LiteralKind::Character),
                TokenKind::Literal(LiteralKind::String),
                TokenKind::Literal(LiteralKind::Boolean),
                TokenKind::Literal(LiteralKind::Null),
            ]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        assert_eq!(values(r#"s = "a\"b";"#), vec!["s", "=", r#""a\"b""#, ";"]);
    }

    #[test]
    fn test_text_block() {
        let tokens = tokenize("String s = \"\"\"\n  hi \"there\"\n  \"\"\";").unwrap();
        assert_eq!(tokens[3].kind, TokenKind::Literal(LiteralKind::TextBlock));
        assert_eq!(tokens[4].value, ";");
    }

    #[test]
    fn test_contextual_words_are_identifiers() {
        assert_eq!(
            kinds("var record"),
            vec![TokenKind::Identifier, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_unicode_identifier() {
        let tokens = tokenize("int größe = 1;").unwrap();
        assert_eq!(tokens[1].value, "größe");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("String s = \"oops;\nint x;").unwrap_err();
        assert!(err.message.contains("unterminated string"));
        assert_eq!((err.line, err.column), (1, 12));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = tokenize("int x; /* never closed").unwrap_err();
        assert!(err.message.contains("unterminated block comment"));
    }

    #[test]
    fn test_empty_char_literal() {
        let err = tokenize("char c = '';").unwrap_err();
        assert!(err.message.contains("empty character literal"));
    }

    #[test]
    fn test_malformed_numbers() {
        assert!(tokenize("int x = 0x;").is_err());
        assert!(tokenize("double d = 1e;").is_err());
        assert!(tokenize("int y = 12abc;").is_err());
    }

    #[test]
    fn test_illegal_character() {
        let err = tokenize("int #x;").unwrap_err();
        assert!(err.message.contains("unexpected character"));
        assert_eq!(err.column, 5);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_crlf_line_counting() {
        let tokens = tokenize("a\r\nb\rc").unwrap();
        assert_eq!(tokens[1].position, Position::new(2, 1));
        assert_eq!(tokens[2].position, Position::new(3, 1));
    }
}
