//! Lexer implementation

use super::token::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

/// Fatal lexical errors. Tokenization cannot continue past any of these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at line {line}, column {column}")]
    UnexpectedChar { ch: char, line: usize, column: usize },

    #[error("unterminated string literal starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("invalid scientific notation at line {line}, column {column}")]
    InvalidExponent { line: usize, column: usize },
}

/// The fourteen declaration keywords, as source text. Shared with block
/// extraction, which scans prose for lines that mention one of these.
pub const DECLARATION_KEYWORDS: [&str; 14] = [
    "kind",
    "datum",
    "contract",
    "plan",
    "branch",
    "agent",
    "cue",
    "maplet",
    "apply",
    "default",
    "test",
    "memory",
    "confidence",
    "validation",
];

/// Reserved word table, built once and shared read-only across parses.
static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("kind", TokenKind::Kind),
        ("datum", TokenKind::Datum),
        ("contract", TokenKind::Contract),
        ("plan", TokenKind::Plan),
        ("branch", TokenKind::Branch),
        ("agent", TokenKind::Agent),
        ("cue", TokenKind::Cue),
        ("maplet", TokenKind::Maplet),
        ("apply", TokenKind::Apply),
        ("default", TokenKind::Default),
        ("test", TokenKind::Test),
        ("memory", TokenKind::Memory),
        ("confidence", TokenKind::Confidence),
        ("validation", TokenKind::Validation),
        ("requires", TokenKind::Requires),
        ("ensures", TokenKind::Ensures),
        ("steps", TokenKind::Steps),
        ("when", TokenKind::When),
        ("else", TokenKind::Else),
        ("suggests", TokenKind::Suggests),
    ])
});

/// Lexer for the Sigil DSL.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            pos: 0,
        }
    }

    /// Tokenize the entire source.
    ///
    /// The returned sequence always ends with a single `Eof` token. Any
    /// unrecognized character or malformed literal aborts the whole pass.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    /// Get the next token from the source.
    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let start_pos = self.pos;
        let start_line = self.line;
        let start_col = self.column;

        let mut string_value = None;

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => match c {
                '(' => {
                    self.advance();
                    TokenKind::LParen
                }
                ')' => {
                    self.advance();
                    TokenKind::RParen
                }
                '{' => {
                    self.advance();
                    TokenKind::LBrace
                }
                '}' => {
                    self.advance();
                    TokenKind::RBrace
                }
                '[' => {
                    self.advance();
                    TokenKind::LBracket
                }
                ']' => {
                    self.advance();
                    TokenKind::RBracket
                }
                ':' => {
                    self.advance();
                    TokenKind::Colon
                }
                ',' => {
                    self.advance();
                    TokenKind::Comma
                }
                '-' => {
                    self.advance();
                    TokenKind::Dash
                }

                '=' => {
                    self.advance();
                    if self.peek_char() == Some('=') {
                        self.advance();
                    }
                    TokenKind::Eq
                }
                '>' => {
                    self.advance();
                    if self.peek_char() == Some('=') {
                        self.advance();
                        TokenKind::Ge
                    } else {
                        TokenKind::Gt
                    }
                }
                '<' => {
                    self.advance();
                    if self.peek_char() == Some('=') {
                        self.advance();
                        TokenKind::Le
                    } else {
                        TokenKind::Lt
                    }
                }
                '!' if self.peek_next_char() == Some('=') => {
                    self.advance();
                    self.advance();
                    TokenKind::Ne
                }
                '≥' => {
                    self.advance();
                    TokenKind::Ge
                }
                '≤' => {
                    self.advance();
                    TokenKind::Le
                }
                '≠' => {
                    self.advance();
                    TokenKind::Ne
                }

                '∷' => {
                    self.advance();
                    TokenKind::TypeAnnotation
                }
                '→' => {
                    self.advance();
                    TokenKind::FunctionArrow
                }
                '▸' => {
                    self.advance();
                    TokenKind::Application
                }
                '§' => {
                    self.advance();
                    TokenKind::SectionDelimiter
                }
                '⎇' => {
                    self.advance();
                    TokenKind::BranchSymbol
                }
                '⊨' => {
                    self.advance();
                    TokenKind::Entailment
                }
                '⟦' => {
                    self.advance();
                    TokenKind::AgentBracketOpen
                }
                '⟧' => {
                    self.advance();
                    TokenKind::AgentBracketClose
                }

                '"' => {
                    let value = self.scan_string(start_line, start_col)?;
                    string_value = Some(value);
                    TokenKind::String
                }

                c if c.is_ascii_digit() || c == '+' => self.scan_number()?,

                c if c.is_alphabetic() || c == '_' => self.scan_word(),

                c => {
                    return Err(LexError::UnexpectedChar {
                        ch: c,
                        line: start_line,
                        column: start_col,
                    });
                }
            },
        };

        let text = match string_value {
            Some(value) => value,
            None => self.source[start_pos..self.pos].to_string(),
        };

        Ok(Token {
            kind,
            text,
            span: Span {
                start: start_pos,
                end: self.pos,
                line: start_line,
                column: start_col,
            },
        })
    }

    /// Scan an identifier, keyword, or boolean literal. Identifiers accept
    /// any Unicode letter; the reserved words are all ASCII.
    fn scan_word(&mut self) -> TokenKind {
        let start = self.pos;

        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let word = &self.source[start..self.pos];
        match word {
            "true" | "false" => TokenKind::Boolean,
            _ => KEYWORDS.get(word).copied().unwrap_or(TokenKind::Identifier),
        }
    }

    /// Scan a string literal with escape sequences.
    ///
    /// Raw newlines inside the literal are allowed and advance the line
    /// counter. An unknown escape passes the escaped character through with
    /// the backslash dropped.
    fn scan_string(&mut self, start_line: usize, start_col: usize) -> Result<String, LexError> {
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.peek_char() {
                None => {
                    return Err(LexError::UnterminatedString {
                        line: start_line,
                        column: start_col,
                    });
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        None => {
                            return Err(LexError::UnterminatedString {
                                line: start_line,
                                column: start_col,
                            });
                        }
                        Some('n') => {
                            self.advance();
                            value.push('\n');
                        }
                        Some('r') => {
                            self.advance();
                            value.push('\r');
                        }
                        Some('t') => {
                            self.advance();
                            value.push('\t');
                        }
                        Some('\\') => {
                            self.advance();
                            value.push('\\');
                        }
                        Some('"') => {
                            self.advance();
                            value.push('"');
                        }
                        Some(other) => {
                            self.advance();
                            value.push(other);
                        }
                    }
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                    value.push('\n');
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        Ok(value)
    }

    /// Scan a numeric literal: optional sign, digits, optional fraction,
    /// optional scientific-notation suffix. The source text is preserved
    /// verbatim; numeric interpretation is left to the caller.
    fn scan_number(&mut self) -> Result<TokenKind, LexError> {
        if let Some(c) = self.peek_char() {
            if c == '+' || c == '-' {
                // A sign with no following digit is not a number; nothing
                // downstream can claim a bare '+', so fail here.
                if !self
                    .peek_next_char()
                    .map(|d| d.is_ascii_digit())
                    .unwrap_or(false)
                {
                    return Err(LexError::UnexpectedChar {
                        ch: c,
                        line: self.line,
                        column: self.column,
                    });
                }
                self.advance();
            }
        }

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        // A decimal point is only part of the number when a digit follows.
        if self.peek_char() == Some('.')
            && self
                .peek_next_char()
                .map(|c| c.is_ascii_digit())
                .unwrap_or(false)
        {
            self.advance();
            while let Some(c) = self.peek_char() {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        if matches!(self.peek_char(), Some('e') | Some('E')) {
            self.advance();
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                self.advance();
            }
            if !self
                .peek_char()
                .map(|c| c.is_ascii_digit())
                .unwrap_or(false)
            {
                return Err(LexError::InvalidExponent {
                    line: self.line,
                    column: self.column,
                });
            }
            while let Some(c) = self.peek_char() {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        Ok(TokenKind::Number)
    }

    /// Skip whitespace and comments. A `#` starts a comment extending to the
    /// end of the line, exclusive of the newline.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                Some('#') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].char_indices();
        iter.next();
        iter.next().map(|(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((i, c)) = self.chars.next() {
            self.pos = i + c.len_utf8();
            self.column += 1;
            Some(c)
        } else {
            None
        }
    }
}
