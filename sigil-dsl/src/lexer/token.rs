//! Lexer token types

use serde::{Deserialize, Serialize};

/// Token kinds for the Sigil DSL.
///
/// The kind is a plain tag; the matched text lives on [`Token::text`] so that
/// every token can reproduce its source form (numbers keep their sign and
/// exponent verbatim, strings carry their decoded value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    Identifier,
    String,
    Number,
    Boolean,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Dash,

    // Comparison operators (usable inside contract conditions)
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,

    // Sigil operator glyphs
    TypeAnnotation,    // ∷
    FunctionArrow,     // →
    Application,       // ▸
    SectionDelimiter,  // §
    BranchSymbol,      // ⎇
    Entailment,        // ⊨
    AgentBracketOpen,  // ⟦
    AgentBracketClose, // ⟧

    // Declaration keywords
    Kind,
    Datum,
    Contract,
    Plan,
    Branch,
    Agent,
    Cue,
    Maplet,
    Apply,
    Default,
    Test,
    Memory,
    Confidence,
    Validation,

    // Metadata keywords
    Requires,
    Ensures,
    Steps,
    When,
    Else,
    Suggests,

    // Special
    Eof,
}

impl TokenKind {
    /// True for the fourteen keywords that can open a declaration form.
    pub fn is_declaration_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Kind
                | TokenKind::Datum
                | TokenKind::Contract
                | TokenKind::Plan
                | TokenKind::Branch
                | TokenKind::Agent
                | TokenKind::Cue
                | TokenKind::Maplet
                | TokenKind::Apply
                | TokenKind::Default
                | TokenKind::Test
                | TokenKind::Memory
                | TokenKind::Confidence
                | TokenKind::Validation
        )
    }
}

/// Source location span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }
}

/// A token with its kind, matched text, and source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}
