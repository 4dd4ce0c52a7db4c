//! Abstract syntax tree types

use crate::lexer::{Span, Token, TokenKind};
use serde::{Deserialize, Serialize};

/// A top-level declaration in the DSL.
///
/// Four kinds receive full structural parsing; the rest get a tolerant parse
/// that keeps the name and skips the balance of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Declaration {
    Kind(KindDecl),
    Datum(DatumDecl),
    Contract(ContractDecl),
    Plan(PlanDecl),
    Branch(SimpleDecl),
    Agent(SimpleDecl),
    Cue(SimpleDecl),
    Maplet(SimpleDecl),
    Apply(SimpleDecl),
    Default(SimpleDecl),
    Test(SimpleDecl),
    Memory(SimpleDecl),
    Confidence(SimpleDecl),
    Validation(SimpleDecl),
}

impl Declaration {
    /// The declared name, whichever variant this is.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Kind(d) => &d.name,
            Declaration::Datum(d) => &d.name,
            Declaration::Contract(d) => &d.name,
            Declaration::Plan(d) => &d.name,
            Declaration::Branch(d)
            | Declaration::Agent(d)
            | Declaration::Cue(d)
            | Declaration::Maplet(d)
            | Declaration::Apply(d)
            | Declaration::Default(d)
            | Declaration::Test(d)
            | Declaration::Memory(d)
            | Declaration::Confidence(d)
            | Declaration::Validation(d) => &d.name,
        }
    }

    /// The 1-based source line of the declaration's name token.
    pub fn source_line(&self) -> usize {
        match self {
            Declaration::Kind(d) => d.line,
            Declaration::Datum(d) => d.line,
            Declaration::Contract(d) => d.line,
            Declaration::Plan(d) => d.line,
            Declaration::Branch(d)
            | Declaration::Agent(d)
            | Declaration::Cue(d)
            | Declaration::Maplet(d)
            | Declaration::Apply(d)
            | Declaration::Default(d)
            | Declaration::Test(d)
            | Declaration::Memory(d)
            | Declaration::Confidence(d)
            | Declaration::Validation(d) => d.line,
        }
    }
}

/// Record type declaration: `(kind Name field ∷ Type ...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindDecl {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub line: usize,
}

/// A field in a kind declaration. The annotated type is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: Option<String>,
}

/// Data constant declaration: `(datum Name ⟦value⟧)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatumDecl {
    pub name: String,
    pub value: Option<String>,
    pub line: usize,
}

/// Contract declaration with requires/ensures clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDecl {
    pub name: String,
    pub requires: Vec<String>,
    pub ensures: Vec<String>,
    pub line: usize,
}

/// Plan declaration with an ordered step list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDecl {
    pub name: String,
    pub steps: Vec<String>,
    pub line: usize,
}

/// Payload for the tolerantly parsed declaration kinds: name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleDecl {
    pub name: String,
    pub line: usize,
}

/// Parse error with line/column information and, where available, the
/// offending token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub token: Option<Token>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// What a parse produces: best-effort declarations plus any non-fatal errors
/// accumulated along the way. An empty input yields an empty outcome.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub declarations: Vec<Declaration>,
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    /// True when no errors were recorded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parser for the Sigil DSL.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) errors: Vec<ParseError>,
}

impl Parser {
    /// Create a new parser from a vector of tokens. A missing trailing `Eof`
    /// sentinel is appended so the parser can always look at a current token.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let span = tokens
                .last()
                .map(|t| Span {
                    start: t.span.end,
                    end: t.span.end,
                    line: t.span.line,
                    column: t.span.column,
                })
                .unwrap_or_default();
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span,
            });
        }

        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }
}
