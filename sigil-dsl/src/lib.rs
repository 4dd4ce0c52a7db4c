//! Sigil DSL: lexer and parser for the Sigil declaration language
//!
//! Sigil is a small declarative language for typed declarations: kinds,
//! data constants, contracts, plans, and a set of agent-oriented forms. It
//! mixes ASCII punctuation with a handful of reserved operator glyphs
//! (`∷ → ▸ § ⎇ ⊨ ⟦ ⟧`).
//!
//! Architecture:
//! ```text
//! Source text (.md documents or raw DSL)
//!     ↓
//! Block extraction (prose → declaration blocks)
//!     ↓
//! Lexer (text → tokens, fatal on bad input)
//!     ↓
//! Parser (tokens → declarations + non-fatal errors)
//!     ↓
//! ParseOutcome (consumed by the corpus/document harness)
//! ```

pub mod corpus;
pub mod extract;
pub mod lexer;
pub mod parser;

// Re-export key types for convenience
pub use extract::{extract_blocks, Block};
pub use lexer::*;
pub use parser::*;
