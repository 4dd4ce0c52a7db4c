//! Lexer module for the Sigil DSL

pub mod token;
pub mod scanner;

pub use token::*;
pub use scanner::*;
