//! Parser module for the Sigil DSL

pub mod ast;
pub mod parser;

pub use ast::*;
pub use parser::*;
