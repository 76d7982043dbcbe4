//! tagtree: lexer and stack-driven parser for `{$ ... $}` document templates.
//!
//! This crate exists to do one job well: turn a text mixing literal content
//! with embedded `{$ ... $}` tags into an immutable tree of typed nodes, and
//! render such a tree back to canonical text so that reparsing the rendering
//! yields a structurally equal tree.
//!
//! Supported language:
//! - Literal text, with `\\` and `\{` as the only escapes.
//! - `{$= ... $}` echo tags holding variables, functions (`@name`), quoted
//!   strings, operators (`+ - * / ^`) and numeric constants.
//! - `{$ FOR var start end [step] $}` ... `{$ END $}` loops, nested to any
//!   depth; bounds are variables, strings or numbers.
//!
//! Not supported (by design):
//! - Evaluating a tree against runtime data; the tree's consumption boundary
//!   is the [`NodeVisitor`] trait.
//! - File or network I/O; one call to [`parse`] consumes one in-memory text.
//! - Error recovery: the first lexical or structural problem aborts the
//!   parse, and no partial tree escapes.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod render;

mod error;

pub use ast::{DocumentNode, EchoNode, Element, ForLoopNode, Node, TextNode};
pub use error::ParseError;
pub use parser::Parser;
pub use render::{render, NodeVisitor, Renderer};

/// Parse one document text into its tree.
pub fn parse(text: &str) -> Result<DocumentNode, ParseError> {
    Parser::new(text).parse()
}
