use crate::lexer::LexError;
use thiserror::Error;

/// The single error type surfaced by [`crate::parse`]. Lexical failures are
/// wrapped at the point of discovery and abort the whole parse; there is no
/// partial-success mode.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexError),
    #[error("{0}")]
    Structural(String),
}

impl ParseError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        ParseError::Structural(message.into())
    }
}
