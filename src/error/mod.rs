pub mod lexer;
pub mod parser;
pub mod runtime;

use crate::error::{lexer::LexerError, parser::ParseError, runtime::RuntimeError};

/// MythonError is the top-level error type for the interpreter.
#[derive(thiserror::Error, Debug)]
pub enum MythonError {
	/// Internal interpreter error, should never happen
	#[error("InternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	#[error(transparent)]
	Lexer(#[from] LexerError),
	#[error(transparent)]
	Parse(#[from] ParseError),
	#[error(transparent)]
	Runtime(#[from] RuntimeError),
}
