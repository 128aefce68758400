use crate::error::lexer::LexerError;

/// Errors that can occur while building the executable tree.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
	/// Internal parser error, should never happen
	#[error("InternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// A cursor expectation raised by the lexer.
	#[error(transparent)]
	Lexer(#[from] LexerError),
	/// Error for tokens no grammar rule accepts.
	#[error("Unexpected token: {0}")]
	UnexpectedToken(String),
	/// Error for a missing ':' after a compound-statement header.
	#[error("Expected ':' after {0}")]
	ExpectColon(&'static str),
	/// Error for a missing indented block.
	#[error("Expected an indented block")]
	ExpectIndent,
	/// Error for a missing name in a declaration.
	#[error("Expected a name after '{0}'")]
	ExpectName(&'static str),
	/// Error for an unknown parent class in a class definition.
	#[error("Unknown base class '{0}'")]
	UnknownBaseClass(String),
	/// Error for a call of a name that is not a class.
	#[error("'{0}' is not a class")]
	NotAClass(String),
	/// Error for a 'def' outside a class body.
	#[error("'def' is only allowed inside a class body")]
	DefOutsideClass,
	/// Error for a wrong number of arguments to the str() builtin.
	#[error("str() takes exactly one argument")]
	StrArity,
	/// Error for a missing ')' after arguments or parameters.
	#[error("Expected ')' to close the list")]
	ExpectRightParen,
	/// Error for trailing tokens where a line should end.
	#[error("Expected end of line, found {0}")]
	ExpectNewline(String),
}
