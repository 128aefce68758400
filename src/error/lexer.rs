/// Errors that can occur while tokenizing a program.
#[derive(thiserror::Error, Debug)]
pub enum LexerError {
	/// Malformed source text, reported with its 1-based line.
	#[error("line {line}: {type}")]
	Scan { line: usize, r#type: LexerErrorType },
	/// A token cursor expectation failed.
	#[error("expected {expected}, found {found}")]
	Expect { expected: String, found: String },
}

impl LexerError {
	pub fn scan(line: usize, r#type: LexerErrorType) -> Self { Self::Scan { line, r#type } }

	pub fn expect(expected: impl ToString, found: impl ToString) -> Self {
		Self::Expect { expected: expected.to_string(), found: found.to_string() }
	}
}

/// Types of lexical errors.
#[derive(Debug)]
pub enum LexerErrorType {
	/// A character no lexing rule recognizes (tabs included).
	UnexpectedCharacter(char),
	/// A string literal without its closing quote.
	UnterminatedString,
	/// A raw newline or carriage return inside a string literal.
	NewlineInString,
	/// A `\X` escape outside the supported set.
	UnknownEscape(char),
	/// Input ended right after a backslash inside a string.
	UnterminatedEscape,
	/// A digit run that does not fit a signed 64-bit integer.
	InvalidNumber(String),
	/// The indentation counter would go below zero.
	NegativeIndent,
}

impl std::fmt::Display for LexerErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use LexerErrorType::*;
		match self {
			UnexpectedCharacter(c) => write!(f, "Unexpected character '{c}'"),
			UnterminatedString => write!(f, "Unterminated string"),
			NewlineInString => write!(f, "Newline inside a string literal"),
			UnknownEscape(c) => write!(f, "Unknown escape sequence '\\{c}'"),
			UnterminatedEscape => write!(f, "Input ended after '\\' inside a string"),
			InvalidNumber(s) => write!(f, "Number literal '{s}' out of range"),
			NegativeIndent => write!(f, "Indentation counter went negative"),
		}
	}
}
