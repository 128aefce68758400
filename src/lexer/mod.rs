//! Indentation-aware tokenizer for Mython source text.
//!
//! The scanner turns the whole input into a finite token sequence up front;
//! the `Lexer` then exposes a cursor over that sequence for the parser.
//! Block structure is not delimited by braces: the scanner counts leading
//! spaces after every newline (two spaces per level) and synthesizes
//! `Indent`/`Dedent` tokens when the depth changes. Blank lines never touch
//! the depth, consecutive newlines collapse into one `Newline` token, and
//! end-of-input drains the remaining depth with `Dedent`s before the final
//! `Eof`.

mod token;

use std::{iter::Peekable, str::Chars};

use Token::*;
pub use token::Token;

use crate::error::lexer::{LexerError, LexerErrorType};

/// Spaces per indentation level.
const SPACES_PER_INDENT: usize = 2;

/// A tokenized Mython program with a cursor over its tokens.
pub struct Lexer {
	/// Scanned tokens, always terminated by a single `Eof`.
	tokens: Vec<Token>,
	/// Index of the current token.
	cursor: usize,
}

impl Lexer {
	/// Tokenizes `source` eagerly. Any lexical error is fatal to the whole
	/// program.
	pub fn new(source: &str) -> Result<Self, LexerError> {
		let tokens = Scanner::new(source).scan()?;
		Ok(Self { tokens, cursor: 0 })
	}

	/// The token under the cursor.
	pub fn current(&self) -> &Token { &self.tokens[self.cursor] }

	/// Advances the cursor and returns the new current token. Saturates at
	/// `Eof`: the cursor never moves past the last token.
	pub fn advance(&mut self) -> &Token {
		if self.cursor + 1 < self.tokens.len() {
			self.cursor += 1;
		}
		&self.tokens[self.cursor]
	}

	/// Checks that the current token equals `expected` (kind and payload).
	pub fn expect(&self, expected: &Token) -> Result<(), LexerError> {
		if self.current() == expected {
			Ok(())
		} else {
			Err(LexerError::expect(expected.to_string(), self.current()))
		}
	}

	/// Checks that the current token is an `Id` and returns its text.
	pub fn expect_id(&self) -> Result<&str, LexerError> {
		match self.current() {
			Id(name) => Ok(name),
			other => Err(LexerError::expect("an identifier".to_string(), other)),
		}
	}

	/// Checks that the current token is `Char(expected)`.
	pub fn expect_char(&self, expected: char) -> Result<(), LexerError> {
		self.expect(&Char(expected))
	}

	/// Advances, then checks the new current token against `expected`.
	pub fn expect_next(&mut self, expected: &Token) -> Result<(), LexerError> {
		self.advance();
		self.expect(expected)
	}

	pub(crate) fn position(&self) -> usize { self.cursor }

	pub(crate) fn rewind(&mut self, position: usize) { self.cursor = position.min(self.tokens.len() - 1); }

	#[cfg(test)]
	fn tokens(&self) -> &[Token] { &self.tokens }
}

/// One-shot scanner state behind `Lexer::new`.
struct Scanner<'a> {
	/// Remaining source characters.
	source: Peekable<Chars<'a>>,
	/// 1-based line of the character being considered.
	line:   usize,
	/// Current indentation depth in levels.
	depth:  usize,
	tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
	fn new(source: &'a str) -> Self {
		Self { source: source.chars().peekable(), line: 1, depth: 0, tokens: Vec::new() }
	}

	fn scan(mut self) -> Result<Vec<Token>, LexerError> {
		while let Some(&c) = self.source.peek() {
			match c {
				'\'' | '"' => self.scan_string()?,
				'#' => self.scan_comment(),
				'\n' => self.scan_newline()?,
				// Single spaces between tokens; leading spaces of the first
				// line land here too and are discarded.
				' ' => {
					self.source.next();
				}
				c if c.is_ascii_alphabetic() || c == '_' => self.scan_word(),
				c if c.is_ascii_digit() => self.scan_number()?,
				c if c.is_ascii_punctuation() => self.scan_operator(),
				c => return Err(self.error(LexerErrorType::UnexpectedCharacter(c))),
			}
		}

		// A nonempty program always ends in Newline Dedent* Eof.
		if !matches!(self.tokens.last(), Option::None | Some(Newline)) {
			self.tokens.push(Newline);
		}
		while self.depth > 0 {
			self.tokens.push(Dedent);
			self.depth -= 1;
		}
		self.tokens.push(Eof);
		Ok(self.tokens)
	}

	fn error(&self, r#type: LexerErrorType) -> LexerError { LexerError::scan(self.line, r#type) }

	/// Scans a quoted string literal, resolving escapes.
	fn scan_string(&mut self) -> Result<(), LexerError> {
		let open = self.source.next().unwrap_or_default();
		let mut value = std::string::String::new();
		loop {
			let Some(c) = self.source.next() else {
				return Err(self.error(LexerErrorType::UnterminatedString));
			};
			match c {
				c if c == open => break,
				'\n' | '\r' => return Err(self.error(LexerErrorType::NewlineInString)),
				'\\' => {
					let Some(escaped) = self.source.next() else {
						return Err(self.error(LexerErrorType::UnterminatedEscape));
					};
					value.push(match escaped {
						'n' => '\n',
						't' => '\t',
						'r' => '\r',
						'\'' => '\'',
						'"' => '"',
						'\\' => '\\',
						other => return Err(self.error(LexerErrorType::UnknownEscape(other))),
					});
				}
				c => value.push(c),
			}
		}
		self.tokens.push(String(value));
		Ok(())
	}

	/// Scans an identifier or keyword.
	fn scan_word(&mut self) {
		let mut word = std::string::String::new();
		while let Some(&c) = self.source.peek() {
			if c.is_ascii_alphanumeric() || c == '_' {
				word.push(c);
				self.source.next();
			} else {
				break;
			}
		}
		self.tokens.push(Token::keyword_or_id(&word));
	}

	/// Scans a decimal integer literal.
	fn scan_number(&mut self) -> Result<(), LexerError> {
		let mut digits = std::string::String::new();
		while let Some(&c) = self.source.peek() {
			if c.is_ascii_digit() {
				digits.push(c);
				self.source.next();
			} else {
				break;
			}
		}
		let value =
			digits.parse().map_err(|_| self.error(LexerErrorType::InvalidNumber(digits.clone())))?;
		self.tokens.push(Number(value));
		Ok(())
	}

	/// Scans punctuation: two-character operators first, then single chars.
	fn scan_operator(&mut self) {
		let c = self.source.next().unwrap_or_default();
		let compound = match (c, self.source.peek()) {
			('=', Some('=')) => Some(Eq),
			('!', Some('=')) => Some(NotEq),
			('<', Some('=')) => Some(LessOrEq),
			('>', Some('=')) => Some(GreaterOrEq),
			_ => Option::None,
		};
		if let Some(token) = compound {
			self.source.next();
			self.tokens.push(token);
		} else {
			self.tokens.push(Char(c));
		}
	}

	/// Discards a `#` comment up to (not including) the end of the line.
	fn scan_comment(&mut self) {
		while self.source.peek().is_some_and(|&c| c != '\n') {
			self.source.next();
		}
	}

	/// Consumes a newline, then measures the next line's indentation.
	fn scan_newline(&mut self) -> Result<(), LexerError> {
		self.source.next();
		self.line += 1;

		// Consecutive newlines collapse; a leading newline emits nothing.
		if !matches!(self.tokens.last(), Option::None | Some(Newline)) {
			self.tokens.push(Newline);
		}

		let mut spaces = 0;
		while self.source.peek() == Some(&' ') {
			self.source.next();
			spaces += 1;
		}

		match self.source.peek() {
			// Blank line or end of input: the depth stays untouched.
			Option::None | Some('\n') => return Ok(()),
			_ => {}
		}

		let new_depth = spaces / SPACES_PER_INDENT;
		if new_depth > self.depth {
			for _ in 0..new_depth - self.depth {
				self.tokens.push(Indent);
			}
		} else {
			let dedents =
				self.depth.checked_sub(new_depth).ok_or_else(|| self.error(LexerErrorType::NegativeIndent))?;
			for _ in 0..dedents {
				self.tokens.push(Dedent);
			}
		}
		self.depth = new_depth;
		Ok(())
	}
}
