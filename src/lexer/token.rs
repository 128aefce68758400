use std::fmt;

/// A single lexeme of a Mython program.
///
/// Payload-carrying variants compare by kind and payload; position is not
/// part of a token, so two `Number{42}` tokens are equal wherever they were
/// read. `Indent`, `Dedent` and `Newline` are synthetic: they are
/// manufactured by the lexer from whitespace rather than read from the
/// source verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
	/// Integer literal, e.g. `123`.
	Number(i64),
	/// Identifier, e.g. a variable, field or method name.
	Id(String),
	/// String literal with escapes already resolved.
	String(String),
	/// Any single punctuation character that is not a compound operator.
	Char(char),
	/// `class` keyword.
	Class,
	/// `return` keyword.
	Return,
	/// `if` keyword.
	If,
	/// `else` keyword.
	Else,
	/// `def` keyword.
	Def,
	/// `print` keyword.
	Print,
	/// `and` keyword.
	And,
	/// `or` keyword.
	Or,
	/// `not` keyword.
	Not,
	/// `None` literal.
	None,
	/// `True` literal.
	True,
	/// `False` literal.
	False,
	/// End of a logical line.
	Newline,
	/// Indentation increased by one level (two spaces).
	Indent,
	/// Indentation decreased by one level.
	Dedent,
	/// End of input.
	Eof,
	/// `==`
	Eq,
	/// `!=`
	NotEq,
	/// `<=`
	LessOrEq,
	/// `>=`
	GreaterOrEq,
}

impl Token {
	/// Maps a scanned word to its keyword token, or wraps it as an `Id`.
	pub fn keyword_or_id(word: &str) -> Self {
		match word {
			"class" => Token::Class,
			"return" => Token::Return,
			"if" => Token::If,
			"else" => Token::Else,
			"def" => Token::Def,
			"print" => Token::Print,
			"and" => Token::And,
			"or" => Token::Or,
			"not" => Token::Not,
			"None" => Token::None,
			"True" => Token::True,
			"False" => Token::False,
			_ => Token::Id(word.to_string()),
		}
	}

	pub fn is_eof(&self) -> bool { matches!(self, Token::Eof) }

	pub fn is_newline(&self) -> bool { matches!(self, Token::Newline) }
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Token::Number(value) => write!(f, "Number{{{value}}}"),
			Token::Id(value) => write!(f, "Id{{{value}}}"),
			Token::String(value) => write!(f, "String{{{value}}}"),
			Token::Char(value) => write!(f, "Char{{{value}}}"),
			Token::Class => write!(f, "Class"),
			Token::Return => write!(f, "Return"),
			Token::If => write!(f, "If"),
			Token::Else => write!(f, "Else"),
			Token::Def => write!(f, "Def"),
			Token::Print => write!(f, "Print"),
			Token::And => write!(f, "And"),
			Token::Or => write!(f, "Or"),
			Token::Not => write!(f, "Not"),
			Token::None => write!(f, "None"),
			Token::True => write!(f, "True"),
			Token::False => write!(f, "False"),
			Token::Newline => write!(f, "Newline"),
			Token::Indent => write!(f, "Indent"),
			Token::Dedent => write!(f, "Dedent"),
			Token::Eof => write!(f, "Eof"),
			Token::Eq => write!(f, "Eq"),
			Token::NotEq => write!(f, "NotEq"),
			Token::LessOrEq => write!(f, "LessOrEq"),
			Token::GreaterOrEq => write!(f, "GreaterOrEq"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keyword_recognition() {
		assert_eq!(Token::keyword_or_id("class"), Token::Class);
		assert_eq!(Token::keyword_or_id("return"), Token::Return);
		assert_eq!(Token::keyword_or_id("None"), Token::None);
		assert_eq!(Token::keyword_or_id("True"), Token::True);
		assert_eq!(Token::keyword_or_id("false"), Token::Id("false".to_string()));
		assert_eq!(Token::keyword_or_id("classes"), Token::Id("classes".to_string()));
		assert_eq!(Token::keyword_or_id("_x1"), Token::Id("_x1".to_string()));
	}

	#[test]
	fn equality_ignores_nothing_but_payload() {
		assert_eq!(Token::Number(42), Token::Number(42));
		assert_ne!(Token::Number(42), Token::Number(43));
		assert_ne!(Token::Number(42), Token::Id("42".to_string()));
		assert_eq!(Token::Char(':'), Token::Char(':'));
		assert_ne!(Token::Char(':'), Token::Char(';'));
		assert_eq!(Token::Eof, Token::Eof);
	}

	#[test]
	fn rendering() {
		assert_eq!(Token::Number(42).to_string(), "Number{42}");
		assert_eq!(Token::Id("foo".to_string()).to_string(), "Id{foo}");
		assert_eq!(Token::String("hi".to_string()).to_string(), "String{hi}");
		assert_eq!(Token::Char('+').to_string(), "Char{+}");
		assert_eq!(Token::Indent.to_string(), "Indent");
		assert_eq!(Token::LessOrEq.to_string(), "LessOrEq");
	}
}
