//! Recursive-descent parser for Mython.
//!
//! Consumes the token cursor produced by the lexer and builds a single
//! [`Statement::Compound`] for the whole program. The parser keeps a symbol
//! table of the classes seen so far: that is what lets it classify `ID(...)`
//! as instance construction versus a plain call, and resolve the parent in
//! `class C(B):`. A class is registered in the table before its body is
//! parsed, so a method can construct instances of the class being defined;
//! the table slot is filled once the definition completes.
//!
//! Grammar (precedence ascends top-down, binary operators associate left):
//!
//! ``` BNF
//! program       -> statement* EOF ;
//! statement     -> simple_stmt NEWLINE | class_def | if_stmt ;
//! simple_stmt   -> assignment | print_stmt | return_stmt | expr_stmt ;
//! class_def     -> "class" ID ( "(" ID ")" )? ":" NEWLINE INDENT def+ DEDENT ;
//! def           -> "def" ID "(" params? ")" ":" suite ;
//! if_stmt       -> "if" expr ":" suite ( "else" ":" suite )? ;
//! suite         -> NEWLINE INDENT statement+ DEDENT | simple_stmt NEWLINE ;
//! params        -> ID ( "," ID )* ;
//! assignment    -> dotted_id "=" expr ;
//! print_stmt    -> "print" ( expr ( "," expr )* )? ;
//! return_stmt   -> "return" expr? ;
//! expr          -> or_expr ;
//! or_expr       -> and_expr ( "or" and_expr )* ;
//! and_expr      -> not_expr ( "and" not_expr )* ;
//! not_expr      -> "not" not_expr | cmp_expr ;
//! cmp_expr      -> add_expr ( CMP add_expr )? ;
//! add_expr      -> mul_expr ( ( "+" | "-" ) mul_expr )* ;
//! mul_expr      -> unary ( ( "*" | "/" ) unary )* ;
//! unary         -> "-" unary | primary ;
//! primary       -> NUMBER | STRING | "True" | "False" | "None"
//!                | dotted_id ( "(" args? ")" )? | "(" expr ")" ;
//! dotted_id     -> ID ( "." ID )* ;
//! ```
//!
//! Comparisons are binary only: `a < b < c` is rejected. `str(expr)` in
//! primary position is the stringify builtin. Postfix chains
//! `expr.m(args).n(args)` call methods on intermediate results.

use std::{cell::OnceCell, collections::HashMap, rc::Rc};

use crate::{
	ast::{CmpOp, Statement},
	error::parser::ParseError,
	lexer::{Lexer, Token},
	runtime::{Class, Method},
};

/// Builds the executable tree for a whole program.
pub struct Parser<'a> {
	lexer:   &'a mut Lexer,
	/// Classes seen so far, keyed by name. A slot is registered before the
	/// class body is parsed and filled when the definition completes.
	classes: HashMap<String, Rc<OnceCell<Rc<Class>>>>,
}

impl<'a> Parser<'a> {
	pub fn new(lexer: &'a mut Lexer) -> Self { Self { lexer, classes: HashMap::new() } }

	/// program := statement* EOF
	pub fn parse(mut self) -> Result<Statement, ParseError> {
		let mut statements = Vec::new();
		while !self.lexer.current().is_eof() {
			statements.push(self.statement()?);
		}
		Ok(Statement::Compound(statements))
	}

	fn statement(&mut self) -> Result<Statement, ParseError> {
		match self.lexer.current() {
			Token::Class => self.class_definition(),
			Token::If => self.if_statement(),
			Token::Def => Err(ParseError::DefOutsideClass),
			_ => {
				let statement = self.simple_statement()?;
				self.expect_newline()?;
				Ok(statement)
			}
		}
	}

	fn simple_statement(&mut self) -> Result<Statement, ParseError> {
		match self.lexer.current() {
			Token::Print => self.print_statement(),
			Token::Return => self.return_statement(),
			Token::Id(_) => {
				// An assignment target is a dotted id followed by '='; anything
				// else starting with an id is an expression statement.
				let mark = self.lexer.position();
				let mut ids = self.dotted_id()?;
				if matches!(self.lexer.current(), Token::Char('=')) {
					self.lexer.advance();
					let rv = self.expression()?;
					return Ok(if ids.len() == 1 {
						Statement::assignment(ids.remove(0), rv)
					} else {
						let field = ids.pop().ok_or_else(|| anyhow::anyhow!("empty assignment target"))?;
						Statement::field_assignment(Statement::Variable(ids), field, rv)
					});
				}
				self.lexer.rewind(mark);
				self.expression()
			}
			_ => self.expression(),
		}
	}

	fn print_statement(&mut self) -> Result<Statement, ParseError> {
		self.lexer.advance(); // consume 'print'
		let mut args = Vec::new();
		if !self.lexer.current().is_newline() {
			args.push(self.expression()?);
			while matches!(self.lexer.current(), Token::Char(',')) {
				self.lexer.advance();
				args.push(self.expression()?);
			}
		}
		Ok(Statement::Print(args))
	}

	fn return_statement(&mut self) -> Result<Statement, ParseError> {
		self.lexer.advance(); // consume 'return'
		if self.lexer.current().is_newline() {
			return Ok(Statement::Return(None));
		}
		Ok(Statement::Return(Some(self.expression()?.boxed())))
	}

	fn class_definition(&mut self) -> Result<Statement, ParseError> {
		self.lexer.advance(); // consume 'class'
		let name = self.lexer.expect_id().map_err(|_| ParseError::ExpectName("class"))?.to_string();
		self.lexer.advance();

		let parent = if matches!(self.lexer.current(), Token::Char('(')) {
			self.lexer.advance();
			let parent_name =
				self.lexer.expect_id().map_err(|_| ParseError::ExpectName("class"))?.to_string();
			self.lexer.advance();
			self.lexer.expect_char(')')?;
			self.lexer.advance();
			// The parent must be fully defined by now.
			let parent = self
				.classes
				.get(&parent_name)
				.and_then(|slot| slot.get().cloned())
				.ok_or(ParseError::UnknownBaseClass(parent_name))?;
			Some(parent)
		} else {
			None
		};

		self.lexer.expect_char(':').map_err(|_| ParseError::ExpectColon("the class header"))?;
		self.lexer.advance();

		// Register the slot before the body so methods can construct
		// instances of the class being defined.
		let slot = Rc::new(OnceCell::new());
		self.classes.insert(name.clone(), slot.clone());

		let methods = self.class_body()?;
		let class = Rc::new(Class::new(name, methods, parent.as_ref()));
		let _ = slot.set(class.clone());
		Ok(Statement::ClassDefinition(class))
	}

	/// A class body is an indented block of method definitions.
	fn class_body(&mut self) -> Result<Vec<Method>, ParseError> {
		self.lexer.expect(&Token::Newline)?;
		self.lexer.advance();
		if !matches!(self.lexer.current(), Token::Indent) {
			return Err(ParseError::ExpectIndent);
		}
		self.lexer.advance();

		let mut methods = Vec::new();
		while matches!(self.lexer.current(), Token::Def) {
			methods.push(self.method()?);
		}
		if !matches!(self.lexer.current(), Token::Dedent) {
			return Err(ParseError::UnexpectedToken(self.lexer.current().to_string()));
		}
		self.lexer.advance();
		Ok(methods)
	}

	fn method(&mut self) -> Result<Method, ParseError> {
		self.lexer.advance(); // consume 'def'
		let name = self.lexer.expect_id().map_err(|_| ParseError::ExpectName("def"))?.to_string();
		self.lexer.advance();

		self.lexer.expect_char('(')?;
		self.lexer.advance();
		let mut formal_params = Vec::new();
		if !matches!(self.lexer.current(), Token::Char(')')) {
			formal_params.push(self.lexer.expect_id()?.to_string());
			self.lexer.advance();
			while matches!(self.lexer.current(), Token::Char(',')) {
				self.lexer.advance();
				formal_params.push(self.lexer.expect_id()?.to_string());
				self.lexer.advance();
			}
		}
		if !matches!(self.lexer.current(), Token::Char(')')) {
			return Err(ParseError::ExpectRightParen);
		}
		self.lexer.advance();

		self.lexer.expect_char(':').map_err(|_| ParseError::ExpectColon("the parameter list"))?;
		self.lexer.advance();
		let body = self.suite()?;
		Ok(Method { name, formal_params, body: Statement::method_body(body) })
	}

	fn if_statement(&mut self) -> Result<Statement, ParseError> {
		self.lexer.advance(); // consume 'if'
		let condition = self.expression()?;
		self.lexer.expect_char(':').map_err(|_| ParseError::ExpectColon("'if' condition"))?;
		self.lexer.advance();
		let if_body = self.suite()?;

		let else_body = if matches!(self.lexer.current(), Token::Else) {
			self.lexer.advance();
			self.lexer.expect_char(':').map_err(|_| ParseError::ExpectColon("'else'"))?;
			self.lexer.advance();
			Some(self.suite()?.boxed())
		} else {
			None
		};

		Ok(Statement::IfElse { condition: condition.boxed(), if_body: if_body.boxed(), else_body })
	}

	/// An indented block, or a single simple statement on the same line.
	fn suite(&mut self) -> Result<Statement, ParseError> {
		if !self.lexer.current().is_newline() {
			let statement = self.simple_statement()?;
			self.expect_newline()?;
			return Ok(statement);
		}
		self.lexer.advance(); // consume Newline
		if !matches!(self.lexer.current(), Token::Indent) {
			return Err(ParseError::ExpectIndent);
		}
		self.lexer.advance();

		let mut statements = Vec::new();
		while !matches!(self.lexer.current(), Token::Dedent | Token::Eof) {
			statements.push(self.statement()?);
		}
		if matches!(self.lexer.current(), Token::Dedent) {
			self.lexer.advance();
		}
		Ok(Statement::Compound(statements))
	}

	fn expression(&mut self) -> Result<Statement, ParseError> { self.or_expression() }

	fn or_expression(&mut self) -> Result<Statement, ParseError> {
		let mut expression = self.and_expression()?;
		while matches!(self.lexer.current(), Token::Or) {
			self.lexer.advance();
			expression = Statement::Or { lhs: expression.boxed(), rhs: self.and_expression()?.boxed() };
		}
		Ok(expression)
	}

	fn and_expression(&mut self) -> Result<Statement, ParseError> {
		let mut expression = self.not_expression()?;
		while matches!(self.lexer.current(), Token::And) {
			self.lexer.advance();
			expression = Statement::And { lhs: expression.boxed(), rhs: self.not_expression()?.boxed() };
		}
		Ok(expression)
	}

	fn not_expression(&mut self) -> Result<Statement, ParseError> {
		if matches!(self.lexer.current(), Token::Not) {
			self.lexer.advance();
			return Ok(Statement::Not(self.not_expression()?.boxed()));
		}
		self.comparison()
	}

	/// Comparisons are binary: at most one operator, no chaining.
	fn comparison(&mut self) -> Result<Statement, ParseError> {
		let lhs = self.additive()?;
		let op = match self.lexer.current() {
			Token::Eq => CmpOp::Eq,
			Token::NotEq => CmpOp::NotEq,
			Token::LessOrEq => CmpOp::LessOrEq,
			Token::GreaterOrEq => CmpOp::GreaterOrEq,
			Token::Char('<') => CmpOp::Less,
			Token::Char('>') => CmpOp::Greater,
			_ => return Ok(lhs),
		};
		self.lexer.advance();
		let rhs = self.additive()?;
		Ok(Statement::Comparison { op, lhs: lhs.boxed(), rhs: rhs.boxed() })
	}

	fn additive(&mut self) -> Result<Statement, ParseError> {
		let mut expression = self.multiplicative()?;
		loop {
			match self.lexer.current() {
				Token::Char('+') => {
					self.lexer.advance();
					expression =
						Statement::Add { lhs: expression.boxed(), rhs: self.multiplicative()?.boxed() };
				}
				Token::Char('-') => {
					self.lexer.advance();
					expression =
						Statement::Sub { lhs: expression.boxed(), rhs: self.multiplicative()?.boxed() };
				}
				_ => return Ok(expression),
			}
		}
	}

	fn multiplicative(&mut self) -> Result<Statement, ParseError> {
		let mut expression = self.unary()?;
		loop {
			match self.lexer.current() {
				Token::Char('*') => {
					self.lexer.advance();
					expression = Statement::Mult { lhs: expression.boxed(), rhs: self.unary()?.boxed() };
				}
				Token::Char('/') => {
					self.lexer.advance();
					expression = Statement::Div { lhs: expression.boxed(), rhs: self.unary()?.boxed() };
				}
				_ => return Ok(expression),
			}
		}
	}

	fn unary(&mut self) -> Result<Statement, ParseError> {
		if matches!(self.lexer.current(), Token::Char('-')) {
			self.lexer.advance();
			// Unary minus is subtraction from zero.
			return Ok(Statement::Sub {
				lhs: Statement::NumericConst(0).boxed(),
				rhs: self.unary()?.boxed(),
			});
		}
		self.primary()
	}

	fn primary(&mut self) -> Result<Statement, ParseError> {
		let expression = match self.lexer.current().clone() {
			Token::Number(value) => {
				self.lexer.advance();
				Statement::NumericConst(value)
			}
			Token::String(value) => {
				self.lexer.advance();
				Statement::StringConst(value)
			}
			Token::True => {
				self.lexer.advance();
				Statement::BoolConst(true)
			}
			Token::False => {
				self.lexer.advance();
				Statement::BoolConst(false)
			}
			Token::None => {
				self.lexer.advance();
				Statement::NoneConst
			}
			Token::Char('(') => {
				self.lexer.advance();
				let inner = self.expression()?;
				if !matches!(self.lexer.current(), Token::Char(')')) {
					return Err(ParseError::ExpectRightParen);
				}
				self.lexer.advance();
				inner
			}
			Token::Id(_) => self.name_expression()?,
			other => return Err(ParseError::UnexpectedToken(other.to_string())),
		};
		self.postfix(expression)
	}

	/// A dotted id, possibly called: a variable read, the `str(...)`
	/// builtin, instance construction, or a method call.
	fn name_expression(&mut self) -> Result<Statement, ParseError> {
		let mut ids = self.dotted_id()?;
		if !matches!(self.lexer.current(), Token::Char('(')) {
			return Ok(Statement::Variable(ids));
		}
		let mut args = self.argument_list()?;

		if ids.len() == 1 {
			let name = ids.remove(0);
			if name == "str" {
				if args.len() != 1 {
					return Err(ParseError::StrArity);
				}
				let arg = args.pop().ok_or(ParseError::StrArity)?;
				return Ok(Statement::Stringify(arg.boxed()));
			}
			if let Some(slot) = self.classes.get(&name) {
				return Ok(Statement::NewInstance { class: slot.clone(), args });
			}
			return Err(ParseError::NotAClass(name));
		}

		// a.b.c(args): method c on the object read through a.b
		let method = ids.pop().ok_or_else(|| anyhow::anyhow!("empty method path"))?;
		Ok(Statement::MethodCall { object: Statement::Variable(ids).boxed(), method, args })
	}

	/// Postfix method chains on an already-parsed receiver.
	fn postfix(&mut self, mut expression: Statement) -> Result<Statement, ParseError> {
		while matches!(self.lexer.current(), Token::Char('.')) {
			self.lexer.advance();
			let method = self.lexer.expect_id().map_err(|_| ParseError::ExpectName("."))?.to_string();
			self.lexer.advance();
			if !matches!(self.lexer.current(), Token::Char('(')) {
				// Bare field access on a call result has no node to carry it;
				// only method calls chain.
				return Err(ParseError::UnexpectedToken(self.lexer.current().to_string()));
			}
			let args = self.argument_list()?;
			expression = Statement::MethodCall { object: expression.boxed(), method, args };
		}
		Ok(expression)
	}

	fn argument_list(&mut self) -> Result<Vec<Statement>, ParseError> {
		self.lexer.expect_char('(')?;
		self.lexer.advance();
		let mut args = Vec::new();
		if !matches!(self.lexer.current(), Token::Char(')')) {
			args.push(self.expression()?);
			while matches!(self.lexer.current(), Token::Char(',')) {
				self.lexer.advance();
				args.push(self.expression()?);
			}
		}
		if !matches!(self.lexer.current(), Token::Char(')')) {
			return Err(ParseError::ExpectRightParen);
		}
		self.lexer.advance();
		Ok(args)
	}

	fn dotted_id(&mut self) -> Result<Vec<String>, ParseError> {
		let mut ids = vec![self.lexer.expect_id()?.to_string()];
		self.lexer.advance();
		while matches!(self.lexer.current(), Token::Char('.')) {
			self.lexer.advance();
			ids.push(self.lexer.expect_id()?.to_string());
			self.lexer.advance();
		}
		Ok(ids)
	}

	fn expect_newline(&mut self) -> Result<(), ParseError> {
		if !self.lexer.current().is_newline() {
			return Err(ParseError::ExpectNewline(self.lexer.current().to_string()));
		}
		self.lexer.advance();
		Ok(())
	}
}
