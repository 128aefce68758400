use std::{fs, io::Write, path::Path};

use anyhow::Context as _;

use crate::{
	lexer::Lexer,
	parser::Parser,
	runtime::{Closure, SimpleContext},
};

/// The embedding facade.
///
/// Feed it source text and an output sink and it runs the program end to
/// end: tokenize, build the executable tree, execute it against a fresh
/// global scope. Output written before a runtime failure stays in the sink;
/// the interpreter never buffers.
pub struct Mython;

impl Mython {
	/// Runs the program in the file at `path`, printing to stdout.
	pub fn run_file(&self, path: &Path) -> crate::Result<()> {
		let source = fs::read_to_string(path).context("Failed to open source file")?;
		let stdout = std::io::stdout();
		let mut lock = stdout.lock();
		self.run(&source, &mut lock)
	}

	/// Lexes, parses and executes `source`, writing program output to
	/// `output`.
	pub fn run(&self, source: &str, output: &mut dyn Write) -> crate::Result<()> {
		let mut lexer = Lexer::new(source)?;
		let program = Parser::new(&mut lexer).parse()?;
		let mut context = SimpleContext::new(output);
		let mut closure = Closure::new();
		program.execute(&mut closure, &mut context)?;
		Ok(())
	}
}
