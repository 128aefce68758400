//! # Mython
//!
//! A tree-walking interpreter for Mython, a small dynamically-typed,
//! indentation-structured language patterned on a strict subset of Python.
//! A program is read from a byte stream, translated into an executable tree
//! and evaluated against an output sink supplied by the caller.

//! ## Lexing
//!
//! The [`lexer`] turns source text into a finite token sequence ending in
//! `Eof`. Mython has no braces: block structure lives in whitespace, so the
//! lexer synthesizes `Indent`/`Dedent` tokens from the leading spaces of
//! each line (two spaces per level) and collapses blank lines. String
//! escapes are resolved here too.

//! ## Parsing
//!
//! The [`parser`] is a hand-written recursive-descent builder. It consumes
//! the token cursor and produces a tree of executable nodes: infix
//! arithmetic with the usual precedence, short-circuiting logic, method
//! chains, class definitions. Class method tables are composed at parse
//! time, parent first, so that method lookup at run time is a single map
//! hit.

//! ## Runtime
//!
//! There is no separate evaluator: every node in the [`ast`] implements
//! `execute(scope, context)` and the tree is the interpreter. The
//! [`runtime`] holds the value model — objects behind shared handles, where
//! cloning a handle aliases the object. That aliasing is the language
//! semantics: after `y = x`, mutations through `x` are visible through `y`.
//! Classes dispatch methods through a per-class vtable, and the dunder
//! methods `__init__`, `__str__`, `__eq__`, `__lt__` and `__add__` hook
//! construction, printing, comparison and addition.
//!
//! The whole pipeline is driven by [`Mython`]:
//!
//! ```
//! let mut output = Vec::new();
//! mython::Mython.run("print 'hello'", &mut output).unwrap();
//! assert_eq!(output, b"hello\n");
//! ```

pub mod ast;
pub mod cli;
pub mod error;
pub mod lexer;
mod mython;
pub mod parser;
pub mod runtime;

pub use error::MythonError;
pub use mython::Mython;

/// Crate-wide result type.
pub type Result<T, E = MythonError> = std::result::Result<T, E>;
