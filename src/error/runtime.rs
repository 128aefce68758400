use crate::runtime::ObjectHolder;

/// Errors that can occur while a program is executing.
///
/// `Return` is not an error in the usual sense: it is the non-local return
/// signal raised by a `return` statement and caught by the nearest method
/// body. It only surfaces to the caller when `return` is used outside a
/// method, where its `Display` text applies.
#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
	/// Internal interpreter error, should never happen
	#[error("InternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// Failure writing to the program's output sink.
	#[error("Output error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Name '{0}' is not defined")]
	UndefinedVariable(String),
	/// A field access or method call on a value that is not an instance.
	#[error("'{0}' is not a class instance")]
	NotAnInstance(String),
	#[error("Call for a not defined method: {class}.{method}/{arity}")]
	MethodNotFound { class: String, method: String, arity: usize },
	#[error("Division by zero")]
	DivisionByZero,
	#[error("Cannot compare objects for equality")]
	CannotCompareEquality,
	#[error("Cannot compare objects for less")]
	CannotCompareLess,
	/// Operand types an arithmetic node does not support.
	#[error("Incompatible types for '{0}'")]
	IncompatibleTypes(&'static str),
	/// A comparison dunder returned something other than Bool.
	#[error("'{0}' must return Bool")]
	DunderNotBool(&'static str),
	#[error("'return' outside of a method body")]
	Return(ObjectHolder),
}
