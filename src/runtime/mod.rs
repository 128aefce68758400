//! The Mython value model.
//!
//! Every runtime value is an [`Object`] behind an [`ObjectHolder`]. A holder
//! is either empty (the one and only representation of `None`) or a shared
//! handle to a heap-allocated object; cloning a holder aliases the object,
//! which is what makes `y = x` and instance mutation observable through both
//! names. Scopes ([`Closure`]) and instance field tables map names to
//! holders.
//!
//! Comparison and printing dispatch on the dynamic variant, falling back to
//! the user-overridable dunder methods (`__eq__`, `__lt__`, `__str__`) when
//! the left operand is a class instance.

mod class;
mod context;
mod instance;

use std::{cell::{Ref, RefCell}, collections::HashMap, io::Write, rc::Rc};

pub use class::{Class, Method};
pub use context::{Context, DummyContext, SimpleContext};
pub use instance::ClassInstance;

use crate::error::runtime::RuntimeError;

pub(crate) const INIT_METHOD: &str = "__init__";
pub(crate) const STR_METHOD: &str = "__str__";
pub(crate) const EQ_METHOD: &str = "__eq__";
pub(crate) const LT_METHOD: &str = "__lt__";
pub(crate) const ADD_METHOD: &str = "__add__";

/// A name-to-value binding table: the global scope, a method's local scope,
/// or an instance's field table. Last write wins.
pub type Closure = HashMap<String, ObjectHolder>;

/// A dynamic Mython value.
#[derive(Debug)]
pub enum Object {
	Number(i64),
	String(String),
	Bool(bool),
	Class(Rc<Class>),
	Instance(ClassInstance),
}

impl Object {
	pub fn type_name(&self) -> &'static str {
		match self {
			Object::Number(_) => "Number",
			Object::String(_) => "String",
			Object::Bool(_) => "Bool",
			Object::Class(_) => "Class",
			Object::Instance(_) => "ClassInstance",
		}
	}
}

/// A handle to a runtime value; empty means `None`.
///
/// `Clone` is the aliasing operation: all clones observe the same object and
/// keep it alive. This one handle covers both of the classic holder roles:
/// freshly produced values are `own`ed, and binding `self` for a method call
/// is just another clone of the receiver's holder.
#[derive(Debug, Clone, Default)]
pub struct ObjectHolder {
	data: Option<Rc<RefCell<Object>>>,
}

impl ObjectHolder {
	/// Wraps a freshly produced object.
	pub fn own(object: Object) -> Self { Self { data: Some(Rc::new(RefCell::new(object))) } }

	/// The empty holder, i.e. `None`.
	pub fn none() -> Self { Self::default() }

	pub fn is_empty(&self) -> bool { self.data.is_none() }

	/// Borrows the held object, if any.
	pub fn object(&self) -> Option<Ref<'_, Object>> { self.data.as_ref().map(|data| data.borrow()) }

	/// The held number, iff the dynamic variant is `Number`.
	pub fn as_number(&self) -> Option<i64> {
		self.object().and_then(|object| match &*object {
			Object::Number(value) => Some(*value),
			_ => None,
		})
	}

	/// The held string, iff the dynamic variant is `String`.
	pub fn as_string(&self) -> Option<String> {
		self.object().and_then(|object| match &*object {
			Object::String(value) => Some(value.clone()),
			_ => None,
		})
	}

	/// The held bool, iff the dynamic variant is `Bool`.
	pub fn as_bool(&self) -> Option<bool> {
		self.object().and_then(|object| match &*object {
			Object::Bool(value) => Some(*value),
			_ => None,
		})
	}

	/// The held class, iff the dynamic variant is `Class`.
	pub fn as_class(&self) -> Option<Rc<Class>> {
		self.object().and_then(|object| match &*object {
			Object::Class(class) => Some(class.clone()),
			_ => None,
		})
	}

	pub fn is_instance(&self) -> bool {
		self.object().is_some_and(|object| matches!(&*object, Object::Instance(_)))
	}

	/// Reads field `name` of the held instance.
	pub fn field(&self, name: &str) -> Option<ObjectHolder> {
		self.object().and_then(|object| match &*object {
			Object::Instance(instance) => instance.fields().get(name).cloned(),
			_ => None,
		})
	}

	/// Writes field `name` of the held instance. Returns `false` when the
	/// holder does not contain an instance.
	pub fn set_field(&self, name: &str, value: ObjectHolder) -> bool {
		let Some(data) = &self.data else { return false };
		match &mut *data.borrow_mut() {
			Object::Instance(instance) => {
				instance.fields_mut().insert(name.to_string(), value);
				true
			}
			_ => false,
		}
	}

	/// Prints the held value to the context's output stream.
	///
	/// Built-ins print their canonical form; an empty holder prints `None`;
	/// an instance dispatches to its `__str__` method when one with no
	/// parameters exists, and otherwise prints its address.
	pub fn print(&self, context: &mut dyn Context) -> Result<(), RuntimeError> {
		let Some(data) = &self.data else {
			write!(context.output(), "None")?;
			return Ok(());
		};

		if self.has_method(STR_METHOD, 0) {
			let rendered = self.call_method(STR_METHOD, vec![], context)?;
			return rendered.print(context);
		}

		match &*data.borrow() {
			Object::Number(value) => write!(context.output(), "{value}")?,
			Object::String(value) => write!(context.output(), "{value}")?,
			Object::Bool(true) => write!(context.output(), "True")?,
			Object::Bool(false) => write!(context.output(), "False")?,
			Object::Class(class) => write!(context.output(), "{class}")?,
			Object::Instance(_) => write!(context.output(), "{:p}", Rc::as_ptr(data))?,
		}
		Ok(())
	}
}

/// Truthiness: nonzero numbers, `True`, and nonempty strings. Everything
/// else, classes and instances included, is false.
pub fn is_true(object: &ObjectHolder) -> bool {
	object.as_number().is_some_and(|value| value != 0)
		|| object.as_bool().is_some_and(|value| value)
		|| object.as_string().is_some_and(|value| !value.is_empty())
}

/// Semantic equality.
///
/// Two `None`s are equal; same-kind built-ins compare by value; an instance
/// left operand defers to its `__eq__`, whose result must be `Bool`. Any
/// other pairing cannot be compared.
pub fn equal(
	lhs: &ObjectHolder,
	rhs: &ObjectHolder,
	context: &mut dyn Context,
) -> Result<bool, RuntimeError> {
	if lhs.is_empty() && rhs.is_empty() {
		return Ok(true);
	}
	if let (Some(l), Some(r)) = (lhs.as_number(), rhs.as_number()) {
		return Ok(l == r);
	}
	if let (Some(l), Some(r)) = (lhs.as_string(), rhs.as_string()) {
		return Ok(l == r);
	}
	if let (Some(l), Some(r)) = (lhs.as_bool(), rhs.as_bool()) {
		return Ok(l == r);
	}
	if lhs.has_method(EQ_METHOD, 1) {
		let result = lhs.call_method(EQ_METHOD, vec![rhs.clone()], context)?;
		return result.as_bool().ok_or(RuntimeError::DunderNotBool(EQ_METHOD));
	}
	Err(RuntimeError::CannotCompareEquality)
}

/// Semantic ordering.
///
/// Same-kind built-ins compare with `<` (lexicographic for strings,
/// `False < True` for bools); an instance left operand defers to its
/// `__lt__`, whose result must be `Bool`.
pub fn less(
	lhs: &ObjectHolder,
	rhs: &ObjectHolder,
	context: &mut dyn Context,
) -> Result<bool, RuntimeError> {
	if let (Some(l), Some(r)) = (lhs.as_number(), rhs.as_number()) {
		return Ok(l < r);
	}
	if let (Some(l), Some(r)) = (lhs.as_string(), rhs.as_string()) {
		return Ok(l < r);
	}
	if let (Some(l), Some(r)) = (lhs.as_bool(), rhs.as_bool()) {
		return Ok(!l && r);
	}
	if lhs.has_method(LT_METHOD, 1) {
		let result = lhs.call_method(LT_METHOD, vec![rhs.clone()], context)?;
		return result.as_bool().ok_or(RuntimeError::DunderNotBool(LT_METHOD));
	}
	Err(RuntimeError::CannotCompareLess)
}

pub fn not_equal(
	lhs: &ObjectHolder,
	rhs: &ObjectHolder,
	context: &mut dyn Context,
) -> Result<bool, RuntimeError> {
	Ok(!equal(lhs, rhs, context)?)
}

pub fn greater(
	lhs: &ObjectHolder,
	rhs: &ObjectHolder,
	context: &mut dyn Context,
) -> Result<bool, RuntimeError> {
	Ok(!(less(lhs, rhs, context)? || equal(lhs, rhs, context)?))
}

pub fn less_or_equal(
	lhs: &ObjectHolder,
	rhs: &ObjectHolder,
	context: &mut dyn Context,
) -> Result<bool, RuntimeError> {
	Ok(less(lhs, rhs, context)? || equal(lhs, rhs, context)?)
}

pub fn greater_or_equal(
	lhs: &ObjectHolder,
	rhs: &ObjectHolder,
	context: &mut dyn Context,
) -> Result<bool, RuntimeError> {
	Ok(!less(lhs, rhs, context)?)
}
