use std::rc::Rc;

use crate::{
	error::runtime::RuntimeError,
	runtime::{Class, Closure, Context, Method, Object, ObjectHolder},
};

/// An object of a user-defined class: a class reference plus a field table.
///
/// Fields have no declared schema; they come into being on first assignment
/// to `self.name`.
#[derive(Debug)]
pub struct ClassInstance {
	class:  Rc<Class>,
	fields: Closure,
}

impl ClassInstance {
	pub fn new(class: Rc<Class>) -> Self { Self { class, fields: Closure::new() } }

	pub fn class(&self) -> &Rc<Class> { &self.class }

	pub fn fields(&self) -> &Closure { &self.fields }

	pub fn fields_mut(&mut self) -> &mut Closure { &mut self.fields }

	/// True if the class provides `method` taking exactly `argument_count`
	/// parameters (`self` not counted).
	pub fn has_method(&self, method: &str, argument_count: usize) -> bool {
		self.class.method(method).is_some_and(|m| m.formal_params.len() == argument_count)
	}
}

impl ObjectHolder {
	/// True if the holder contains an instance providing `method`/`argument_count`.
	pub fn has_method(&self, method: &str, argument_count: usize) -> bool {
		self.object().is_some_and(|object| match &*object {
			Object::Instance(instance) => instance.has_method(method, argument_count),
			_ => false,
		})
	}

	/// Dispatches `method` on the instance held by `self`.
	///
	/// The method body runs under a fresh scope holding `self` (an alias of
	/// this holder) and the formal parameters bound to `args` in order.
	/// Arity must match exactly; a missing or mismatched method is the
	/// "Call for a not defined method" runtime error.
	pub fn call_method(
		&self,
		method: &str,
		args: Vec<ObjectHolder>,
		context: &mut dyn Context,
	) -> Result<ObjectHolder, RuntimeError> {
		// Clone the resolved method out before executing so no borrow of the
		// instance is held while its own body runs.
		let resolved: Rc<Method> = {
			let Some(object) = self.object() else {
				return Err(RuntimeError::NotAnInstance("None".to_string()));
			};
			let Object::Instance(instance) = &*object else {
				return Err(RuntimeError::NotAnInstance(object.type_name().to_string()));
			};
			instance
				.class()
				.method(method)
				.filter(|m| m.formal_params.len() == args.len())
				.cloned()
				.ok_or_else(|| RuntimeError::MethodNotFound {
					class:  instance.class().name().to_string(),
					method: method.to_string(),
					arity:  args.len(),
				})?
		};

		let mut closure = Closure::new();
		closure.insert("self".to_string(), self.clone());
		for (param, arg) in resolved.formal_params.iter().zip(args) {
			closure.insert(param.clone(), arg);
		}

		resolved.body.execute(&mut closure, context)
	}
}
