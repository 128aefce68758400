use std::{collections::HashMap, fmt, rc::Rc};

use crate::ast::Statement;

/// A method of a Mython class.
///
/// The body is a method-body node: it catches the `return` signal, so
/// executing it always yields the call result (or None).
#[derive(Debug)]
pub struct Method {
	pub name:          String,
	/// Formal parameter names in declaration order; `self` is implicit.
	pub formal_params: Vec<String>,
	pub body:          Statement,
}

/// A user-defined class: a name plus a virtual method table.
///
/// Every method in Mython is virtual. The vtable is composed once at
/// construction: it starts as a copy of the parent's composed table, then
/// the class's own methods overwrite colliding names. Copying the composed
/// table (not just the parent's own methods) keeps grandparent methods
/// visible through intermediate classes that do not redeclare them.
#[derive(Debug)]
pub struct Class {
	name:   String,
	vtable: HashMap<String, Rc<Method>>,
}

impl Class {
	pub fn new(name: impl Into<String>, methods: Vec<Method>, parent: Option<&Rc<Class>>) -> Self {
		let mut vtable = parent.map(|parent| parent.vtable.clone()).unwrap_or_default();
		for method in methods {
			vtable.insert(method.name.clone(), Rc::new(method));
		}
		Self { name: name.into(), vtable }
	}

	/// Looks up `name` in the vtable.
	pub fn method(&self, name: &str) -> Option<&Rc<Method>> { self.vtable.get(name) }

	pub fn name(&self) -> &str { &self.name }
}

impl fmt::Display for Class {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Class {}", self.name) }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn method(name: &str, params: &[&str]) -> Method {
		Method {
			name:          name.to_string(),
			formal_params: params.iter().map(|p| p.to_string()).collect(),
			body:          Statement::NoneConst,
		}
	}

	#[test]
	fn own_methods_resolve() {
		let class = Class::new("Point", vec![method("norm", &[]), method("scale", &["k"])], None);
		assert_eq!(class.method("norm").unwrap().formal_params.len(), 0);
		assert_eq!(class.method("scale").unwrap().formal_params, vec!["k".to_string()]);
		assert!(class.method("missing").is_none());
	}

	#[test]
	fn child_overrides_parent() {
		let parent = Rc::new(Class::new("Base", vec![method("greet", &[]), method("kept", &[])], None));
		let child = Class::new("Derived", vec![method("greet", &["x"])], Some(&parent));
		// Overridden: the child's arity wins.
		assert_eq!(child.method("greet").unwrap().formal_params.len(), 1);
		// Inherited untouched.
		assert!(child.method("kept").is_some());
	}

	#[test]
	fn grandchild_sees_grandparent_methods() {
		let grandparent = Rc::new(Class::new("A", vec![method("origin", &[])], None));
		let parent = Rc::new(Class::new("B", vec![method("middle", &[])], Some(&grandparent)));
		let child = Class::new("C", vec![], Some(&parent));
		// "origin" was never redeclared by B, yet C must still see it.
		assert!(child.method("origin").is_some());
		assert!(child.method("middle").is_some());
	}

	#[test]
	fn lookup_is_deterministic() {
		let class = Class::new("X", vec![method("m", &["a"])], None);
		let first = Rc::as_ptr(class.method("m").unwrap());
		let second = Rc::as_ptr(class.method("m").unwrap());
		assert_eq!(first, second);
	}

	#[test]
	fn display() {
		let class = Class::new("cat", vec![], None);
		assert_eq!(class.to_string(), "Class cat");
	}
}
