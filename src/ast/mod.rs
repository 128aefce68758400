//! Executable nodes of a parsed Mython program.
//!
//! There is no separate evaluator: the tree itself is the interpreter.
//! Every expression and statement is a [`Statement`] and implements one
//! operation, [`Statement::execute`], which evaluates the node against a
//! scope and a context and yields an [`ObjectHolder`] (the empty holder for
//! statements that produce no value).
//!
//! `return` travels as the [`RuntimeError::Return`] signal and is caught by
//! the nearest enclosing method-body node; every other error aborts the
//! program.

use std::{cell::OnceCell, io::Write, rc::Rc};

use crate::{
	error::runtime::RuntimeError,
	runtime::{
		self, Class, ClassInstance, Closure, Context, DummyContext, Object, ObjectHolder, ADD_METHOD,
		INIT_METHOD,
	},
};

/// Operator of a [`Statement::Comparison`] node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CmpOp {
	Eq,
	NotEq,
	Less,
	Greater,
	LessOrEq,
	GreaterOrEq,
}

/// An executable expression or statement.
#[derive(Debug)]
pub enum Statement {
	NumericConst(i64),
	StringConst(String),
	BoolConst(bool),
	NoneConst,
	/// Read of `a.b.c`: the first name resolves in the scope, each further
	/// name in the fields of the instance found so far.
	Variable(Vec<String>),
	/// `var = rv` in the current scope.
	Assignment { var: String, rv: Box<Statement> },
	/// `object.field = rv`.
	FieldAssignment { object: Box<Statement>, field: String, rv: Box<Statement> },
	/// `print a, b, ...` — arguments separated by single spaces, newline at
	/// the end.
	Print(Vec<Statement>),
	/// `str(arg)` — renders the argument the way `print` would.
	Stringify(Box<Statement>),
	Add { lhs: Box<Statement>, rhs: Box<Statement> },
	Sub { lhs: Box<Statement>, rhs: Box<Statement> },
	Mult { lhs: Box<Statement>, rhs: Box<Statement> },
	Div { lhs: Box<Statement>, rhs: Box<Statement> },
	Or { lhs: Box<Statement>, rhs: Box<Statement> },
	And { lhs: Box<Statement>, rhs: Box<Statement> },
	Not(Box<Statement>),
	Comparison { op: CmpOp, lhs: Box<Statement>, rhs: Box<Statement> },
	MethodCall { object: Box<Statement>, method: String, args: Vec<Statement> },
	/// Construction of a fresh instance; the class slot is filled by the
	/// parser once the class definition completes.
	NewInstance { class: Rc<OnceCell<Rc<Class>>>, args: Vec<Statement> },
	Compound(Vec<Statement>),
	Return(Option<Box<Statement>>),
	/// A method's outermost node: catches the `return` signal.
	MethodBody(Box<Statement>),
	/// Binds the class value under its name in the enclosing scope.
	ClassDefinition(Rc<Class>),
	IfElse {
		condition: Box<Statement>,
		if_body:   Box<Statement>,
		else_body: Option<Box<Statement>>,
	},
}

impl Statement {
	pub fn boxed(self) -> Box<Self> { Box::new(self) }

	pub fn variable(dotted_ids: Vec<String>) -> Self { Statement::Variable(dotted_ids) }

	pub fn assignment(var: impl Into<String>, rv: Statement) -> Self {
		Statement::Assignment { var: var.into(), rv: rv.boxed() }
	}

	pub fn field_assignment(object: Statement, field: impl Into<String>, rv: Statement) -> Self {
		Statement::FieldAssignment { object: object.boxed(), field: field.into(), rv: rv.boxed() }
	}

	pub fn method_body(body: Statement) -> Self { Statement::MethodBody(body.boxed()) }

	/// Evaluates the node against `closure` and `context`.
	pub fn execute(
		&self,
		closure: &mut Closure,
		context: &mut dyn Context,
	) -> Result<ObjectHolder, RuntimeError> {
		match self {
			Statement::NumericConst(value) => Ok(ObjectHolder::own(Object::Number(*value))),
			Statement::StringConst(value) => Ok(ObjectHolder::own(Object::String(value.clone()))),
			Statement::BoolConst(value) => Ok(ObjectHolder::own(Object::Bool(*value))),
			Statement::NoneConst => Ok(ObjectHolder::none()),

			Statement::Variable(dotted_ids) => Self::read_variable(dotted_ids, closure),

			Statement::Assignment { var, rv } => {
				let value = rv.execute(closure, context)?;
				closure.insert(var.clone(), value.clone());
				Ok(value)
			}

			Statement::FieldAssignment { object, field, rv } => {
				let target = object.execute(closure, context)?;
				if target.is_empty() {
					return Ok(ObjectHolder::none());
				}
				let value = rv.execute(closure, context)?;
				if !target.set_field(field, value.clone()) {
					let kind = target.object().map(|o| o.type_name()).unwrap_or("None");
					return Err(RuntimeError::NotAnInstance(kind.to_string()));
				}
				Ok(value)
			}

			Statement::Print(args) => {
				for (i, arg) in args.iter().enumerate() {
					if i > 0 {
						write!(context.output(), " ")?;
					}
					let value = arg.execute(closure, context)?;
					value.print(context)?;
				}
				writeln!(context.output())?;
				Ok(ObjectHolder::none())
			}

			Statement::Stringify(arg) => {
				let value = arg.execute(closure, context)?;
				let mut scratch = DummyContext::new();
				value.print(&mut scratch)?;
				Ok(ObjectHolder::own(Object::String(scratch.text())))
			}

			Statement::Add { lhs, rhs } => {
				let l = lhs.execute(closure, context)?;
				let r = rhs.execute(closure, context)?;
				if let (Some(a), Some(b)) = (l.as_number(), r.as_number()) {
					return Ok(ObjectHolder::own(Object::Number(a + b)));
				}
				if let (Some(a), Some(b)) = (l.as_string(), r.as_string()) {
					return Ok(ObjectHolder::own(Object::String(a + &b)));
				}
				if l.has_method(ADD_METHOD, 1) {
					return l.call_method(ADD_METHOD, vec![r], context);
				}
				Err(RuntimeError::IncompatibleTypes("+"))
			}

			Statement::Sub { lhs, rhs } => {
				let (a, b) = Self::numeric_operands(lhs, rhs, "-", closure, context)?;
				Ok(ObjectHolder::own(Object::Number(a - b)))
			}

			Statement::Mult { lhs, rhs } => {
				let (a, b) = Self::numeric_operands(lhs, rhs, "*", closure, context)?;
				Ok(ObjectHolder::own(Object::Number(a * b)))
			}

			Statement::Div { lhs, rhs } => {
				let (a, b) = Self::numeric_operands(lhs, rhs, "/", closure, context)?;
				if b == 0 {
					return Err(RuntimeError::DivisionByZero);
				}
				Ok(ObjectHolder::own(Object::Number(a / b)))
			}

			Statement::Or { lhs, rhs } => {
				let result = runtime::is_true(&lhs.execute(closure, context)?)
					|| runtime::is_true(&rhs.execute(closure, context)?);
				Ok(ObjectHolder::own(Object::Bool(result)))
			}

			Statement::And { lhs, rhs } => {
				let result = runtime::is_true(&lhs.execute(closure, context)?)
					&& runtime::is_true(&rhs.execute(closure, context)?);
				Ok(ObjectHolder::own(Object::Bool(result)))
			}

			Statement::Not(arg) => {
				let result = !runtime::is_true(&arg.execute(closure, context)?);
				Ok(ObjectHolder::own(Object::Bool(result)))
			}

			Statement::Comparison { op, lhs, rhs } => {
				let l = lhs.execute(closure, context)?;
				let r = rhs.execute(closure, context)?;
				let result = match op {
					CmpOp::Eq => runtime::equal(&l, &r, context)?,
					CmpOp::NotEq => runtime::not_equal(&l, &r, context)?,
					CmpOp::Less => runtime::less(&l, &r, context)?,
					CmpOp::Greater => runtime::greater(&l, &r, context)?,
					CmpOp::LessOrEq => runtime::less_or_equal(&l, &r, context)?,
					CmpOp::GreaterOrEq => runtime::greater_or_equal(&l, &r, context)?,
				};
				Ok(ObjectHolder::own(Object::Bool(result)))
			}

			Statement::MethodCall { object, method, args } => {
				let target = object.execute(closure, context)?;
				let mut values = Vec::with_capacity(args.len());
				for arg in args {
					values.push(arg.execute(closure, context)?);
				}
				target.call_method(method, values, context)
			}

			Statement::NewInstance { class, args } => {
				let class = class
					.get()
					.cloned()
					.ok_or_else(|| anyhow::anyhow!("class instantiated before its definition completed"))?;
				let instance = ObjectHolder::own(Object::Instance(ClassInstance::new(class)));
				if instance.has_method(INIT_METHOD, args.len()) {
					let mut values = Vec::with_capacity(args.len());
					for arg in args {
						values.push(arg.execute(closure, context)?);
					}
					instance.call_method(INIT_METHOD, values, context)?;
				}
				Ok(instance)
			}

			Statement::Compound(statements) => {
				for statement in statements {
					statement.execute(closure, context)?;
				}
				Ok(ObjectHolder::none())
			}

			Statement::Return(value) => {
				let result = match value {
					Some(statement) => statement.execute(closure, context)?,
					None => ObjectHolder::none(),
				};
				Err(RuntimeError::Return(result))
			}

			Statement::MethodBody(body) => match body.execute(closure, context) {
				Ok(_) => Ok(ObjectHolder::none()),
				Err(RuntimeError::Return(value)) => Ok(value),
				Err(error) => Err(error),
			},

			Statement::ClassDefinition(class) => {
				let name = class.name().to_string();
				closure.insert(name, ObjectHolder::own(Object::Class(class.clone())));
				Ok(ObjectHolder::none())
			}

			Statement::IfElse { condition, if_body, else_body } => {
				if runtime::is_true(&condition.execute(closure, context)?) {
					if_body.execute(closure, context)
				} else if let Some(else_body) = else_body {
					else_body.execute(closure, context)
				} else {
					Ok(ObjectHolder::none())
				}
			}
		}
	}

	/// Walks a dotted name: scope first, then instance fields.
	fn read_variable(dotted_ids: &[String], closure: &Closure) -> Result<ObjectHolder, RuntimeError> {
		let Some((first, rest)) = dotted_ids.split_first() else {
			return Err(anyhow::anyhow!("empty variable path").into());
		};
		let mut value = closure
			.get(first)
			.cloned()
			.ok_or_else(|| RuntimeError::UndefinedVariable(first.clone()))?;
		for (i, name) in rest.iter().enumerate() {
			let Some(next) = value.field(name) else {
				if value.is_instance() {
					return Err(RuntimeError::UndefinedVariable(dotted_ids[..i + 2].join(".")));
				}
				return Err(RuntimeError::NotAnInstance(dotted_ids[..i + 1].join(".")));
			};
			value = next;
		}
		Ok(value)
	}

	/// Evaluates both operands of a numbers-only arithmetic node.
	fn numeric_operands(
		lhs: &Statement,
		rhs: &Statement,
		op: &'static str,
		closure: &mut Closure,
		context: &mut dyn Context,
	) -> Result<(i64, i64), RuntimeError> {
		let l = lhs.execute(closure, context)?;
		let r = rhs.execute(closure, context)?;
		match (l.as_number(), r.as_number()) {
			(Some(a), Some(b)) => Ok((a, b)),
			_ => Err(RuntimeError::IncompatibleTypes(op)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::runtime::Method;

	fn number(value: i64) -> Statement { Statement::NumericConst(value) }

	fn string(value: &str) -> Statement { Statement::StringConst(value.to_string()) }

	fn var(name: &str) -> Statement { Statement::variable(vec![name.to_string()]) }

	/// Runs a statement against a fresh scope, returning the value and the
	/// produced output.
	fn run(statement: &Statement) -> (Result<ObjectHolder, RuntimeError>, String) {
		let mut closure = Closure::new();
		run_in(statement, &mut closure)
	}

	fn run_in(statement: &Statement, closure: &mut Closure) -> (Result<ObjectHolder, RuntimeError>, String) {
		let mut context = DummyContext::new();
		let result = statement.execute(closure, &mut context);
		(result, context.text())
	}

	#[test]
	fn constants() {
		assert_eq!(run(&number(42)).0.unwrap().as_number(), Some(42));
		assert_eq!(run(&string("hi")).0.unwrap().as_string(), Some("hi".to_string()));
		assert_eq!(run(&Statement::BoolConst(true)).0.unwrap().as_bool(), Some(true));
		assert!(run(&Statement::NoneConst).0.unwrap().is_empty());
	}

	#[test]
	fn assignment_binds_and_returns() {
		let mut closure = Closure::new();
		let (result, _) = run_in(&Statement::assignment("x", number(57)), &mut closure);
		assert_eq!(result.unwrap().as_number(), Some(57));
		assert_eq!(closure["x"].as_number(), Some(57));
	}

	#[test]
	fn variable_lookup_and_missing_name() {
		let mut closure = Closure::new();
		closure.insert("x".to_string(), ObjectHolder::own(Object::Number(3)));
		assert_eq!(run_in(&var("x"), &mut closure).0.unwrap().as_number(), Some(3));
		assert!(matches!(run(&var("ghost")).0, Err(RuntimeError::UndefinedVariable(name)) if name == "ghost"));
	}

	#[test]
	fn dotted_lookup_through_fields() {
		let class = Rc::new(Class::new("C", vec![], None));
		let inner = ObjectHolder::own(Object::Instance(ClassInstance::new(class.clone())));
		inner.set_field("value", ObjectHolder::own(Object::Number(9)));
		let outer = ObjectHolder::own(Object::Instance(ClassInstance::new(class)));
		outer.set_field("inner", inner);

		let mut closure = Closure::new();
		closure.insert("o".to_string(), outer);

		let chain = Statement::variable(vec!["o".to_string(), "inner".to_string(), "value".to_string()]);
		assert_eq!(run_in(&chain, &mut closure).0.unwrap().as_number(), Some(9));

		let missing = Statement::variable(vec!["o".to_string(), "nope".to_string()]);
		assert!(matches!(run_in(&missing, &mut closure).0, Err(RuntimeError::UndefinedVariable(_))));
	}

	#[test]
	fn dotted_lookup_through_non_instance_fails() {
		let mut closure = Closure::new();
		closure.insert("n".to_string(), ObjectHolder::own(Object::Number(1)));
		let chain = Statement::variable(vec!["n".to_string(), "field".to_string()]);
		assert!(matches!(run_in(&chain, &mut closure).0, Err(RuntimeError::NotAnInstance(_))));
	}

	#[test]
	fn print_formatting() {
		let (_, out) = run(&Statement::Print(vec![number(10), number(24), string("x")]));
		assert_eq!(out, "10 24 x\n");
		let (_, out) = run(&Statement::Print(vec![]));
		assert_eq!(out, "\n");
		let (_, out) = run(&Statement::Print(vec![Statement::NoneConst]));
		assert_eq!(out, "None\n");
	}

	#[test]
	fn stringify() {
		assert_eq!(run(&Statement::Stringify(number(42).boxed())).0.unwrap().as_string(), Some("42".to_string()));
		assert_eq!(
			run(&Statement::Stringify(Statement::NoneConst.boxed())).0.unwrap().as_string(),
			Some("None".to_string())
		);
		assert_eq!(
			run(&Statement::Stringify(Statement::BoolConst(false).boxed())).0.unwrap().as_string(),
			Some("False".to_string())
		);
	}

	#[test]
	fn arithmetic() {
		let add = Statement::Add { lhs: number(2).boxed(), rhs: number(3).boxed() };
		assert_eq!(run(&add).0.unwrap().as_number(), Some(5));

		let concat = Statement::Add { lhs: string("ab").boxed(), rhs: string("cd").boxed() };
		assert_eq!(run(&concat).0.unwrap().as_string(), Some("abcd".to_string()));

		let sub = Statement::Sub { lhs: number(2).boxed(), rhs: number(5).boxed() };
		assert_eq!(run(&sub).0.unwrap().as_number(), Some(-3));

		let mult = Statement::Mult { lhs: number(6).boxed(), rhs: number(7).boxed() };
		assert_eq!(run(&mult).0.unwrap().as_number(), Some(42));

		let div = Statement::Div { lhs: number(36).boxed(), rhs: number(5).boxed() };
		assert_eq!(run(&div).0.unwrap().as_number(), Some(7));

		let div_neg = Statement::Div { lhs: number(-7).boxed(), rhs: number(2).boxed() };
		assert_eq!(run(&div_neg).0.unwrap().as_number(), Some(-3));
	}

	#[test]
	fn arithmetic_type_errors() {
		let add = Statement::Add { lhs: number(1).boxed(), rhs: string("x").boxed() };
		assert!(matches!(run(&add).0, Err(RuntimeError::IncompatibleTypes("+"))));

		let sub = Statement::Sub { lhs: string("a").boxed(), rhs: string("b").boxed() };
		assert!(matches!(run(&sub).0, Err(RuntimeError::IncompatibleTypes("-"))));

		let div = Statement::Div { lhs: number(1).boxed(), rhs: number(0).boxed() };
		assert!(matches!(run(&div).0, Err(RuntimeError::DivisionByZero)));
	}

	#[test]
	fn logic_short_circuits() {
		// The right operand would blow up with an undefined variable; Or
		// must never evaluate it.
		let or = Statement::Or { lhs: Statement::BoolConst(true).boxed(), rhs: var("ghost").boxed() };
		assert_eq!(run(&or).0.unwrap().as_bool(), Some(true));

		let and = Statement::And { lhs: Statement::BoolConst(false).boxed(), rhs: var("ghost").boxed() };
		assert_eq!(run(&and).0.unwrap().as_bool(), Some(false));

		let or_false = Statement::Or { lhs: number(0).boxed(), rhs: string("").boxed() };
		assert_eq!(run(&or_false).0.unwrap().as_bool(), Some(false));

		let not = Statement::Not(number(0).boxed());
		assert_eq!(run(&not).0.unwrap().as_bool(), Some(true));
	}

	#[test]
	fn comparisons_wrap_bool() {
		let cmp = Statement::Comparison { op: CmpOp::Less, lhs: number(2).boxed(), rhs: number(3).boxed() };
		assert_eq!(run(&cmp).0.unwrap().as_bool(), Some(true));

		let cmp = Statement::Comparison { op: CmpOp::GreaterOrEq, lhs: number(2).boxed(), rhs: number(3).boxed() };
		assert_eq!(run(&cmp).0.unwrap().as_bool(), Some(false));

		let cmp = Statement::Comparison { op: CmpOp::Eq, lhs: string("a").boxed(), rhs: string("a").boxed() };
		assert_eq!(run(&cmp).0.unwrap().as_bool(), Some(true));
	}

	#[test]
	fn if_else_branches() {
		let stmt = Statement::IfElse {
			condition: Statement::Comparison { op: CmpOp::Less, lhs: number(2).boxed(), rhs: number(3).boxed() }
				.boxed(),
			if_body:   Statement::Print(vec![string("lt")]).boxed(),
			else_body: Some(Statement::Print(vec![string("ge")]).boxed()),
		};
		assert_eq!(run(&stmt).1, "lt\n");

		let stmt = Statement::IfElse {
			condition: number(0).boxed(),
			if_body:   Statement::Print(vec![string("then")]).boxed(),
			else_body: None,
		};
		assert_eq!(run(&stmt).1, "");
	}

	#[test]
	fn return_is_caught_by_method_body() {
		let body = Statement::method_body(Statement::Compound(vec![
			Statement::Return(Some(number(7).boxed())),
			Statement::Print(vec![string("unreachable")]),
		]));
		let (result, out) = run(&body);
		assert_eq!(result.unwrap().as_number(), Some(7));
		assert_eq!(out, "");
	}

	#[test]
	fn stray_return_is_an_error() {
		let (result, _) = run(&Statement::Return(None));
		assert!(matches!(result, Err(RuntimeError::Return(_))));
	}

	#[test]
	fn method_body_without_return_yields_none() {
		let body = Statement::method_body(Statement::Compound(vec![Statement::assignment("x", number(1))]));
		assert!(run(&body).0.unwrap().is_empty());
	}

	#[test]
	fn class_definition_binds_class() {
		let class = Rc::new(Class::new("Point", vec![], None));
		let mut closure = Closure::new();
		run_in(&Statement::ClassDefinition(class), &mut closure).0.unwrap();
		assert_eq!(closure["Point"].as_class().unwrap().name(), "Point");
	}

	fn filled_slot(class: Rc<Class>) -> Rc<OnceCell<Rc<Class>>> {
		let slot = Rc::new(OnceCell::new());
		slot.set(class).unwrap();
		slot
	}

	#[test]
	fn new_instance_is_fresh_per_evaluation() {
		let class = Rc::new(Class::new("C", vec![], None));
		let node = Statement::NewInstance { class: filled_slot(class), args: vec![] };
		let mut closure = Closure::new();
		let first = run_in(&node, &mut closure).0.unwrap();
		let second = run_in(&node, &mut closure).0.unwrap();
		first.set_field("x", ObjectHolder::own(Object::Number(1)));
		assert!(second.field("x").is_none());
	}

	#[test]
	fn new_instance_runs_init() {
		// class C: def __init__(v): self.v = v
		let init = Method {
			name:          INIT_METHOD.to_string(),
			formal_params: vec!["v".to_string()],
			body:          Statement::method_body(Statement::field_assignment(
				var("self"),
				"v",
				var("v"),
			)),
		};
		let class = Rc::new(Class::new("C", vec![init], None));
		let node = Statement::NewInstance { class: filled_slot(class), args: vec![number(11)] };
		let instance = run(&node).0.unwrap();
		assert_eq!(instance.field("v").unwrap().as_number(), Some(11));
	}

	#[test]
	fn field_assignment_on_none_is_silent() {
		let stmt = Statement::field_assignment(Statement::NoneConst, "f", number(1));
		assert!(run(&stmt).0.unwrap().is_empty());
	}

	#[test]
	fn field_assignment_on_builtin_fails() {
		let stmt = Statement::field_assignment(number(5), "f", number(1));
		assert!(matches!(run(&stmt).0, Err(RuntimeError::NotAnInstance(_))));
	}

	#[test]
	fn method_call_on_none_fails() {
		let call = Statement::MethodCall {
			object: Statement::NoneConst.boxed(),
			method: "m".to_string(),
			args:   vec![],
		};
		assert!(matches!(run(&call).0, Err(RuntimeError::NotAnInstance(_))));
	}

	#[test]
	fn aliasing_is_observable_through_assignment() {
		// y = x; x.f = 1  =>  y.f == 1
		let class = Rc::new(Class::new("C", vec![], None));
		let mut closure = Closure::new();
		closure.insert("x".to_string(), ObjectHolder::own(Object::Instance(ClassInstance::new(class))));

		run_in(&Statement::assignment("y", var("x")), &mut closure).0.unwrap();
		run_in(&Statement::field_assignment(var("x"), "f", number(1)), &mut closure).0.unwrap();

		let read = Statement::variable(vec!["y".to_string(), "f".to_string()]);
		assert_eq!(run_in(&read, &mut closure).0.unwrap().as_number(), Some(1));
	}
}
