//! The predicate tree.

use grappelli_model::Value;
use serde::{Deserialize, Serialize};

/// The right-hand side of a comparison.
///
/// A `Value` is an inline literal that still travels through the parameter
/// binding registry; a `Parameter` is a named runtime input resolved by the
/// execution layer; a `Property` turns the comparison into a
/// property-to-property expression and never produces a binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
	Value(Value),
	Parameter(String),
	Property(String),
}

impl Operand {
	pub fn parameter(name: impl Into<String>) -> Self {
		Operand::Parameter(name.into())
	}

	pub fn property(path: impl Into<String>) -> Self {
		Operand::Property(path.into())
	}
}

impl<V: Into<Value>> From<V> for Operand {
	fn from(value: V) -> Self {
		Operand::Value(value.into())
	}
}

/// One node of the predicate tree.
///
/// This is a closed union: every compiler matches on it exhaustively, so
/// adding a variant without teaching each dialect about it fails the build
/// instead of failing a query at run time.
///
/// # Examples
///
/// ```
/// use grappelli_criteria::Criterion;
///
/// let adults_named_a = Criterion::and(vec![
///     Criterion::gt("age", 18),
///     Criterion::starts_with("name", "A", true),
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Criterion {
	Equals { path: String, value: Operand },
	NotEquals { path: String, value: Operand },
	GreaterThan { path: String, value: Operand },
	GreaterThanEquals { path: String, value: Operand },
	LessThan { path: String, value: Operand },
	LessThanEquals { path: String, value: Operand },
	Between { path: String, from: Operand, to: Operand },
	In { path: String, values: Operand },
	NotIn { path: String, values: Operand },
	StartsWith { path: String, value: Operand, ignore_case: bool },
	EndsWith { path: String, value: Operand, ignore_case: bool },
	Contains { path: String, value: Operand, ignore_case: bool },
	Like { path: String, value: Operand, ignore_case: bool },
	/// Match against a raw regular expression. The pattern is a
	/// compile-time constant and is inlined into the artifact.
	Regex { path: String, pattern: String },
	IsNull { path: String },
	IsNotNull { path: String },
	IsEmpty { path: String },
	IsNotEmpty { path: String },
	IsTrue { path: String },
	IsFalse { path: String },
	/// An array-typed property contains the given element(s).
	ArrayContains { path: String, value: Operand },
	/// Shorthand for equality on the entity identity.
	IdEquals { value: Operand },
	/// Negation of a single child criterion. Negating a conjunction or
	/// disjunction with more than one child is a compile error.
	Not(Box<Criterion>),
	And(Vec<Criterion>),
	Or(Vec<Criterion>),
}

impl Criterion {
	pub fn eq(path: impl Into<String>, value: impl Into<Operand>) -> Self {
		Criterion::Equals {
			path: path.into(),
			value: value.into(),
		}
	}

	pub fn ne(path: impl Into<String>, value: impl Into<Operand>) -> Self {
		Criterion::NotEquals {
			path: path.into(),
			value: value.into(),
		}
	}

	pub fn gt(path: impl Into<String>, value: impl Into<Operand>) -> Self {
		Criterion::GreaterThan {
			path: path.into(),
			value: value.into(),
		}
	}

	pub fn gte(path: impl Into<String>, value: impl Into<Operand>) -> Self {
		Criterion::GreaterThanEquals {
			path: path.into(),
			value: value.into(),
		}
	}

	pub fn lt(path: impl Into<String>, value: impl Into<Operand>) -> Self {
		Criterion::LessThan {
			path: path.into(),
			value: value.into(),
		}
	}

	pub fn lte(path: impl Into<String>, value: impl Into<Operand>) -> Self {
		Criterion::LessThanEquals {
			path: path.into(),
			value: value.into(),
		}
	}

	pub fn between(
		path: impl Into<String>,
		from: impl Into<Operand>,
		to: impl Into<Operand>,
	) -> Self {
		Criterion::Between {
			path: path.into(),
			from: from.into(),
			to: to.into(),
		}
	}

	pub fn is_in(path: impl Into<String>, values: impl Into<Operand>) -> Self {
		Criterion::In {
			path: path.into(),
			values: values.into(),
		}
	}

	pub fn not_in(path: impl Into<String>, values: impl Into<Operand>) -> Self {
		Criterion::NotIn {
			path: path.into(),
			values: values.into(),
		}
	}

	pub fn starts_with(
		path: impl Into<String>,
		value: impl Into<Operand>,
		ignore_case: bool,
	) -> Self {
		Criterion::StartsWith {
			path: path.into(),
			value: value.into(),
			ignore_case,
		}
	}

	pub fn ends_with(
		path: impl Into<String>,
		value: impl Into<Operand>,
		ignore_case: bool,
	) -> Self {
		Criterion::EndsWith {
			path: path.into(),
			value: value.into(),
			ignore_case,
		}
	}

	pub fn contains(
		path: impl Into<String>,
		value: impl Into<Operand>,
		ignore_case: bool,
	) -> Self {
		Criterion::Contains {
			path: path.into(),
			value: value.into(),
			ignore_case,
		}
	}

	pub fn like(path: impl Into<String>, value: impl Into<Operand>, ignore_case: bool) -> Self {
		Criterion::Like {
			path: path.into(),
			value: value.into(),
			ignore_case,
		}
	}

	pub fn regex(path: impl Into<String>, pattern: impl Into<String>) -> Self {
		Criterion::Regex {
			path: path.into(),
			pattern: pattern.into(),
		}
	}

	pub fn is_null(path: impl Into<String>) -> Self {
		Criterion::IsNull { path: path.into() }
	}

	pub fn is_not_null(path: impl Into<String>) -> Self {
		Criterion::IsNotNull { path: path.into() }
	}

	pub fn is_empty(path: impl Into<String>) -> Self {
		Criterion::IsEmpty { path: path.into() }
	}

	pub fn is_not_empty(path: impl Into<String>) -> Self {
		Criterion::IsNotEmpty { path: path.into() }
	}

	pub fn is_true(path: impl Into<String>) -> Self {
		Criterion::IsTrue { path: path.into() }
	}

	pub fn is_false(path: impl Into<String>) -> Self {
		Criterion::IsFalse { path: path.into() }
	}

	pub fn array_contains(path: impl Into<String>, value: impl Into<Operand>) -> Self {
		Criterion::ArrayContains {
			path: path.into(),
			value: value.into(),
		}
	}

	pub fn id_equals(value: impl Into<Operand>) -> Self {
		Criterion::IdEquals {
			value: value.into(),
		}
	}

	// Intentionally named `not` to mirror the combinator API; this builds a
	// tree node, not a boolean negation.
	#[allow(clippy::should_implement_trait)]
	pub fn not(inner: Criterion) -> Self {
		Criterion::Not(Box::new(inner))
	}

	pub fn and(children: Vec<Criterion>) -> Self {
		Criterion::And(children)
	}

	pub fn or(children: Vec<Criterion>) -> Self {
		Criterion::Or(children)
	}

	/// The tag name used in diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			Criterion::Equals { .. } => "Equals",
			Criterion::NotEquals { .. } => "NotEquals",
			Criterion::GreaterThan { .. } => "GreaterThan",
			Criterion::GreaterThanEquals { .. } => "GreaterThanEquals",
			Criterion::LessThan { .. } => "LessThan",
			Criterion::LessThanEquals { .. } => "LessThanEquals",
			Criterion::Between { .. } => "Between",
			Criterion::In { .. } => "In",
			Criterion::NotIn { .. } => "NotIn",
			Criterion::StartsWith { .. } => "StartsWith",
			Criterion::EndsWith { .. } => "EndsWith",
			Criterion::Contains { .. } => "Contains",
			Criterion::Like { .. } => "Like",
			Criterion::Regex { .. } => "Regex",
			Criterion::IsNull { .. } => "IsNull",
			Criterion::IsNotNull { .. } => "IsNotNull",
			Criterion::IsEmpty { .. } => "IsEmpty",
			Criterion::IsNotEmpty { .. } => "IsNotEmpty",
			Criterion::IsTrue { .. } => "IsTrue",
			Criterion::IsFalse { .. } => "IsFalse",
			Criterion::ArrayContains { .. } => "ArrayContains",
			Criterion::IdEquals { .. } => "IdEquals",
			Criterion::Not(_) => "Not",
			Criterion::And(_) => "And",
			Criterion::Or(_) => "Or",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn operand_from_literals() {
		assert_eq!(Operand::from(18), Operand::Value(Value::Int(18)));
		assert_eq!(
			Operand::from("A"),
			Operand::Value(Value::String("A".into()))
		);
	}

	#[test]
	fn constructors_build_expected_variants() {
		let c = Criterion::and(vec![
			Criterion::gt("age", 18),
			Criterion::starts_with("name", "A", true),
		]);
		match c {
			Criterion::And(children) => assert_eq!(children.len(), 2),
			other => panic!("expected And, got {}", other.name()),
		}
	}
}
