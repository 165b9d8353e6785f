//! Dialect-independent criterion normalization.
//!
//! Every policy that must hold regardless of the target dialect lives
//! here, as a pure tree-to-tree pass run before lowering:
//!
//! - boolean and null checks funnel through the generic equality path
//!   (`IsTrue` ≡ `Equals(prop, true)`, `IsNull` ≡ `Equals(prop, Null)`),
//! - negating an `In`/`NotIn` swaps the variant instead of wrapping,
//! - negating a multi-child conjunction/disjunction is an error,
//! - single-child junctions collapse to the child,
//! - nested same-kind junctions flatten into one clause list,
//! - `IdEquals` rewrites to equality on the identity property.

use grappelli_criteria::Criterion;
use grappelli_model::{PersistentEntity, Value};

use crate::error::{CompileError, CompileResult};

/// Normalize a criterion tree against the given root entity.
pub fn normalize(root: &PersistentEntity, criterion: &Criterion) -> CompileResult<Criterion> {
	match criterion {
		Criterion::IsTrue { path } => Ok(Criterion::eq(path.clone(), true)),
		Criterion::IsFalse { path } => Ok(Criterion::eq(path.clone(), false)),
		Criterion::IsNull { path } => Ok(Criterion::eq(path.clone(), Value::Null)),
		Criterion::IsNotNull { path } => Ok(Criterion::ne(path.clone(), Value::Null)),

		Criterion::IdEquals { value } => {
			let identity = root.single_identity().ok_or_else(|| {
				CompileError::invalid(format!(
					"entity `{}` has a composite identity; address its identity properties explicitly",
					root.name()
				))
			})?;
			Ok(Criterion::Equals {
				path: identity.name().to_string(),
				value: value.clone(),
			})
		}

		Criterion::Not(inner) => normalize_negation(root, inner),

		Criterion::And(children) => normalize_junction(root, children, true),
		Criterion::Or(children) => normalize_junction(root, children, false),

		// Leaf criteria pass through untouched.
		other => Ok(other.clone()),
	}
}

fn normalize_negation(root: &PersistentEntity, inner: &Criterion) -> CompileResult<Criterion> {
	match inner {
		// Required rewrite, not an optimization opportunity: negated set
		// membership swaps the variant so no dialect ever emits a literal
		// NOT wrapper around IN.
		Criterion::In { path, values } => Ok(Criterion::NotIn {
			path: path.clone(),
			values: values.clone(),
		}),
		Criterion::NotIn { path, values } => Ok(Criterion::In {
			path: path.clone(),
			values: values.clone(),
		}),

		Criterion::Not(nested) => normalize(root, nested),

		Criterion::And(children) | Criterion::Or(children) => {
			// A junction of one child degenerates to the child; anything
			// larger has no single clause to negate.
			match children.as_slice() {
				[only] => normalize_negation(root, only),
				_ => Err(CompileError::MalformedNegation),
			}
		}

		// Symmetric pairs rewrite directly rather than wrapping.
		Criterion::Equals { path, value } => Ok(Criterion::NotEquals {
			path: path.clone(),
			value: value.clone(),
		}),
		Criterion::NotEquals { path, value } => Ok(Criterion::Equals {
			path: path.clone(),
			value: value.clone(),
		}),
		Criterion::IsTrue { path } => Ok(Criterion::eq(path.clone(), false)),
		Criterion::IsFalse { path } => Ok(Criterion::eq(path.clone(), true)),
		Criterion::IsNull { path } => Ok(Criterion::ne(path.clone(), Value::Null)),
		Criterion::IsNotNull { path } => Ok(Criterion::eq(path.clone(), Value::Null)),
		Criterion::IsEmpty { path } => Ok(Criterion::IsNotEmpty { path: path.clone() }),
		Criterion::IsNotEmpty { path } => Ok(Criterion::IsEmpty { path: path.clone() }),

		// Everything else keeps the wrapper; the dialect applies its
		// single-clause negation to the compiled child.
		other => {
			let normalized = normalize(root, other)?;
			Ok(Criterion::Not(Box::new(normalized)))
		}
	}
}

fn normalize_junction(
	root: &PersistentEntity,
	children: &[Criterion],
	conjunction: bool,
) -> CompileResult<Criterion> {
	if children.is_empty() {
		return Err(CompileError::invalid(
			"conjunction/disjunction must have at least one child",
		));
	}
	if let [only] = children {
		// No redundant single-element wrapper.
		return normalize(root, only);
	}

	let mut flattened: Vec<Criterion> = Vec::with_capacity(children.len());
	for child in children {
		let normalized = normalize(root, child)?;
		match (conjunction, normalized) {
			(true, Criterion::And(nested)) => flattened.extend(nested),
			(false, Criterion::Or(nested)) => flattened.extend(nested),
			(_, other) => flattened.push(other),
		}
	}
	if conjunction {
		Ok(Criterion::And(flattened))
	} else {
		Ok(Criterion::Or(flattened))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use grappelli_model::{DataType, PersistentEntity, PersistentProperty};
	use std::sync::Arc;

	fn person() -> Arc<PersistentEntity> {
		PersistentEntity::builder("Person")
			.property(PersistentProperty::new("id", DataType::Long).identity())
			.property(PersistentProperty::new("name", DataType::String))
			.property(PersistentProperty::new("age", DataType::Integer))
			.build()
	}

	#[test]
	fn negated_in_swaps_to_not_in() {
		let entity = person();
		let normalized = normalize(
			&entity,
			&Criterion::not(Criterion::is_in("age", vec![1, 2, 3])),
		)
		.unwrap();
		assert!(matches!(normalized, Criterion::NotIn { .. }));
	}

	#[test]
	fn negated_not_in_swaps_to_in() {
		let entity = person();
		let normalized = normalize(
			&entity,
			&Criterion::not(Criterion::not_in("age", vec![1, 2, 3])),
		)
		.unwrap();
		assert!(matches!(normalized, Criterion::In { .. }));
	}

	#[test]
	fn boolean_and_null_checks_reduce_to_equality() {
		let entity = person();
		assert_eq!(
			normalize(&entity, &Criterion::is_true("name")).unwrap(),
			Criterion::eq("name", true)
		);
		assert_eq!(
			normalize(&entity, &Criterion::is_null("name")).unwrap(),
			Criterion::eq("name", Value::Null)
		);
	}

	#[test]
	fn id_equals_targets_identity_property() {
		let entity = person();
		let normalized = normalize(&entity, &Criterion::id_equals(42)).unwrap();
		match normalized {
			Criterion::Equals { path, .. } => assert_eq!(path, "id"),
			other => panic!("expected Equals, got {}", other.name()),
		}
	}

	#[test]
	fn single_child_junction_collapses() {
		let entity = person();
		let normalized =
			normalize(&entity, &Criterion::and(vec![Criterion::gt("age", 18)])).unwrap();
		assert!(matches!(normalized, Criterion::GreaterThan { .. }));
	}

	#[test]
	fn nested_same_kind_junctions_flatten() {
		let entity = person();
		let normalized = normalize(
			&entity,
			&Criterion::and(vec![
				Criterion::gt("age", 18),
				Criterion::and(vec![
					Criterion::is_not_null("name"),
					Criterion::lt("age", 65),
				]),
			]),
		)
		.unwrap();
		match normalized {
			Criterion::And(children) => assert_eq!(children.len(), 3),
			other => panic!("expected And, got {}", other.name()),
		}
	}

	#[test]
	fn negating_multi_child_junction_is_malformed() {
		let entity = person();
		let result = normalize(
			&entity,
			&Criterion::not(Criterion::or(vec![
				Criterion::gt("age", 18),
				Criterion::lt("age", 65),
			])),
		);
		assert_eq!(result.unwrap_err(), CompileError::MalformedNegation);
	}

	#[test]
	fn negating_single_child_junction_negates_the_child() {
		let entity = person();
		let normalized = normalize(
			&entity,
			&Criterion::not(Criterion::or(vec![Criterion::eq("age", 18)])),
		)
		.unwrap();
		assert_eq!(normalized, Criterion::ne("age", 18));
	}

	#[test]
	fn double_negation_cancels() {
		let entity = person();
		let normalized = normalize(
			&entity,
			&Criterion::not(Criterion::not(Criterion::gt("age", 18))),
		)
		.unwrap();
		assert!(matches!(normalized, Criterion::GreaterThan { .. }));
	}
}
