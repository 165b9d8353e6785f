//! Literal values carried inside criteria and update maps.

use serde::{Deserialize, Serialize};

/// A literal value supplied inline with a criterion or update entry.
///
/// Values of this type are what the compiler hands to the parameter binding
/// registry; the execution layer substitutes them into placeholders at run
/// time. `Null` is an ordinary value here so that `Equals(prop, Null)` and
/// `IsNull(prop)` can share a single lowering path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
	String(String),
	Int(i64),
	Float(f64),
	Bool(bool),
	Null,
	Array(Vec<Value>),
}

impl Value {
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// String content, if this is a string value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Value::Array(values) => Some(values),
			_ => None,
		}
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::String(s)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::String(s.to_string())
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Value::Int(i)
	}
}

impl From<i32> for Value {
	fn from(i: i32) -> Self {
		Value::Int(i as i64)
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Value::Float(f)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<uuid::Uuid> for Value {
	fn from(u: uuid::Uuid) -> Self {
		Value::String(u.to_string())
	}
}

impl<V: Into<Value>> From<Vec<V>> for Value {
	fn from(values: Vec<V>) -> Self {
		Value::Array(values.into_iter().map(Into::into).collect())
	}
}

impl<V: Into<Value>> From<Option<V>> for Value {
	fn from(value: Option<V>) -> Self {
		match value {
			Some(v) => v.into(),
			None => Value::Null,
		}
	}
}
