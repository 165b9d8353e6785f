//! Selection nodes.

use grappelli_model::Value;
use serde::{Deserialize, Serialize};

/// Aggregate functions applicable to a property projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateFunction {
	Sum,
	Avg,
	Min,
	Max,
}

impl AggregateFunction {
	pub fn name(self) -> &'static str {
		match self {
			AggregateFunction::Sum => "sum",
			AggregateFunction::Avg => "avg",
			AggregateFunction::Min => "min",
			AggregateFunction::Max => "max",
		}
	}
}

/// One entry of the projection list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Projection {
	/// Project a property (possibly across a joined association).
	Property { path: String, alias: Option<String> },
	/// Aggregate a property. Keyed in the grouping spec by the alias or,
	/// absent an alias, the property's own name.
	Aggregate {
		function: AggregateFunction,
		path: String,
		alias: Option<String>,
	},
	/// Count matching rows/documents.
	Count,
	/// Count distinct. `path: None` means distinct-of-root, which is
	/// treated identically to [`Projection::Count`]; a property path here
	/// is unsupported and fails compilation.
	CountDistinct { path: Option<String> },
	/// Project a compile-time constant.
	Literal { value: Value, alias: Option<String> },
	/// Project the entity identity under the dialect's reserved name.
	Id { alias: Option<String> },
}

impl Projection {
	pub fn property(path: impl Into<String>) -> Self {
		Projection::Property {
			path: path.into(),
			alias: None,
		}
	}

	pub fn aggregate(function: AggregateFunction, path: impl Into<String>) -> Self {
		Projection::Aggregate {
			function,
			path: path.into(),
			alias: None,
		}
	}

	pub fn count() -> Self {
		Projection::Count
	}

	pub fn count_distinct_root() -> Self {
		Projection::CountDistinct { path: None }
	}

	pub fn literal(value: impl Into<Value>) -> Self {
		Projection::Literal {
			value: value.into(),
			alias: None,
		}
	}

	pub fn id() -> Self {
		Projection::Id { alias: None }
	}

	/// Attach an output alias where the variant supports one.
	pub fn with_alias(self, alias: impl Into<String>) -> Self {
		let alias = Some(alias.into());
		match self {
			Projection::Property { path, .. } => Projection::Property { path, alias },
			Projection::Aggregate { function, path, .. } => Projection::Aggregate {
				function,
				path,
				alias,
			},
			Projection::Literal { value, .. } => Projection::Literal { value, alias },
			Projection::Id { .. } => Projection::Id { alias },
			other => other,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Projection::Property { .. } => "Property",
			Projection::Aggregate { .. } => "Aggregate",
			Projection::Count => "Count",
			Projection::CountDistinct { .. } => "CountDistinct",
			Projection::Literal { .. } => "Literal",
			Projection::Id { .. } => "Id",
		}
	}
}
