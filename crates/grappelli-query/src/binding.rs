//! Parameter bindings.
//!
//! Every value-producing criterion defers its value to run time through a
//! [`ParameterBinding`]. Bindings are indexed in the order they are pushed
//! during compilation, and that order is by construction the order their
//! placeholders appear in the emitted text or document — the execution
//! layer binds values strictly by this list.

use grappelli_model::{DataType, Value};
use serde::{Deserialize, Serialize};

/// What a binding points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BindingTarget {
	/// A property path on the root entity graph.
	Path(String),
	/// A raw positional slot with no property backing (raw pass-through
	/// queries).
	Slot(usize),
}

/// A deferred value reference resolved by the execution layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBinding {
	index: usize,
	target: BindingTarget,
	data_type: DataType,
	converter: Option<String>,
	/// Named runtime input, when the operand was a named parameter.
	name: Option<String>,
	/// Inline literal, when the value was known at compile time.
	value: Option<Value>,
	/// Index of an earlier binding whose property's *previous* value must
	/// be supplied here (optimistic-lock version checks).
	previous_value_of: Option<usize>,
	/// The runtime value is a collection and the execution layer must
	/// expand this one placeholder into N.
	expandable: bool,
}

impl ParameterBinding {
	pub fn new(target: BindingTarget, data_type: DataType) -> Self {
		Self {
			index: 0,
			target,
			data_type,
			converter: None,
			name: None,
			value: None,
			previous_value_of: None,
			expandable: false,
		}
	}

	pub fn to_path(path: impl Into<String>, data_type: DataType) -> Self {
		Self::new(BindingTarget::Path(path.into()), data_type)
	}

	pub fn with_converter(mut self, converter: impl Into<String>) -> Self {
		self.converter = Some(converter.into());
		self
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_value(mut self, value: Value) -> Self {
		self.value = Some(value);
		self
	}

	pub fn previous_value_of(mut self, index: usize) -> Self {
		self.previous_value_of = Some(index);
		self
	}

	pub fn expandable(mut self) -> Self {
		self.expandable = true;
		self
	}

	pub(crate) fn assign_index(&mut self, index: usize) {
		self.index = index;
	}

	pub fn index(&self) -> usize {
		self.index
	}

	pub fn target(&self) -> &BindingTarget {
		&self.target
	}

	pub fn data_type(&self) -> DataType {
		self.data_type
	}

	pub fn converter(&self) -> Option<&str> {
		self.converter.as_deref()
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn value(&self) -> Option<&Value> {
		self.value.as_ref()
	}

	pub fn previous_value(&self) -> Option<usize> {
		self.previous_value_of
	}

	pub fn is_expandable(&self) -> bool {
		self.expandable
	}
}
