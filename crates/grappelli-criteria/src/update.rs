//! Update property maps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::criterion::Operand;

/// The ordered property → value map of an update operation.
///
/// Entry order is the order values are pushed through the parameter binding
/// registry, so it is also the placeholder order in the emitted set clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateSet {
	entries: IndexMap<String, Operand>,
}

impl UpdateSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set(mut self, path: impl Into<String>, value: impl Into<Operand>) -> Self {
		self.entries.insert(path.into(), value.into());
		self
	}

	pub fn entries(&self) -> impl Iterator<Item = (&str, &Operand)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn contains(&self, path: &str) -> bool {
		self.entries.contains_key(path)
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}
}
