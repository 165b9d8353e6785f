//! Explicit join requests.

use serde::{Deserialize, Serialize};

/// Requested join semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JoinKind {
	/// Join for filtering/sorting only.
	#[default]
	Default,
	/// Join and also fetch the associated entity into the result.
	Fetch,
}

/// A dotted association path the caller wants joined, with optional alias
/// override. Distinct join paths may share a prefix; the resolver reuses
/// the prefix alias instead of re-joining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinPath {
	path: String,
	kind: JoinKind,
	alias: Option<String>,
}

impl JoinPath {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			kind: JoinKind::Default,
			alias: None,
		}
	}

	pub fn fetch(mut self) -> Self {
		self.kind = JoinKind::Fetch;
		self
	}

	pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
		self.alias = Some(alias.into());
		self
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn kind(&self) -> JoinKind {
		self.kind
	}

	pub fn alias(&self) -> Option<&str> {
		self.alias.as_deref()
	}
}

impl From<&str> for JoinPath {
	fn from(path: &str) -> Self {
		JoinPath::new(path)
	}
}
