//! Compiled query artifacts.

use bson::Document;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::binding::ParameterBinding;

/// The dialect-specific output of a compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryArtifact {
	/// A SQL-family statement with positional placeholders in binding
	/// order.
	Sql { query: String },
	/// A SQL-family update: the full statement plus the bare set clause,
	/// kept separately for execution layers that stitch their own
	/// statement text.
	SqlUpdate { query: String, set_clause: String },
	/// A bare filter document — the fast path for pipelines that consist
	/// of exactly one match stage.
	Filter(Document),
	/// An ordered aggregation pipeline.
	Pipeline(Vec<Document>),
	/// A document-dialect update: filter plus update document.
	DocumentUpdate { filter: Document, update: Document },
	/// A pre-built query passed through untouched.
	Raw { query: String },
}

/// The full result of one compile call: the artifact, the ordered
/// parameter bindings, any named parameters the execution layer must
/// supply out-of-band, and the set of association paths the resolver
/// satisfied (used downstream to demultiplex fetched rows/documents).
///
/// Compiled queries are immutable; once built they may be cached and
/// shared freely across threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
	artifact: QueryArtifact,
	bindings: Vec<ParameterBinding>,
	required_parameters: IndexMap<String, String>,
	join_paths: Vec<String>,
}

impl CompiledQuery {
	pub(crate) fn new(
		artifact: QueryArtifact,
		bindings: Vec<ParameterBinding>,
		required_parameters: IndexMap<String, String>,
		join_paths: Vec<String>,
	) -> Self {
		Self {
			artifact,
			bindings,
			required_parameters,
			join_paths,
		}
	}

	/// Wrap a pre-built query string for pass-through execution, with
	/// externally supplied bindings.
	pub fn raw(query: impl Into<String>, bindings: Vec<ParameterBinding>) -> Self {
		let mut bindings = bindings;
		for (index, binding) in bindings.iter_mut().enumerate() {
			binding.assign_index(index);
		}
		Self {
			artifact: QueryArtifact::Raw {
				query: query.into(),
			},
			bindings,
			required_parameters: IndexMap::new(),
			join_paths: Vec::new(),
		}
	}

	pub fn artifact(&self) -> &QueryArtifact {
		&self.artifact
	}

	pub fn bindings(&self) -> &[ParameterBinding] {
		&self.bindings
	}

	pub fn required_parameters(&self) -> &IndexMap<String, String> {
		&self.required_parameters
	}

	pub fn join_paths(&self) -> &[String] {
		&self.join_paths
	}

	/// The statement text for SQL-family and raw artifacts.
	pub fn query_text(&self) -> Option<&str> {
		match &self.artifact {
			QueryArtifact::Sql { query }
			| QueryArtifact::SqlUpdate { query, .. }
			| QueryArtifact::Raw { query } => Some(query),
			_ => None,
		}
	}
}
