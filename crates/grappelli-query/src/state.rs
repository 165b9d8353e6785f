//! Compilation-scoped mutable state.

use grappelli_model::{PersistentEntity, PersistentProperty};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::binding::ParameterBinding;
use crate::error::{CompileError, CompileResult};
use crate::join::JoinDirective;

/// A property reference resolved against the current alias table.
///
/// `field_segments` is the flattened field chain: the persisted names of
/// any embedded associations crossed after the last join point, then the
/// terminal property's persisted name. Dialects join the segments with
/// their own separator (`_` for SQL columns, `.` for document fields).
#[derive(Debug, Clone)]
pub struct ResolvedProperty {
	pub alias: String,
	pub field_segments: SmallVec<[String; 2]>,
	pub property: PersistentProperty,
	/// Dotted path as written in the criteria model.
	pub path: String,
}

/// Mutable context owned by exactly one compile call.
///
/// Created once per compile, threaded by `&mut` through the join resolver
/// and the predicate/projection compilers, and discarded once the artifact
/// is assembled. Never shared across concurrent compiles.
#[derive(Debug)]
pub struct QueryState<'a> {
	root: &'a PersistentEntity,
	root_alias: String,
	joins_allowed: bool,
	/// Association path → alias, insertion-ordered so emitted joins are
	/// deterministic.
	aliases: IndexMap<String, String>,
	joins: Vec<JoinDirective>,
	bindings: Vec<ParameterBinding>,
	/// Additional named parameters the execution layer must supply
	/// out-of-band (auto-populated update fields), name → property path.
	required_parameters: IndexMap<String, String>,
}

impl<'a> QueryState<'a> {
	pub fn new(root: &'a PersistentEntity, joins_allowed: bool) -> Self {
		Self {
			root,
			root_alias: format!("{}_", root.persisted_name()),
			joins_allowed,
			aliases: IndexMap::new(),
			joins: Vec::new(),
			bindings: Vec::new(),
			required_parameters: IndexMap::new(),
		}
	}

	pub fn root(&self) -> &'a PersistentEntity {
		self.root
	}

	pub fn root_alias(&self) -> &str {
		&self.root_alias
	}

	pub fn joins_allowed(&self) -> bool {
		self.joins_allowed
	}

	pub fn alias_for(&self, association_path: &str) -> Option<&str> {
		self.aliases.get(association_path).map(String::as_str)
	}

	pub(crate) fn record_join(&mut self, path: String, alias: String, directive: JoinDirective) {
		self.aliases.insert(path, alias);
		self.joins.push(directive);
	}

	pub fn joins(&self) -> &[JoinDirective] {
		&self.joins
	}

	/// The set of association paths satisfied by resolved joins.
	pub fn join_paths(&self) -> Vec<String> {
		self.aliases.keys().cloned().collect()
	}

	/// Push a binding, assigning the next parameter position.
	pub fn bind(&mut self, mut binding: ParameterBinding) -> usize {
		let index = self.bindings.len();
		binding.assign_index(index);
		trace!(index, target = ?binding.target(), "allocated parameter binding");
		self.bindings.push(binding);
		index
	}

	pub fn bindings(&self) -> &[ParameterBinding] {
		&self.bindings
	}

	pub fn into_bindings(self) -> Vec<ParameterBinding> {
		self.bindings
	}

	pub fn require_parameter(&mut self, name: impl Into<String>, path: impl Into<String>) {
		self.required_parameters.insert(name.into(), path.into());
	}

	pub fn required_parameters(&self) -> &IndexMap<String, String> {
		&self.required_parameters
	}

	/// Resolve a dotted property path against the root entity and the
	/// established joins.
	///
	/// Embedded associations never need a join; their persisted names
	/// become leading field segments. Any other association crossed by the
	/// path must already be satisfied by the join resolver — referencing an
	/// unjoined path is a hard error, and when joins are disallowed
	/// altogether (UPDATE/DELETE) the error says so instead.
	pub fn resolve_property(&self, path: &str) -> CompileResult<ResolvedProperty> {
		let resolved = self
			.root
			.resolve_path(path)
			.ok_or_else(|| CompileError::unresolvable(self.root.name(), path))?;

		let mut alias = self.root_alias.clone();
		let mut field_segments: SmallVec<[String; 2]> = SmallVec::new();
		let mut cumulative = String::new();

		for association in resolved.associations() {
			if !cumulative.is_empty() {
				cumulative.push('.');
			}
			cumulative.push_str(association.name());

			if association.kind().is_embedded() {
				field_segments.push(association.name().to_string());
				continue;
			}
			match self.aliases.get(&cumulative) {
				Some(join_alias) => {
					alias = join_alias.clone();
					// A join point restarts the flattened field chain.
					field_segments.clear();
				}
				None if self.joins_allowed => {
					return Err(CompileError::PathNotJoined {
						path: path.to_string(),
					});
				}
				None => {
					return Err(CompileError::JoinsNotPermitted {
						path: path.to_string(),
					});
				}
			}
		}

		field_segments.push(resolved.property().field_name().to_string());
		Ok(ResolvedProperty {
			alias,
			field_segments,
			property: resolved.property().clone(),
			path: path.to_string(),
		})
	}
}
