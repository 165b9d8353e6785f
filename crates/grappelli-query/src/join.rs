//! Join resolution.
//!
//! The resolver turns requested association paths into dialect-neutral
//! [`JoinDirective`]s and fills the compile state's alias table. Paths are
//! processed shortest-first so a prefix is always established before any
//! path extending it, and every cumulative sub-path is memoized — a path
//! that extends an already-joined prefix continues from that join point
//! instead of restarting at the root.

use grappelli_model::{Association, PersistentEntity};
use grappelli_criteria::{JoinKind, JoinPath};
use tracing::trace;

use crate::error::{CompileError, CompileResult};
use crate::state::QueryState;

/// One side of a join condition.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinField {
	pub name: String,
	/// True when the field is the identity of its entity; the document
	/// dialect substitutes its reserved identity name.
	pub is_identity: bool,
}

impl JoinField {
	fn identity(name: &str) -> Self {
		Self {
			name: name.to_string(),
			is_identity: true,
		}
	}

	fn plain(name: String) -> Self {
		Self {
			name,
			is_identity: false,
		}
	}
}

/// The two-hop junction construct for many-to-many and
/// foreign-key-without-inverse associations: first hop to the junction
/// keyed by the owner identity, second hop from the junction to the target
/// keyed by the target identity. A single-hop join is never correct here.
#[derive(Debug, Clone)]
pub struct JunctionJoin {
	pub table: String,
	pub alias: String,
	/// Key columns on the junction pointing back at the owner.
	pub owner_keys: Vec<String>,
	/// Key columns on the junction pointing at the target.
	pub target_keys: Vec<String>,
	/// Identity fields on the owner side, parallel to `owner_keys`.
	pub owner_id_fields: Vec<JoinField>,
	/// Identity fields on the target side, parallel to `target_keys`.
	pub target_id_fields: Vec<JoinField>,
}

/// A resolved join, sufficient for any dialect to emit its construct.
#[derive(Debug, Clone)]
pub struct JoinDirective {
	/// Full dotted association path from the root.
	pub path: String,
	pub alias: String,
	/// Alias of the join point this directive extends (the root alias for
	/// first-level joins).
	pub source_alias: String,
	pub association: Association,
	pub kind: JoinKind,
	/// Condition fields on the source side; empty when `junction` is set.
	pub on_local: Vec<JoinField>,
	/// Condition fields on the target side; empty when `junction` is set.
	pub on_foreign: Vec<JoinField>,
	pub junction: Option<JunctionJoin>,
	/// Single-ended associations must not inflate row/document cardinality;
	/// dialects emit a null-preserving flatten for these.
	pub flatten: bool,
}

/// Resolves requested join paths into directives on the compile state.
pub struct JoinResolver;

impl JoinResolver {
	pub fn resolve(requested: &[JoinPath], state: &mut QueryState<'_>) -> CompileResult<()> {
		// Shortest-first, then lexical: guarantees a prefix is processed
		// before any path that extends it.
		let mut ordered: Vec<&JoinPath> = requested.iter().collect();
		ordered.sort_by(|a, b| {
			a.path()
				.len()
				.cmp(&b.path().len())
				.then_with(|| a.path().cmp(b.path()))
		});

		for join in ordered {
			if !state.joins_allowed() {
				return Err(CompileError::JoinsNotPermitted {
					path: join.path().to_string(),
				});
			}
			Self::resolve_one(join, state)?;
		}
		Ok(())
	}

	fn resolve_one(join: &JoinPath, state: &mut QueryState<'_>) -> CompileResult<()> {
		let root = state.root();
		let associations = root
			.resolve_association_path(join.path())
			.ok_or_else(|| CompileError::unresolvable(root.name(), join.path()))?;

		let mut source_alias = state.root_alias().to_string();
		let mut owner: &PersistentEntity = root;
		let mut cumulative = String::new();
		let last = associations.len() - 1;

		for (position, association) in associations.iter().enumerate() {
			if !cumulative.is_empty() {
				cumulative.push('.');
			}
			cumulative.push_str(association.name());

			// Embedded values live in the parent's field namespace.
			if association.kind().is_embedded() {
				owner = association.target();
				continue;
			}

			if let Some(existing) = state.alias_for(&cumulative) {
				source_alias = existing.to_string();
				owner = association.target();
				continue;
			}

			let terminal = position == last;
			let alias = match (terminal, join.alias()) {
				(true, Some(alias)) => alias.to_string(),
				_ => child_alias(&source_alias, association.name()),
			};
			let kind = if terminal { join.kind() } else { JoinKind::Default };

			let directive = Self::directive(
				owner,
				association,
				&cumulative,
				&alias,
				&source_alias,
				kind,
			)?;
			trace!(
				path = %cumulative,
				alias = %alias,
				source = %source_alias,
				junction = directive.junction.is_some(),
				"established join"
			);
			state.record_join(cumulative.clone(), alias.clone(), directive);

			source_alias = alias;
			owner = association.target();
		}
		Ok(())
	}

	fn directive(
		owner: &PersistentEntity,
		association: &Association,
		path: &str,
		alias: &str,
		source_alias: &str,
		kind: JoinKind,
	) -> CompileResult<JoinDirective> {
		let flatten = association.kind().is_single_ended();
		if association.requires_junction() {
			let junction = Self::junction(owner, association, alias)?;
			return Ok(JoinDirective {
				path: path.to_string(),
				alias: alias.to_string(),
				source_alias: source_alias.to_string(),
				association: association.clone(),
				kind,
				on_local: Vec::new(),
				on_foreign: Vec::new(),
				junction: Some(junction),
				flatten,
			});
		}

		let (on_local, on_foreign) = Self::join_condition(owner, association)?;
		Ok(JoinDirective {
			path: path.to_string(),
			alias: alias.to_string(),
			source_alias: source_alias.to_string(),
			association: association.clone(),
			kind,
			on_local,
			on_foreign,
			junction: None,
			flatten,
		})
	}

	/// Compute the single-hop join condition between owner and target.
	fn join_condition(
		owner: &PersistentEntity,
		association: &Association,
	) -> CompileResult<(Vec<JoinField>, Vec<JoinField>)> {
		let target = association.target();
		if association.is_foreign_key() {
			// Key columns live on the target side, named after the mapped
			// inverse association.
			let inverse = association.inverse_name().ok_or_else(|| {
				CompileError::invalid(format!(
					"foreign-key association `{}` has no inverse and no junction",
					association.name()
				))
			})?;
			let local: Vec<JoinField> = owner
				.identity_properties()
				.iter()
				.map(|p| JoinField::identity(p.field_name()))
				.collect();
			let foreign = Self::keyed_fields(
				association,
				association.explicit_foreign_key_fields(),
				owner,
				inverse,
			)?;
			Self::check_counts(association, &local, &foreign)?;
			Ok((local, foreign))
		} else {
			// Key columns live on the owner, named after the association.
			let local = Self::keyed_fields(
				association,
				association.explicit_local_key_fields(),
				target,
				association.name(),
			)?;
			let foreign: Vec<JoinField> = target
				.identity_properties()
				.iter()
				.map(|p| JoinField::identity(p.field_name()))
				.collect();
			Self::check_counts(association, &local, &foreign)?;
			Ok((local, foreign))
		}
	}

	/// Default key columns `{prefix}_{identity field}` for each identity
	/// property of `keyed`, unless explicitly overridden.
	fn keyed_fields(
		association: &Association,
		explicit: &[String],
		keyed: &PersistentEntity,
		prefix: &str,
	) -> CompileResult<Vec<JoinField>> {
		if !explicit.is_empty() {
			return Ok(explicit
				.iter()
				.map(|f| JoinField::plain(f.clone()))
				.collect());
		}
		let identity = keyed.identity_properties();
		if identity.is_empty() {
			return Err(CompileError::invalid(format!(
				"entity `{}` referenced by association `{}` has no identity",
				keyed.name(),
				association.name()
			)));
		}
		Ok(identity
			.iter()
			.map(|p| JoinField::plain(format!("{}_{}", prefix, p.field_name())))
			.collect())
	}

	fn check_counts(
		association: &Association,
		local: &[JoinField],
		foreign: &[JoinField],
	) -> CompileResult<()> {
		if local.len() != foreign.len() {
			return Err(CompileError::JoinFieldMismatch {
				association: association.name().to_string(),
				local_count: local.len(),
				foreign_count: foreign.len(),
				local: local.iter().map(|f| f.name.clone()).collect(),
				foreign: foreign.iter().map(|f| f.name.clone()).collect(),
			});
		}
		Ok(())
	}

	fn junction(
		owner: &PersistentEntity,
		association: &Association,
		alias: &str,
	) -> CompileResult<JunctionJoin> {
		let target = association.target();
		let owner_id: Vec<JoinField> = owner
			.identity_properties()
			.iter()
			.map(|p| JoinField::identity(p.field_name()))
			.collect();
		let target_id: Vec<JoinField> = target
			.identity_properties()
			.iter()
			.map(|p| JoinField::identity(p.field_name()))
			.collect();

		let owner_keys: Vec<String> = if association.explicit_local_key_fields().is_empty() {
			owner_id
				.iter()
				.map(|f| format!("{}_{}", owner.persisted_name(), f.name))
				.collect()
		} else {
			association.explicit_local_key_fields().to_vec()
		};
		let target_keys: Vec<String> = if association.explicit_foreign_key_fields().is_empty() {
			target_id
				.iter()
				.map(|f| format!("{}_{}", target.persisted_name(), f.name))
				.collect()
		} else {
			association.explicit_foreign_key_fields().to_vec()
		};

		if owner_keys.len() != owner_id.len() || target_keys.len() != target_id.len() {
			return Err(CompileError::JoinFieldMismatch {
				association: association.name().to_string(),
				local_count: owner_keys.len(),
				foreign_count: target_keys.len(),
				local: owner_keys,
				foreign: target_keys,
			});
		}

		let table = association
			.explicit_junction_name()
			.map(str::to_string)
			.unwrap_or_else(|| format!("{}_{}", owner.persisted_name(), association.name()));
		Ok(JunctionJoin {
			table,
			alias: format!("{}jt_", alias),
			owner_keys,
			target_keys,
			owner_id_fields: owner_id,
			target_id_fields: target_id,
		})
	}
}

/// Derive a deterministic child alias from an established parent alias.
fn child_alias(source_alias: &str, segment: &str) -> String {
	if source_alias.ends_with('_') {
		format!("{}{}_", source_alias, segment)
	} else {
		format!("{}_{}_", source_alias, segment)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn child_alias_extends_parent() {
		assert_eq!(child_alias("person_", "author"), "person_author_");
		assert_eq!(child_alias("x", "publisher"), "x_publisher_");
	}
}
