//! Pipeline compilation.

use bson::{doc, Bson, Document};
use grappelli_criteria::{
	CriteriaQuery, Criterion, Direction, Operand, Projection, UpdateSet,
};
use grappelli_model::{PersistentEntity, Value};
use tracing::{debug, trace};

use super::{ID_FIELD, PARAM_KEY};
use crate::artifact::{CompiledQuery, QueryArtifact};
use crate::binding::ParameterBinding;
use crate::error::{CompileError, CompileResult};
use crate::join::{JoinDirective, JoinResolver};
use crate::normalize::normalize;
use crate::state::{QueryState, ResolvedProperty};

/// Compiles criteria queries into aggregation pipelines.
///
/// A query whose pipeline reduces to a single `$match` stage is collapsed
/// to a bare filter document, so trivial lookups never pay the pipeline
/// envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentQueryBuilder;

impl DocumentQueryBuilder {
	pub fn new() -> Self {
		Self
	}

	/// Compile a find/aggregate.
	pub fn build_query(
		&self,
		entity: &PersistentEntity,
		query: &CriteriaQuery,
	) -> CompileResult<CompiledQuery> {
		debug!(entity = entity.name(), dialect = "document", "compiling find");
		if query.is_distinct() {
			return Err(CompileError::UnsupportedProjection {
				name: "Distinct".to_string(),
			});
		}
		let mut state = QueryState::new(entity, true);
		JoinResolver::resolve(query.joins(), &mut state)?;

		let mut stages: Vec<Document> = Vec::new();
		for directive in state.joins() {
			stages.extend(Self::lookup_stages(directive, state.root_alias())?);
		}

		let filter = match query.criterion() {
			Some(criterion) => {
				let normalized = normalize(entity, criterion)?;
				Some(self.lower(&normalized, &mut state)?)
			}
			None => None,
		};
		if let Some(filter) = filter {
			stages.push(doc! { "$match": filter });
		}

		stages.extend(self.projection_stages(entity, query, &state)?);

		if query.sort().is_sorted() {
			let mut sort = Document::new();
			for order in query.sort().orders() {
				let field = self.field(&state, order.path())?;
				sort.insert(
					field,
					match order.direction() {
						Direction::Asc => 1i32,
						Direction::Desc => -1i32,
					},
				);
			}
			stages.push(doc! { "$sort": sort });
		}
		if let Some(offset) = query.pageable().offset() {
			stages.push(doc! { "$skip": offset as i64 });
		}
		if let Some(limit) = query.pageable().limit() {
			stages.push(doc! { "$limit": limit as i64 });
		}

		// Fast path: a single match-only stage becomes a bare filter.
		let artifact = if stages.is_empty() {
			QueryArtifact::Filter(Document::new())
		} else if stages.len() == 1 && stages[0].contains_key("$match") {
			let mut only = stages.remove(0);
			let filter = only
				.remove("$match")
				.and_then(|b| b.as_document().cloned())
				.unwrap_or_default();
			QueryArtifact::Filter(filter)
		} else {
			QueryArtifact::Pipeline(stages)
		};
		Ok(Self::finish(artifact, state))
	}

	/// Compile an update: filter plus `$set` document. Joins are not
	/// permitted. Set entries are compiled before the filter so binding
	/// order matches marker order across the two documents.
	pub fn build_update(
		&self,
		entity: &PersistentEntity,
		query: &CriteriaQuery,
		update: &UpdateSet,
	) -> CompileResult<CompiledQuery> {
		debug!(entity = entity.name(), dialect = "document", "compiling update");
		if update.is_empty() {
			return Err(CompileError::invalid(
				"update requires at least one assignment",
			));
		}
		let mut state = QueryState::new(entity, false);
		JoinResolver::resolve(query.joins(), &mut state)?;

		let mut set = Document::new();
		for (path, operand) in update.entries() {
			let resolved = state.resolve_property(path)?;
			let field = Self::field_name(&state, &resolved);
			let marker = match operand {
				Operand::Value(value) => {
					let index =
						state.bind(Self::property_binding(&resolved).with_value(value.clone()));
					Self::marker(index)
				}
				Operand::Parameter(name) => {
					let index =
						state.bind(Self::property_binding(&resolved).with_name(name.clone()));
					Self::marker(index)
				}
				Operand::Property(_) => {
					return Err(CompileError::invalid(
						"update values cannot reference other properties",
					));
				}
			};
			set.insert(field, marker);
		}

		let mut version_check = None;
		if let Some(version) = entity.version_property() {
			if !update.contains(version.name()) {
				let index = state.bind(ParameterBinding::to_path(
					version.name(),
					version.data_type(),
				));
				state.require_parameter(version.name(), version.name());
				set.insert(version.field_name().to_string(), Self::marker(index));
				version_check = Some((version.clone(), index));
			}
		}

		let mut filter = match query.criterion() {
			Some(criterion) => {
				let normalized = normalize(entity, criterion)?;
				self.lower(&normalized, &mut state)?
			}
			None => Document::new(),
		};
		if let Some((version, new_value_index)) = version_check {
			let check = state.bind(
				ParameterBinding::to_path(version.name(), version.data_type())
					.previous_value_of(new_value_index),
			);
			let clause = doc! { version.field_name(): Self::marker(check) };
			filter = if filter.is_empty() {
				clause
			} else {
				doc! { "$and": [filter, clause] }
			};
		}

		Ok(Self::finish(
			QueryArtifact::DocumentUpdate {
				filter,
				update: doc! { "$set": set },
			},
			state,
		))
	}

	/// Compile a delete filter. Joins are not permitted.
	pub fn build_delete(
		&self,
		entity: &PersistentEntity,
		query: &CriteriaQuery,
	) -> CompileResult<CompiledQuery> {
		debug!(entity = entity.name(), dialect = "document", "compiling delete");
		let mut state = QueryState::new(entity, false);
		JoinResolver::resolve(query.joins(), &mut state)?;
		let filter = match query.criterion() {
			Some(criterion) => {
				let normalized = normalize(entity, criterion)?;
				self.lower(&normalized, &mut state)?
			}
			None => Document::new(),
		};
		Ok(Self::finish(QueryArtifact::Filter(filter), state))
	}

	fn finish(artifact: QueryArtifact, state: QueryState<'_>) -> CompiledQuery {
		let join_paths = state.join_paths();
		let required = state.required_parameters().clone();
		CompiledQuery::new(artifact, state.into_bindings(), required, join_paths)
	}

	// ---- joins ---------------------------------------------------------

	/// The `as` name of a lookup, derived from the join alias.
	fn lookup_name(alias: &str) -> &str {
		alias.trim_end_matches('_')
	}

	fn lookup_stages(directive: &JoinDirective, root_alias: &str) -> CompileResult<Vec<Document>> {
		let name = Self::lookup_name(&directive.alias).to_string();
		let target_table = directive.association.target().persisted_name();
		let mut stages = Vec::new();

		match &directive.junction {
			Some(junction) => {
				if junction.owner_keys.len() != 1 || junction.target_keys.len() != 1 {
					return Err(CompileError::invalid(format!(
						"association `{}` has composite junction keys, which the document dialect does not support",
						directive.association.name()
					)));
				}
				let junction_name = format!("{}_jt", name);
				stages.push(doc! {
					"$lookup": {
						"from": junction.table.clone(),
						"localField": Self::scoped(directive, root_alias, ID_FIELD),
						"foreignField": junction.owner_keys[0].clone(),
						"as": junction_name.clone(),
					}
				});
				stages.push(doc! {
					"$lookup": {
						"from": target_table,
						"localField": format!("{}.{}", junction_name, junction.target_keys[0]),
						"foreignField": ID_FIELD,
						"as": name.clone(),
					}
				});
			}
			None => {
				if directive.on_local.len() != 1 || directive.on_foreign.len() != 1 {
					return Err(CompileError::invalid(format!(
						"association `{}` has composite join keys, which the document dialect does not support",
						directive.association.name()
					)));
				}
				let local = &directive.on_local[0];
				let foreign = &directive.on_foreign[0];
				let local_field = if local.is_identity {
					ID_FIELD.to_string()
				} else {
					local.name.clone()
				};
				let foreign_field = if foreign.is_identity {
					ID_FIELD.to_string()
				} else {
					foreign.name.clone()
				};
				stages.push(doc! {
					"$lookup": {
						"from": target_table,
						"localField": Self::scoped(directive, root_alias, &local_field),
						"foreignField": foreign_field,
						"as": name.clone(),
					}
				});
			}
		}

		// Single-ended associations must not inflate document cardinality;
		// the unwind preserves documents with no match.
		if directive.flatten {
			stages.push(doc! {
				"$unwind": {
					"path": format!("${}", name),
					"preserveNullAndEmptyArrays": true,
				}
			});
		}
		Ok(stages)
	}

	/// Qualify a local field with the source lookup name, unless the
	/// directive hangs directly off the root collection.
	fn scoped(directive: &JoinDirective, root_alias: &str, field: &str) -> String {
		if directive.source_alias == root_alias {
			field.to_string()
		} else {
			format!(
				"{}.{}",
				Self::lookup_name(&directive.source_alias),
				field
			)
		}
	}

	// ---- predicate lowering -------------------------------------------

	fn lower(
		&self,
		criterion: &Criterion,
		state: &mut QueryState<'_>,
	) -> CompileResult<Document> {
		match criterion {
			Criterion::Equals { path, value } => self.equality(state, path, value, false),
			Criterion::NotEquals { path, value } => self.equality(state, path, value, true),
			Criterion::GreaterThan { path, value } => self.comparison(state, path, value, "$gt"),
			Criterion::GreaterThanEquals { path, value } => {
				self.comparison(state, path, value, "$gte")
			}
			Criterion::LessThan { path, value } => self.comparison(state, path, value, "$lt"),
			Criterion::LessThanEquals { path, value } => {
				self.comparison(state, path, value, "$lte")
			}
			Criterion::Between { path, from, to } => {
				let lower = self.comparison(state, path, from, "$gte")?;
				let upper = self.comparison(state, path, to, "$lte")?;
				Ok(doc! { "$and": [lower, upper] })
			}
			Criterion::In { path, values } => self.membership(state, path, values, "$in"),
			Criterion::NotIn { path, values } => self.membership(state, path, values, "$nin"),
			Criterion::StartsWith {
				path,
				value,
				ignore_case,
			} => self.pattern(state, path, value, Anchor::Start, *ignore_case),
			Criterion::EndsWith {
				path,
				value,
				ignore_case,
			} => self.pattern(state, path, value, Anchor::End, *ignore_case),
			Criterion::Contains {
				path,
				value,
				ignore_case,
			} => self.pattern(state, path, value, Anchor::None, *ignore_case),
			Criterion::Like {
				path,
				value,
				ignore_case,
			} => self.pattern(state, path, value, Anchor::Verbatim, *ignore_case),
			Criterion::Regex { path, pattern } => {
				// Constant pattern text is inlined, not bound.
				let field = self.field(state, path)?;
				Ok(doc! { field: { "$regex": pattern.clone() } })
			}
			Criterion::IsEmpty { path } => self.emptiness(state, path, false),
			Criterion::IsNotEmpty { path } => self.emptiness(state, path, true),
			Criterion::ArrayContains { path, value } => {
				let resolved = state.resolve_property(path)?;
				let field = Self::field_name(state, &resolved);
				let elements: Vec<Bson> = match value {
					Operand::Value(Value::Array(items)) => items
						.iter()
						.map(|item| {
							let index = state
								.bind(Self::property_binding(&resolved).with_value(item.clone()));
							Self::marker(index)
						})
						.collect(),
					Operand::Value(item) => {
						let index = state
							.bind(Self::property_binding(&resolved).with_value(item.clone()));
						vec![Self::marker(index)]
					}
					Operand::Parameter(name) => {
						let index = state.bind(
							Self::property_binding(&resolved)
								.with_name(name.clone())
								.expandable(),
						);
						return Ok(doc! { field: { "$all": Self::marker(index) } });
					}
					Operand::Property(_) => {
						return Err(CompileError::invalid(
							"array containment cannot reference another property",
						));
					}
				};
				Ok(doc! { field: { "$all": elements } })
			}

			Criterion::IsTrue { .. }
			| Criterion::IsFalse { .. }
			| Criterion::IsNull { .. }
			| Criterion::IsNotNull { .. }
			| Criterion::IdEquals { .. } => {
				let rewritten = normalize(state.root(), criterion)?;
				self.lower(&rewritten, state)
			}

			Criterion::Not(inner) => {
				let child = self.lower(inner, state)?;
				Self::negate(child)
			}
			Criterion::And(children) => {
				let docs = children
					.iter()
					.map(|c| self.lower(c, state))
					.collect::<CompileResult<Vec<_>>>()?;
				Ok(doc! { "$and": docs })
			}
			Criterion::Or(children) => {
				let docs = children
					.iter()
					.map(|c| self.lower(c, state))
					.collect::<CompileResult<Vec<_>>>()?;
				Ok(doc! { "$or": docs })
			}
		}
	}

	fn equality(
		&self,
		state: &mut QueryState<'_>,
		path: &str,
		value: &Operand,
		negated: bool,
	) -> CompileResult<Document> {
		let resolved = state.resolve_property(path)?;
		let field = Self::field_name(state, &resolved);
		match value {
			// Null means "absent or present-and-null"; not-null is the
			// exact negation of that disjunction.
			Operand::Value(Value::Null) => {
				if negated {
					Ok(doc! { "$and": [
						{ field.clone(): { "$exists": true } },
						{ field: { "$ne": Bson::Null } },
					] })
				} else {
					Ok(doc! { "$or": [
						{ field.clone(): { "$exists": false } },
						{ field: Bson::Null },
					] })
				}
			}
			Operand::Value(value) => {
				let index =
					state.bind(Self::property_binding(&resolved).with_value(value.clone()));
				if negated {
					Ok(doc! { field: { "$ne": Self::marker(index) } })
				} else {
					Ok(doc! { field: Self::marker(index) })
				}
			}
			Operand::Parameter(name) => {
				let index = state.bind(Self::property_binding(&resolved).with_name(name.clone()));
				if negated {
					Ok(doc! { field: { "$ne": Self::marker(index) } })
				} else {
					Ok(doc! { field: Self::marker(index) })
				}
			}
			Operand::Property(other) => {
				let left = self.expr_field(state, &resolved);
				let right_resolved = state.resolve_property(other)?;
				let right = self.expr_field(state, &right_resolved);
				let operator = if negated { "$ne" } else { "$eq" };
				Ok(doc! { "$expr": { operator: [left, right] } })
			}
		}
	}

	fn comparison(
		&self,
		state: &mut QueryState<'_>,
		path: &str,
		value: &Operand,
		operator: &str,
	) -> CompileResult<Document> {
		if matches!(value, Operand::Value(Value::Null)) {
			return Err(CompileError::invalid(format!(
				"cannot order-compare `{}` against null",
				path
			)));
		}
		let resolved = state.resolve_property(path)?;
		let field = Self::field_name(state, &resolved);
		match value {
			Operand::Value(value) => {
				let index =
					state.bind(Self::property_binding(&resolved).with_value(value.clone()));
				Ok(doc! { field: { operator: Self::marker(index) } })
			}
			Operand::Parameter(name) => {
				let index = state.bind(Self::property_binding(&resolved).with_name(name.clone()));
				Ok(doc! { field: { operator: Self::marker(index) } })
			}
			// Property-to-property comparisons use an aggregation
			// expression referencing both fields; no binding is produced.
			Operand::Property(other) => {
				let left = self.expr_field(state, &resolved);
				let right_resolved = state.resolve_property(other)?;
				let right = self.expr_field(state, &right_resolved);
				Ok(doc! { "$expr": { operator: [left, right] } })
			}
		}
	}

	fn membership(
		&self,
		state: &mut QueryState<'_>,
		path: &str,
		values: &Operand,
		operator: &str,
	) -> CompileResult<Document> {
		let resolved = state.resolve_property(path)?;
		let field = Self::field_name(state, &resolved);
		match values {
			Operand::Value(Value::Array(items)) => {
				if items.is_empty() {
					return Err(CompileError::invalid("IN requires at least one value"));
				}
				let markers: Vec<Bson> = items
					.iter()
					.map(|item| {
						let index = state
							.bind(Self::property_binding(&resolved).with_value(item.clone()));
						Self::marker(index)
					})
					.collect();
				Ok(doc! { field: { operator: markers } })
			}
			Operand::Parameter(name) => {
				let index = state.bind(
					Self::property_binding(&resolved)
						.with_name(name.clone())
						.expandable(),
				);
				Ok(doc! { field: { operator: Self::marker(index) } })
			}
			Operand::Value(_) => Err(CompileError::invalid("IN requires an array of values")),
			Operand::Property(_) => Err(CompileError::invalid(
				"IN cannot compare against another property",
			)),
		}
	}

	fn pattern(
		&self,
		state: &mut QueryState<'_>,
		path: &str,
		value: &Operand,
		anchor: Anchor,
		ignore_case: bool,
	) -> CompileResult<Document> {
		let resolved = state.resolve_property(path)?;
		let field = Self::field_name(state, &resolved);
		let regex: Bson = match value {
			Operand::Value(Value::String(text)) => {
				let pattern = anchor.apply(text);
				let index = state
					.bind(Self::property_binding(&resolved).with_value(Value::String(pattern)));
				Self::marker(index)
			}
			Operand::Parameter(name) => {
				let mut binding = Self::property_binding(&resolved).with_name(name.clone());
				if let Some(converter) = anchor.converter() {
					binding = binding.with_converter(converter);
				}
				Self::marker(state.bind(binding))
			}
			_ => {
				return Err(CompileError::invalid(
					"pattern criteria require a string value",
				));
			}
		};
		// The case flag travels as $options, never baked into the pattern.
		if ignore_case {
			Ok(doc! { field: { "$regex": regex, "$options": "i" } })
		} else {
			Ok(doc! { field: { "$regex": regex } })
		}
	}

	fn emptiness(
		&self,
		state: &mut QueryState<'_>,
		path: &str,
		negated: bool,
	) -> CompileResult<Document> {
		let resolved = state.resolve_property(path)?;
		if !resolved.property.data_type().is_string_like() {
			return Err(CompileError::UnsupportedCriterion {
				name: if negated { "IsNotEmpty" } else { "IsEmpty" },
			});
		}
		let field = Self::field_name(state, &resolved);
		if negated {
			// Exact negation of (absent OR null OR empty string).
			Ok(doc! { "$and": [
				{ field.clone(): { "$exists": true } },
				{ field.clone(): { "$ne": Bson::Null } },
				{ field: { "$ne": "" } },
			] })
		} else {
			Ok(doc! { "$or": [
				{ field.clone(): { "$exists": false } },
				{ field.clone(): Bson::Null },
				{ field: "" },
			] })
		}
	}

	/// Negate a compiled clause. Only a clause that resolved to exactly
	/// one key can be negated.
	fn negate(child: Document) -> CompileResult<Document> {
		if child.len() != 1 {
			return Err(CompileError::invalid(
				"negation must resolve to exactly one clause",
			));
		}
		let (key, value) = child.into_iter().next().ok_or_else(|| {
			CompileError::invalid("negation must resolve to exactly one clause")
		})?;
		if key.starts_with('$') {
			return Err(CompileError::invalid(
				"negation must resolve to exactly one clause",
			));
		}
		match value {
			Bson::Document(operator_doc) => Ok(doc! { key: { "$not": operator_doc } }),
			plain => Ok(doc! { key: { "$ne": plain } }),
		}
	}

	// ---- projections ---------------------------------------------------

	fn projection_stages(
		&self,
		entity: &PersistentEntity,
		query: &CriteriaQuery,
		state: &QueryState<'_>,
	) -> CompileResult<Vec<Document>> {
		let projections = query.projections();
		if projections.is_empty() {
			return Ok(Vec::new());
		}

		let count_like = projections
			.iter()
			.filter(|p| matches!(p, Projection::Count | Projection::CountDistinct { path: None }))
			.count();
		if count_like > 0 {
			if projections.len() > count_like {
				return Err(CompileError::UnsupportedProjection {
					name: "Count combined with other projections".to_string(),
				});
			}
			// Count-distinct-of-root is deliberately identical to count.
			return Ok(vec![doc! { "$count": "total" }]);
		}

		let mut group = Document::new();
		let mut project = Document::new();
		for projection in projections {
			match projection {
				Projection::Property { path, alias } => {
					if let Some(grappelli_model::PathResolution::Association(_)) =
						entity.resolve_any(path)
					{
						match state.alias_for(path) {
							Some(join_alias) => {
								project.insert(
									Self::lookup_name(join_alias).to_string(),
									Bson::Int32(1),
								);
							}
							None => {
								// Compatibility wart: dropped, not an error.
								trace!(path = %path, "dropping unjoined association projection");
							}
						}
						continue;
					}
					let field = self.field(state, path)?;
					match alias {
						Some(alias) => {
							project
								.insert(alias.clone(), Bson::String(format!("${}", field)));
						}
						None => {
							project.insert(field, Bson::Int32(1));
						}
					}
				}
				Projection::Aggregate {
					function,
					path,
					alias,
				} => {
					let resolved = state.resolve_property(path)?;
					let field = Self::field_name(state, &resolved);
					let key = alias
						.clone()
						.unwrap_or_else(|| resolved.property.name().to_string());
					group.insert(
						key,
						doc! { format!("${}", function.name()): format!("${}", field) },
					);
				}
				Projection::Count | Projection::CountDistinct { path: None } => {}
				Projection::CountDistinct { path: Some(path) } => {
					return Err(CompileError::UnsupportedProjection {
						name: format!("count distinct on property `{}`", path),
					});
				}
				Projection::Literal { value, alias } => {
					let key = alias.clone().unwrap_or_else(|| "literal".to_string());
					project.insert(key, doc! { "$literal": Self::bson_value(value) });
				}
				Projection::Id { alias } => match alias {
					Some(alias) => {
						project.insert(alias.clone(), Bson::String(format!("${}", ID_FIELD)));
					}
					None => {
						project.insert(ID_FIELD.to_string(), Bson::Int32(1));
					}
				},
			}
		}

		if !group.is_empty() {
			if !project.is_empty() {
				return Err(CompileError::UnsupportedProjection {
					name: "Property combined with Aggregate in the pipeline dialect".to_string(),
				});
			}
			let mut stage = doc! { "_id": Bson::Null };
			stage.extend(group);
			return Ok(vec![doc! { "$group": stage }]);
		}
		if project.is_empty() {
			return Ok(Vec::new());
		}
		Ok(vec![doc! { "$project": project }])
	}

	// ---- field addressing ---------------------------------------------

	fn field(&self, state: &QueryState<'_>, path: &str) -> CompileResult<String> {
		let resolved = state.resolve_property(path)?;
		Ok(Self::field_name(state, &resolved))
	}

	/// The emitted document field path: embedded segments joined with
	/// dots, prefixed by the lookup name for joined associations, with the
	/// reserved identity name substituted for identity properties.
	fn field_name(state: &QueryState<'_>, resolved: &ResolvedProperty) -> String {
		let mut segments = resolved.field_segments.clone();
		if resolved.property.is_identity() {
			if let Some(last) = segments.last_mut() {
				*last = ID_FIELD.to_string();
			}
		}
		let joined = segments.join(".");
		if resolved.alias == state.root_alias() {
			joined
		} else {
			format!("{}.{}", Self::lookup_name(&resolved.alias), joined)
		}
	}

	fn expr_field(&self, state: &QueryState<'_>, resolved: &ResolvedProperty) -> String {
		format!("${}", Self::field_name(state, resolved))
	}

	fn property_binding(resolved: &ResolvedProperty) -> ParameterBinding {
		let mut binding =
			ParameterBinding::to_path(resolved.path.clone(), resolved.property.data_type());
		if let Some(converter) = resolved.property.converter() {
			binding = binding.with_converter(converter);
		}
		binding
	}

	fn marker(index: usize) -> Bson {
		Bson::Document(doc! { PARAM_KEY: index as i64 })
	}

	fn bson_value(value: &Value) -> Bson {
		match value {
			Value::String(text) => Bson::String(text.clone()),
			Value::Int(number) => Bson::Int64(*number),
			Value::Float(number) => Bson::Double(*number),
			Value::Bool(flag) => Bson::Boolean(*flag),
			Value::Null => Bson::Null,
			Value::Array(items) => {
				Bson::Array(items.iter().map(Self::bson_value).collect())
			}
		}
	}
}

/// Anchoring applied to pattern criteria.
enum Anchor {
	Start,
	End,
	None,
	/// The text is already a pattern; taken verbatim.
	Verbatim,
}

impl Anchor {
	/// Build the regex source: escaped text with the start anchor iff
	/// starts-with and the end anchor iff ends-with.
	fn apply(&self, text: &str) -> String {
		match self {
			Anchor::Start => format!("^{}", regex::escape(text)),
			Anchor::End => format!("{}$", regex::escape(text)),
			Anchor::None => regex::escape(text),
			Anchor::Verbatim => text.to_string(),
		}
	}

	fn converter(&self) -> Option<&'static str> {
		match self {
			Anchor::Start => Some("pattern:starts-with"),
			Anchor::End => Some("pattern:ends-with"),
			Anchor::None => Some("pattern:contains"),
			Anchor::Verbatim => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn anchors_follow_the_criterion_kind() {
		assert_eq!(Anchor::Start.apply("A"), "^A");
		assert_eq!(Anchor::End.apply("A"), "A$");
		assert_eq!(Anchor::None.apply("A"), "A");
		assert_eq!(Anchor::Start.apply("a.b"), "^a\\.b");
	}

	#[test]
	fn negate_requires_single_field_clause() {
		let err = DocumentQueryBuilder::negate(doc! {
			"$or": [ { "a": 1 }, { "b": 2 } ]
		});
		assert!(err.is_err());

		let negated = DocumentQueryBuilder::negate(doc! { "age": { "$gt": 5 } }).unwrap();
		assert_eq!(negated, doc! { "age": { "$not": { "$gt": 5 } } });

		let negated = DocumentQueryBuilder::negate(doc! { "age": 5 }).unwrap();
		assert_eq!(negated, doc! { "age": { "$ne": 5 } });
	}
}
