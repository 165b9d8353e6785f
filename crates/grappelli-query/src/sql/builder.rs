//! The generic SQL-family query builder.

use grappelli_criteria::{
	AggregateFunction, CriteriaQuery, Criterion, Direction, JoinKind, Operand, Projection,
	UpdateSet,
};
use grappelli_model::{PathResolution, PersistentEntity, Value};
use tracing::{debug, trace};

use super::clause::{CompareOp, SqlClause, SqlExpr};
use super::dialect::SqlDialect;
use crate::artifact::{CompiledQuery, QueryArtifact};
use crate::binding::ParameterBinding;
use crate::error::{CompileError, CompileResult};
use crate::join::{JoinDirective, JoinResolver};
use crate::normalize::normalize;
use crate::state::{QueryState, ResolvedProperty};

/// Compiles criteria queries into SQL statements for any [`SqlDialect`].
///
/// # Examples
///
/// ```
/// use grappelli_criteria::{CriteriaQuery, Criterion};
/// use grappelli_model::{DataType, PersistentEntity, PersistentProperty};
/// use grappelli_query::sql::{AnsiSqlDialect, SqlQueryBuilder};
///
/// let person = PersistentEntity::builder("Person")
///     .property(PersistentProperty::new("id", DataType::Long).identity())
///     .property(PersistentProperty::new("age", DataType::Integer))
///     .build();
/// let builder = SqlQueryBuilder::new(AnsiSqlDialect);
/// let compiled = builder
///     .build_query(&person, &CriteriaQuery::new().filter(Criterion::gt("age", 18)))
///     .unwrap();
/// assert_eq!(
///     compiled.query_text().unwrap(),
///     "SELECT person_.id, person_.age FROM person person_ WHERE person_.age > ?"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SqlQueryBuilder<D: SqlDialect> {
	dialect: D,
}

enum PatternKind {
	StartsWith,
	EndsWith,
	Contains,
	Like,
}

impl PatternKind {
	fn converter(&self) -> Option<&'static str> {
		match self {
			PatternKind::StartsWith => Some("pattern:starts-with"),
			PatternKind::EndsWith => Some("pattern:ends-with"),
			PatternKind::Contains => Some("pattern:contains"),
			PatternKind::Like => None,
		}
	}
}

struct SelectParts {
	list: Vec<String>,
	group_by: Vec<String>,
}

impl<D: SqlDialect> SqlQueryBuilder<D> {
	pub fn new(dialect: D) -> Self {
		Self { dialect }
	}

	pub fn dialect(&self) -> &D {
		&self.dialect
	}

	/// Compile a SELECT.
	pub fn build_query(
		&self,
		entity: &PersistentEntity,
		query: &CriteriaQuery,
	) -> CompileResult<CompiledQuery> {
		debug!(
			entity = entity.name(),
			dialect = self.dialect.name(),
			"compiling select"
		);
		let mut state = QueryState::new(entity, true);
		JoinResolver::resolve(query.joins(), &mut state)?;

		let predicate = match query.criterion() {
			Some(criterion) => {
				let normalized = normalize(entity, criterion)?;
				Some(self.lower(&normalized, &mut state, true)?)
			}
			None => None,
		};
		let parts = self.compile_projections(entity, query, &state)?;
		let order_by = self.compile_sort(query, &state)?;

		let mut sql = String::from("SELECT ");
		if query.is_distinct() {
			sql.push_str("DISTINCT ");
		}
		sql.push_str(&parts.list.join(", "));
		sql.push_str(" FROM ");
		sql.push_str(entity.persisted_name());
		sql.push(' ');
		sql.push_str(state.root_alias());
		for directive in state.joins() {
			sql.push_str(&self.join_sql(directive));
		}
		if let Some(clause) = &predicate {
			sql.push_str(" WHERE ");
			clause.render(&self.dialect, &mut sql);
		}
		if !parts.group_by.is_empty() {
			sql.push_str(" GROUP BY ");
			sql.push_str(&parts.group_by.join(", "));
		}
		if !order_by.is_empty() {
			sql.push_str(" ORDER BY ");
			sql.push_str(&order_by.join(", "));
		}
		if let Some(limit) = query.pageable().limit() {
			sql.push_str(&format!(" LIMIT {}", limit));
		}
		if let Some(offset) = query.pageable().offset() {
			sql.push_str(&format!(" OFFSET {}", offset));
		}

		Ok(self.finish(QueryArtifact::Sql { query: sql }, state))
	}

	/// Compile an UPDATE. Joins are not permitted; the set clause is
	/// compiled before the predicate so binding order matches placeholder
	/// order in the statement.
	pub fn build_update(
		&self,
		entity: &PersistentEntity,
		query: &CriteriaQuery,
		update: &UpdateSet,
	) -> CompileResult<CompiledQuery> {
		debug!(
			entity = entity.name(),
			dialect = self.dialect.name(),
			"compiling update"
		);
		if update.is_empty() {
			return Err(CompileError::invalid(
				"update requires at least one assignment",
			));
		}
		let mut state = QueryState::new(entity, false);
		JoinResolver::resolve(query.joins(), &mut state)?;

		let mut assignments: Vec<String> = Vec::with_capacity(update.len() + 1);
		for (path, operand) in update.entries() {
			let (expr, resolved) = self.column(&state, path, false)?;
			let index = match operand {
				Operand::Value(value) => {
					state.bind(Self::property_binding(&resolved).with_value(value.clone()))
				}
				Operand::Parameter(name) => {
					state.bind(Self::property_binding(&resolved).with_name(name.clone()))
				}
				Operand::Property(_) => {
					return Err(CompileError::invalid(
						"update values cannot reference other properties",
					));
				}
			};
			assignments.push(format!(
				"{} = {}",
				self.expr_text(&expr),
				self.dialect.placeholder(index)
			));
		}

		// Auto-populate the optimistic-lock version unless the caller set
		// it explicitly. The new value is supplied out-of-band; the WHERE
		// clause checks against the previous value.
		let mut version_check = None;
		if let Some(version) = entity.version_property() {
			if !update.contains(version.name()) {
				let index = state.bind(ParameterBinding::to_path(
					version.name(),
					version.data_type(),
				));
				state.require_parameter(version.name(), version.name());
				assignments.push(format!(
					"{} = {}",
					version.field_name(),
					self.dialect.placeholder(index)
				));
				version_check = Some((version.clone(), index));
			}
		}

		let mut clauses: Vec<SqlClause> = Vec::new();
		if let Some(criterion) = query.criterion() {
			let normalized = normalize(entity, criterion)?;
			clauses.push(self.lower(&normalized, &mut state, false)?);
		}
		if let Some((version, new_value_index)) = version_check {
			let check = state.bind(
				ParameterBinding::to_path(version.name(), version.data_type())
					.previous_value_of(new_value_index),
			);
			clauses.push(SqlClause::Compare {
				lhs: SqlExpr::Column {
					alias: String::new(),
					column: version.field_name().to_string(),
				},
				op: CompareOp::Eq,
				rhs: SqlExpr::Placeholder(check),
			});
		}
		let predicate = match clauses.len() {
			0 => None,
			1 => clauses.pop(),
			_ => Some(SqlClause::And(clauses)),
		};

		let set_clause = assignments.join(", ");
		let mut sql = format!("UPDATE {} SET {}", entity.persisted_name(), set_clause);
		if let Some(clause) = &predicate {
			sql.push_str(" WHERE ");
			clause.render(&self.dialect, &mut sql);
		}
		Ok(self.finish(
			QueryArtifact::SqlUpdate {
				query: sql,
				set_clause,
			},
			state,
		))
	}

	/// Compile a DELETE. Joins are not permitted.
	pub fn build_delete(
		&self,
		entity: &PersistentEntity,
		query: &CriteriaQuery,
	) -> CompileResult<CompiledQuery> {
		debug!(
			entity = entity.name(),
			dialect = self.dialect.name(),
			"compiling delete"
		);
		let mut state = QueryState::new(entity, false);
		JoinResolver::resolve(query.joins(), &mut state)?;

		let predicate = match query.criterion() {
			Some(criterion) => {
				let normalized = normalize(entity, criterion)?;
				Some(self.lower(&normalized, &mut state, false)?)
			}
			None => None,
		};
		let mut sql = self.dialect.delete_clause(entity.persisted_name());
		if let Some(clause) = &predicate {
			sql.push_str(" WHERE ");
			clause.render(&self.dialect, &mut sql);
		}
		Ok(self.finish(QueryArtifact::Sql { query: sql }, state))
	}

	/// Compile an INSERT over every non-generated property.
	pub fn build_insert(&self, entity: &PersistentEntity) -> CompileResult<CompiledQuery> {
		debug!(
			entity = entity.name(),
			dialect = self.dialect.name(),
			"compiling insert"
		);
		let columns: Vec<_> = entity
			.properties()
			.iter()
			.filter(|p| !p.is_generated())
			.collect();
		if columns.is_empty() {
			return Err(CompileError::invalid(
				"insert requires at least one non-generated property",
			));
		}
		let mut state = QueryState::new(entity, false);
		let mut placeholders: Vec<String> = Vec::with_capacity(columns.len());
		for property in &columns {
			let mut binding = ParameterBinding::to_path(property.name(), property.data_type());
			if let Some(converter) = property.converter() {
				binding = binding.with_converter(converter);
			}
			let index = state.bind(binding);
			placeholders.push(self.dialect.placeholder(index));
		}
		let sql = format!(
			"INSERT INTO {} ({}) VALUES ({})",
			entity.persisted_name(),
			columns
				.iter()
				.map(|p| p.field_name())
				.collect::<Vec<_>>()
				.join(", "),
			placeholders.join(", ")
		);
		Ok(self.finish(QueryArtifact::Sql { query: sql }, state))
	}

	fn finish(&self, artifact: QueryArtifact, state: QueryState<'_>) -> CompiledQuery {
		let join_paths = state.join_paths();
		let required = state.required_parameters().clone();
		CompiledQuery::new(artifact, state.into_bindings(), required, join_paths)
	}

	// ---- predicate lowering -------------------------------------------

	fn lower(
		&self,
		criterion: &Criterion,
		state: &mut QueryState<'_>,
		qualify: bool,
	) -> CompileResult<SqlClause> {
		match criterion {
			Criterion::Equals { path, value } => self.equality(state, path, value, false, qualify),
			Criterion::NotEquals { path, value } => {
				self.equality(state, path, value, true, qualify)
			}
			Criterion::GreaterThan { path, value } => {
				self.comparison(state, path, value, CompareOp::Gt, qualify)
			}
			Criterion::GreaterThanEquals { path, value } => {
				self.comparison(state, path, value, CompareOp::Gte, qualify)
			}
			Criterion::LessThan { path, value } => {
				self.comparison(state, path, value, CompareOp::Lt, qualify)
			}
			Criterion::LessThanEquals { path, value } => {
				self.comparison(state, path, value, CompareOp::Lte, qualify)
			}
			Criterion::Between { path, from, to } => {
				let (expr, resolved) = self.column(state, path, qualify)?;
				let from = self.operand_expr(state, &resolved, from, qualify)?;
				let to = self.operand_expr(state, &resolved, to, qualify)?;
				Ok(SqlClause::Between { expr, from, to })
			}
			Criterion::In { path, values } => {
				self.membership(state, path, values, false, qualify)
			}
			Criterion::NotIn { path, values } => {
				self.membership(state, path, values, true, qualify)
			}
			Criterion::StartsWith {
				path,
				value,
				ignore_case,
			} => self.pattern(state, path, value, PatternKind::StartsWith, *ignore_case, qualify),
			Criterion::EndsWith {
				path,
				value,
				ignore_case,
			} => self.pattern(state, path, value, PatternKind::EndsWith, *ignore_case, qualify),
			Criterion::Contains {
				path,
				value,
				ignore_case,
			} => self.pattern(state, path, value, PatternKind::Contains, *ignore_case, qualify),
			Criterion::Like {
				path,
				value,
				ignore_case,
			} => self.pattern(state, path, value, PatternKind::Like, *ignore_case, qualify),
			Criterion::Regex { path, pattern } => {
				let Some(operator) = self.dialect.regex_operator() else {
					return Err(CompileError::UnsupportedCriterion { name: "Regex" });
				};
				let (expr, _) = self.column(state, path, qualify)?;
				Ok(SqlClause::Regex {
					expr,
					operator,
					pattern: escape_sql_string(pattern),
				})
			}
			Criterion::IsEmpty { path } => self.emptiness(state, path, false, qualify),
			Criterion::IsNotEmpty { path } => self.emptiness(state, path, true, qualify),
			Criterion::ArrayContains { path, value } => {
				let Some(operator) = self.dialect.array_contains_operator() else {
					return Err(CompileError::UnsupportedCriterion {
						name: "ArrayContains",
					});
				};
				let (expr, resolved) = self.column(state, path, qualify)?;
				let rhs = self.operand_expr(state, &resolved, value, qualify)?;
				Ok(SqlClause::ArrayContains {
					expr,
					operator,
					rhs,
				})
			}

			// Shorthand forms reduce through the shared normalization and
			// come back as generic equality.
			Criterion::IsTrue { .. }
			| Criterion::IsFalse { .. }
			| Criterion::IsNull { .. }
			| Criterion::IsNotNull { .. }
			| Criterion::IdEquals { .. } => {
				let rewritten = normalize(state.root(), criterion)?;
				self.lower(&rewritten, state, qualify)
			}

			Criterion::Not(inner) => {
				let child = self.lower(inner, state, qualify)?;
				match child {
					SqlClause::And(_) | SqlClause::Or(_) => Err(CompileError::invalid(
						"negation must resolve to exactly one clause",
					)),
					single => Ok(SqlClause::Not(Box::new(single))),
				}
			}
			Criterion::And(children) => {
				let clauses = children
					.iter()
					.map(|c| self.lower(c, state, qualify))
					.collect::<CompileResult<Vec<_>>>()?;
				Ok(SqlClause::And(clauses))
			}
			Criterion::Or(children) => {
				let clauses = children
					.iter()
					.map(|c| self.lower(c, state, qualify))
					.collect::<CompileResult<Vec<_>>>()?;
				Ok(SqlClause::Or(clauses))
			}
		}
	}

	fn equality(
		&self,
		state: &mut QueryState<'_>,
		path: &str,
		value: &Operand,
		negated: bool,
		qualify: bool,
	) -> CompileResult<SqlClause> {
		let (expr, resolved) = self.column(state, path, qualify)?;
		match value {
			Operand::Value(Value::Null) => Ok(SqlClause::IsNull { expr, negated }),
			other => {
				let rhs = self.operand_expr(state, &resolved, other, qualify)?;
				Ok(SqlClause::Compare {
					lhs: expr,
					op: if negated { CompareOp::Ne } else { CompareOp::Eq },
					rhs,
				})
			}
		}
	}

	fn comparison(
		&self,
		state: &mut QueryState<'_>,
		path: &str,
		value: &Operand,
		op: CompareOp,
		qualify: bool,
	) -> CompileResult<SqlClause> {
		if matches!(value, Operand::Value(Value::Null)) {
			return Err(CompileError::invalid(format!(
				"cannot order-compare `{}` against null",
				path
			)));
		}
		let (expr, resolved) = self.column(state, path, qualify)?;
		let rhs = self.operand_expr(state, &resolved, value, qualify)?;
		Ok(SqlClause::Compare { lhs: expr, op, rhs })
	}

	fn membership(
		&self,
		state: &mut QueryState<'_>,
		path: &str,
		values: &Operand,
		negated: bool,
		qualify: bool,
	) -> CompileResult<SqlClause> {
		let (expr, resolved) = self.column(state, path, qualify)?;
		match values {
			Operand::Value(Value::Array(items)) => {
				if items.is_empty() {
					return Err(CompileError::invalid(
						"IN requires at least one value",
					));
				}
				let placeholders = items
					.iter()
					.map(|item| {
						state.bind(Self::property_binding(&resolved).with_value(item.clone()))
					})
					.collect();
				Ok(SqlClause::InList {
					expr,
					placeholders,
					negated,
				})
			}
			Operand::Parameter(name) => {
				let placeholder = state.bind(
					Self::property_binding(&resolved)
						.with_name(name.clone())
						.expandable(),
				);
				Ok(SqlClause::InParameter {
					expr,
					placeholder,
					negated,
				})
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
		kind: PatternKind,
		ignore_case: bool,
		qualify: bool,
	) -> CompileResult<SqlClause> {
		let (expr, resolved) = self.column(state, path, qualify)?;
		let index = match value {
			Operand::Value(Value::String(text)) => {
				let pattern = match kind {
					PatternKind::StartsWith => format!("{}%", escape_like(text)),
					PatternKind::EndsWith => format!("%{}", escape_like(text)),
					PatternKind::Contains => format!("%{}%", escape_like(text)),
					// LIKE patterns are taken verbatim; the caller owns
					// the wildcards.
					PatternKind::Like => text.clone(),
				};
				state.bind(Self::property_binding(&resolved).with_value(Value::String(pattern)))
			}
			Operand::Parameter(name) => {
				let mut binding = Self::property_binding(&resolved).with_name(name.clone());
				if let Some(converter) = kind.converter() {
					binding = binding.with_converter(converter);
				}
				state.bind(binding)
			}
			_ => {
				return Err(CompileError::invalid(
					"pattern criteria require a string value",
				));
			}
		};
		Ok(SqlClause::Like {
			expr,
			pattern: SqlExpr::Placeholder(index),
			ignore_case,
		})
	}

	fn emptiness(
		&self,
		state: &mut QueryState<'_>,
		path: &str,
		negated: bool,
		qualify: bool,
	) -> CompileResult<SqlClause> {
		let (expr, resolved) = self.column(state, path, qualify)?;
		if !resolved.property.data_type().is_string_like() {
			return Err(CompileError::UnsupportedCriterion {
				name: if negated { "IsNotEmpty" } else { "IsEmpty" },
			});
		}
		Ok(SqlClause::Empty { expr, negated })
	}

	fn column(
		&self,
		state: &QueryState<'_>,
		path: &str,
		qualify: bool,
	) -> CompileResult<(SqlExpr, ResolvedProperty)> {
		let resolved = state.resolve_property(path)?;
		let expr = SqlExpr::Column {
			alias: if qualify {
				resolved.alias.clone()
			} else {
				String::new()
			},
			column: resolved.field_segments.join("_"),
		};
		Ok((expr, resolved))
	}

	fn operand_expr(
		&self,
		state: &mut QueryState<'_>,
		resolved: &ResolvedProperty,
		operand: &Operand,
		qualify: bool,
	) -> CompileResult<SqlExpr> {
		match operand {
			Operand::Value(value) => {
				let index =
					state.bind(Self::property_binding(resolved).with_value(value.clone()));
				Ok(SqlExpr::Placeholder(index))
			}
			Operand::Parameter(name) => {
				let index = state.bind(Self::property_binding(resolved).with_name(name.clone()));
				Ok(SqlExpr::Placeholder(index))
			}
			// Property-to-property comparisons reference both columns and
			// never produce a binding.
			Operand::Property(other) => Ok(self.column(state, other, qualify)?.0),
		}
	}

	fn property_binding(resolved: &ResolvedProperty) -> ParameterBinding {
		let mut binding =
			ParameterBinding::to_path(resolved.path.clone(), resolved.property.data_type());
		if let Some(converter) = resolved.property.converter() {
			binding = binding.with_converter(converter);
		}
		binding
	}

	// ---- projections and ordering -------------------------------------

	fn compile_projections(
		&self,
		entity: &PersistentEntity,
		query: &CriteriaQuery,
		state: &QueryState<'_>,
	) -> CompileResult<SelectParts> {
		let projections = query.projections();
		let count_like = projections
			.iter()
			.filter(|p| matches!(p, Projection::Count | Projection::CountDistinct { path: None }))
			.count();
		if count_like > 0 {
			// Count (and count-distinct-of-root, which is treated the
			// same) is a dedicated projection, not a grouped aggregate.
			if projections.len() > count_like {
				return Err(CompileError::UnsupportedProjection {
					name: "Count combined with other projections".to_string(),
				});
			}
			return Ok(SelectParts {
				list: vec![self.dialect.row_count_projection().to_string()],
				group_by: Vec::new(),
			});
		}

		if projections.is_empty() {
			return Ok(SelectParts {
				list: self.default_select_list(entity, state),
				group_by: Vec::new(),
			});
		}

		let mut list: Vec<String> = Vec::new();
		let mut group_candidates: Vec<String> = Vec::new();
		let mut has_aggregate = false;

		for projection in projections {
			match projection {
				Projection::Property { path, alias } => {
					if let Some(PathResolution::Association(associations)) =
						entity.resolve_any(path)
					{
						match state.alias_for(path) {
							Some(join_alias) => {
								let target = associations
									.last()
									.map(|a| a.target())
									.ok_or_else(|| CompileError::unresolvable(entity.name(), path))?;
								for property in target.properties() {
									list.push(format!(
										"{}.{} AS {}{}",
										join_alias,
										property.field_name(),
										join_alias,
										property.field_name()
									));
								}
							}
							None => {
								// Compatibility wart: unjoined association
								// projections are dropped, not an error.
								trace!(path = %path, "dropping unjoined association projection");
							}
						}
						continue;
					}
					let (expr, _) = self.column(state, path, true)?;
					let rendered = self.expr_text(&expr);
					group_candidates.push(rendered.clone());
					match alias {
						Some(alias) => list.push(format!("{} AS {}", rendered, alias)),
						None => list.push(rendered),
					}
				}
				Projection::Aggregate {
					function,
					path,
					alias,
				} => {
					has_aggregate = true;
					let (expr, resolved) = self.column(state, path, true)?;
					let key = alias
						.clone()
						.unwrap_or_else(|| resolved.property.name().to_string());
					list.push(format!(
						"{}({}) AS {}",
						aggregate_sql(*function),
						self.expr_text(&expr),
						key
					));
				}
				Projection::Count | Projection::CountDistinct { path: None } => {
					// Handled by the count shortcut above.
				}
				Projection::CountDistinct { path: Some(path) } => {
					return Err(CompileError::UnsupportedProjection {
						name: format!("count distinct on property `{}`", path),
					});
				}
				Projection::Literal { value, alias } => {
					let rendered = literal_sql(value)?;
					match alias {
						Some(alias) => list.push(format!("{} AS {}", rendered, alias)),
						None => list.push(rendered),
					}
				}
				Projection::Id { alias } => {
					let identity = entity.identity_properties();
					if identity.is_empty() {
						return Err(CompileError::invalid(format!(
							"entity `{}` has no identity to project",
							entity.name()
						)));
					}
					for property in identity {
						let rendered =
							format!("{}.{}", state.root_alias(), property.field_name());
						match alias {
							Some(alias) => list.push(format!("{} AS {}", rendered, alias)),
							None => list.push(rendered),
						}
					}
				}
			}
		}

		if list.is_empty() {
			// Every projection was a dropped association projection.
			list = self.default_select_list(entity, state);
		}
		Ok(SelectParts {
			list,
			group_by: if has_aggregate {
				group_candidates
			} else {
				Vec::new()
			},
		})
	}

	/// Root entity columns, plus the columns of fetch-joined associations
	/// prefixed by their alias for result demultiplexing.
	fn default_select_list(
		&self,
		entity: &PersistentEntity,
		state: &QueryState<'_>,
	) -> Vec<String> {
		let mut list: Vec<String> = entity
			.properties()
			.iter()
			.map(|p| format!("{}.{}", state.root_alias(), p.field_name()))
			.collect();
		for directive in state.joins() {
			if directive.kind == JoinKind::Fetch {
				for property in directive.association.target().properties() {
					list.push(format!(
						"{}.{} AS {}{}",
						directive.alias,
						property.field_name(),
						directive.alias,
						property.field_name()
					));
				}
			}
		}
		list
	}

	fn compile_sort(
		&self,
		query: &CriteriaQuery,
		state: &QueryState<'_>,
	) -> CompileResult<Vec<String>> {
		query
			.sort()
			.orders()
			.iter()
			.map(|order| {
				let (expr, _) = self.column(state, order.path(), true)?;
				Ok(format!(
					"{} {}",
					self.expr_text(&expr),
					match order.direction() {
						Direction::Asc => "ASC",
						Direction::Desc => "DESC",
					}
				))
			})
			.collect()
	}

	fn join_sql(&self, directive: &JoinDirective) -> String {
		let keyword = if directive.flatten || directive.kind == JoinKind::Fetch {
			"LEFT JOIN"
		} else {
			"INNER JOIN"
		};
		let target_table = directive.association.target().persisted_name();
		match &directive.junction {
			Some(junction) => {
				let first: Vec<String> = junction
					.owner_id_fields
					.iter()
					.zip(junction.owner_keys.iter())
					.map(|(id, key)| {
						format!(
							"{}.{} = {}.{}",
							directive.source_alias, id.name, junction.alias, key
						)
					})
					.collect();
				let second: Vec<String> = junction
					.target_keys
					.iter()
					.zip(junction.target_id_fields.iter())
					.map(|(key, id)| {
						format!(
							"{}.{} = {}.{}",
							junction.alias, key, directive.alias, id.name
						)
					})
					.collect();
				format!(
					" {} {} {} ON {} {} {} {} ON {}",
					keyword,
					junction.table,
					junction.alias,
					first.join(" AND "),
					keyword,
					target_table,
					directive.alias,
					second.join(" AND ")
				)
			}
			None => {
				let conditions: Vec<String> = directive
					.on_local
					.iter()
					.zip(directive.on_foreign.iter())
					.map(|(local, foreign)| {
						format!(
							"{}.{} = {}.{}",
							directive.source_alias, local.name, directive.alias, foreign.name
						)
					})
					.collect();
				format!(
					" {} {} {} ON {}",
					keyword,
					target_table,
					directive.alias,
					conditions.join(" AND ")
				)
			}
		}
	}

	fn expr_text(&self, expr: &SqlExpr) -> String {
		let mut out = String::new();
		expr.render(&self.dialect, &mut out);
		out
	}
}

fn aggregate_sql(function: AggregateFunction) -> &'static str {
	match function {
		AggregateFunction::Sum => "SUM",
		AggregateFunction::Avg => "AVG",
		AggregateFunction::Min => "MIN",
		AggregateFunction::Max => "MAX",
	}
}

fn literal_sql(value: &Value) -> CompileResult<String> {
	match value {
		Value::String(text) => Ok(format!("'{}'", escape_sql_string(text))),
		Value::Int(number) => Ok(number.to_string()),
		Value::Float(number) => Ok(number.to_string()),
		Value::Bool(true) => Ok("TRUE".to_string()),
		Value::Bool(false) => Ok("FALSE".to_string()),
		Value::Null => Ok("NULL".to_string()),
		Value::Array(_) => Err(CompileError::invalid(
			"array literals cannot be projected",
		)),
	}
}

fn escape_sql_string(text: &str) -> String {
	text.replace('\'', "''")
}

/// Escape LIKE wildcards in user-supplied text.
fn escape_like(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		if matches!(c, '%' | '_' | '\\') {
			escaped.push('\\');
		}
		escaped.push(c);
	}
	escaped
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn like_escaping_protects_wildcards() {
		assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
		assert_eq!(escape_like("plain"), "plain");
	}

	#[test]
	fn string_literals_double_quotes() {
		assert_eq!(escape_sql_string("O'Neil"), "O''Neil");
	}
}
