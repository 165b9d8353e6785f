//! The internal clause AST for the SQL family.
//!
//! Predicates are lowered into this small tree first and linearized into
//! statement text in one final pass. Multi-valued criteria hold one
//! placeholder index per element up front, so the emitted text never needs
//! after-the-fact placeholder rewriting.

use super::dialect::SqlDialect;

/// A scalar expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpr {
	/// A column reference, optionally qualified. An empty alias renders
	/// unqualified (UPDATE/DELETE statements have no table alias).
	Column { alias: String, column: String },
	/// A positional placeholder for the binding at the given index.
	Placeholder(usize),
	/// Pre-escaped constant text, inlined verbatim.
	Constant(String),
	Lower(Box<SqlExpr>),
}

impl SqlExpr {
	pub fn render<D: SqlDialect>(&self, dialect: &D, out: &mut String) {
		match self {
			SqlExpr::Column { alias, column } => {
				if alias.is_empty() {
					out.push_str(column);
				} else {
					out.push_str(alias);
					out.push('.');
					out.push_str(column);
				}
			}
			SqlExpr::Placeholder(index) => out.push_str(&dialect.placeholder(*index)),
			SqlExpr::Constant(text) => out.push_str(text),
			SqlExpr::Lower(inner) => {
				out.push_str("LOWER(");
				inner.render(dialect, out);
				out.push(')');
			}
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
	Eq,
	Ne,
	Gt,
	Gte,
	Lt,
	Lte,
}

impl CompareOp {
	fn symbol(self) -> &'static str {
		match self {
			CompareOp::Eq => "=",
			CompareOp::Ne => "<>",
			CompareOp::Gt => ">",
			CompareOp::Gte => ">=",
			CompareOp::Lt => "<",
			CompareOp::Lte => "<=",
		}
	}
}

/// One predicate clause.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlClause {
	Compare {
		lhs: SqlExpr,
		op: CompareOp,
		rhs: SqlExpr,
	},
	IsNull {
		expr: SqlExpr,
		negated: bool,
	},
	Between {
		expr: SqlExpr,
		from: SqlExpr,
		to: SqlExpr,
	},
	/// Set membership with one placeholder per element.
	InList {
		expr: SqlExpr,
		placeholders: Vec<usize>,
		negated: bool,
	},
	/// Set membership against a deferred collection parameter; the single
	/// placeholder is expanded by the execution layer.
	InParameter {
		expr: SqlExpr,
		placeholder: usize,
		negated: bool,
	},
	Like {
		expr: SqlExpr,
		pattern: SqlExpr,
		ignore_case: bool,
	},
	/// Regex match with an inlined constant pattern; the operator comes
	/// from the dialect.
	Regex {
		expr: SqlExpr,
		operator: &'static str,
		pattern: String,
	},
	/// Array containment; the operator comes from the dialect.
	ArrayContains {
		expr: SqlExpr,
		operator: &'static str,
		rhs: SqlExpr,
	},
	/// String emptiness: null or the empty string.
	Empty {
		expr: SqlExpr,
		negated: bool,
	},
	Not(Box<SqlClause>),
	And(Vec<SqlClause>),
	Or(Vec<SqlClause>),
}

impl SqlClause {
	pub fn render<D: SqlDialect>(&self, dialect: &D, out: &mut String) {
		match self {
			SqlClause::Compare { lhs, op, rhs } => {
				lhs.render(dialect, out);
				out.push(' ');
				out.push_str(op.symbol());
				out.push(' ');
				rhs.render(dialect, out);
			}
			SqlClause::IsNull { expr, negated } => {
				expr.render(dialect, out);
				out.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
			}
			SqlClause::Between { expr, from, to } => {
				expr.render(dialect, out);
				out.push_str(" BETWEEN ");
				from.render(dialect, out);
				out.push_str(" AND ");
				to.render(dialect, out);
			}
			SqlClause::InList {
				expr,
				placeholders,
				negated,
			} => {
				expr.render(dialect, out);
				out.push_str(if *negated { " NOT IN (" } else { " IN (" });
				for (position, index) in placeholders.iter().enumerate() {
					if position > 0 {
						out.push_str(", ");
					}
					out.push_str(&dialect.placeholder(*index));
				}
				out.push(')');
			}
			SqlClause::InParameter {
				expr,
				placeholder,
				negated,
			} => {
				expr.render(dialect, out);
				out.push_str(if *negated { " NOT IN (" } else { " IN (" });
				out.push_str(&dialect.placeholder(*placeholder));
				out.push(')');
			}
			SqlClause::Like {
				expr,
				pattern,
				ignore_case,
			} => match (ignore_case, dialect.case_insensitive_like()) {
				(true, Some(operator)) => {
					expr.render(dialect, out);
					out.push(' ');
					out.push_str(operator);
					out.push(' ');
					pattern.render(dialect, out);
				}
				(true, None) => {
					SqlExpr::Lower(Box::new(expr.clone())).render(dialect, out);
					out.push_str(" LIKE ");
					SqlExpr::Lower(Box::new(pattern.clone())).render(dialect, out);
				}
				(false, _) => {
					expr.render(dialect, out);
					out.push_str(" LIKE ");
					pattern.render(dialect, out);
				}
			},
			SqlClause::Regex {
				expr,
				operator,
				pattern,
			} => {
				expr.render(dialect, out);
				out.push(' ');
				out.push_str(operator);
				out.push_str(" '");
				out.push_str(pattern);
				out.push('\'');
			}
			SqlClause::ArrayContains {
				expr,
				operator,
				rhs,
			} => {
				expr.render(dialect, out);
				out.push(' ');
				out.push_str(operator);
				out.push(' ');
				rhs.render(dialect, out);
			}
			SqlClause::Empty { expr, negated } => {
				out.push('(');
				expr.render(dialect, out);
				if *negated {
					out.push_str(" IS NOT NULL AND ");
					expr.render(dialect, out);
					out.push_str(" <> '')");
				} else {
					out.push_str(" IS NULL OR ");
					expr.render(dialect, out);
					out.push_str(" = '')");
				}
			}
			SqlClause::Not(inner) => {
				out.push_str("NOT (");
				inner.render(dialect, out);
				out.push(')');
			}
			SqlClause::And(children) => render_junction(children, " AND ", dialect, out),
			SqlClause::Or(children) => render_junction(children, " OR ", dialect, out),
		}
	}

	/// Render to a fresh string.
	pub fn to_sql<D: SqlDialect>(&self, dialect: &D) -> String {
		let mut out = String::new();
		self.render(dialect, &mut out);
		out
	}
}

fn render_junction<D: SqlDialect>(
	children: &[SqlClause],
	separator: &str,
	dialect: &D,
	out: &mut String,
) {
	out.push('(');
	for (position, child) in children.iter().enumerate() {
		if position > 0 {
			out.push_str(separator);
		}
		child.render(dialect, out);
	}
	out.push(')');
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sql::dialect::{AnsiSqlDialect, PostgresSqlDialect};

	fn column(name: &str) -> SqlExpr {
		SqlExpr::Column {
			alias: "person_".to_string(),
			column: name.to_string(),
		}
	}

	#[test]
	fn renders_comparison_with_placeholder() {
		let clause = SqlClause::Compare {
			lhs: column("age"),
			op: CompareOp::Gt,
			rhs: SqlExpr::Placeholder(0),
		};
		assert_eq!(clause.to_sql(&AnsiSqlDialect), "person_.age > ?");
		assert_eq!(clause.to_sql(&PostgresSqlDialect), "person_.age > $1");
	}

	#[test]
	fn in_list_expands_one_placeholder_per_element() {
		let clause = SqlClause::InList {
			expr: column("age"),
			placeholders: vec![0, 1, 2],
			negated: false,
		};
		assert_eq!(clause.to_sql(&PostgresSqlDialect), "person_.age IN ($1, $2, $3)");
	}

	#[test]
	fn ignore_case_like_lowers_without_native_operator() {
		let clause = SqlClause::Like {
			expr: column("name"),
			pattern: SqlExpr::Placeholder(0),
			ignore_case: true,
		};
		assert_eq!(
			clause.to_sql(&AnsiSqlDialect),
			"LOWER(person_.name) LIKE LOWER(?)"
		);
		assert_eq!(clause.to_sql(&PostgresSqlDialect), "person_.name ILIKE $1");
	}

	#[test]
	fn empty_check_covers_null_and_empty_string() {
		let clause = SqlClause::Empty {
			expr: column("name"),
			negated: false,
		};
		assert_eq!(
			clause.to_sql(&AnsiSqlDialect),
			"(person_.name IS NULL OR person_.name = '')"
		);
	}
}
