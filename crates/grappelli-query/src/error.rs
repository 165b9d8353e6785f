//! Compile-time failure taxonomy.
//!
//! Every error here is local to one compile call: the compiler never
//! retries and never emits a partial artifact. The only recovery is fixing
//! the criteria model and compiling again.

/// Result alias for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors raised while lowering a criteria query to a dialect artifact.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
	/// The criterion/dialect combination has no defined lowering.
	#[error("unsupported criterion `{name}` for this dialect")]
	UnsupportedCriterion { name: &'static str },

	/// The projection/dialect combination has no defined lowering.
	#[error("unsupported projection `{name}` for this dialect")]
	UnsupportedProjection { name: String },

	/// A referenced path does not exist on the entity.
	#[error("cannot resolve path `{path}` on entity `{entity}`")]
	UnresolvablePath { entity: String, path: String },

	/// A referenced path crosses an association that no requested join
	/// satisfies.
	#[error("path `{path}` crosses an association that is not joined")]
	PathNotJoined { path: String },

	/// A join was requested (or implied) on a target that forbids joins,
	/// such as an UPDATE or DELETE statement.
	#[error("joins are not permitted here, but path `{path}` requires one")]
	JoinsNotPermitted { path: String },

	/// Negation applied to a conjunction/disjunction with more than one
	/// child. Single-child junctions degenerate to the child and are fine.
	#[error("cannot negate a conjunction or disjunction with more than one child")]
	MalformedNegation,

	/// Local and foreign key field counts disagree on a join.
	#[error(
		"join field count mismatch on association `{association}`: \
		 {local_count} local field(s) {local:?} vs {foreign_count} foreign field(s) {foreign:?}"
	)]
	JoinFieldMismatch {
		association: String,
		local_count: usize,
		foreign_count: usize,
		local: Vec<String>,
		foreign: Vec<String>,
	},

	/// Residual invariant violations in the criteria model itself.
	#[error("invalid query: {reason}")]
	InvalidQuery { reason: String },
}

impl CompileError {
	pub(crate) fn unresolvable(entity: &str, path: &str) -> Self {
		CompileError::UnresolvablePath {
			entity: entity.to_string(),
			path: path.to_string(),
		}
	}

	pub(crate) fn invalid(reason: impl Into<String>) -> Self {
		CompileError::InvalidQuery {
			reason: reason.into(),
		}
	}
}
