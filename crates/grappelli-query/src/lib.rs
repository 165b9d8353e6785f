//! The Grappelli criteria-to-query compiler.
//!
//! Takes a backend-agnostic [`CriteriaQuery`](grappelli_criteria::CriteriaQuery)
//! built against a [`PersistentEntity`](grappelli_model::PersistentEntity)
//! and emits a backend-specific artifact — a SQL statement with positional
//! placeholders, or a document-store aggregation pipeline — together with
//! the ordered parameter bindings the execution layer substitutes at run
//! time.
//!
//! Compilation is synchronous, pure and single-threaded: one
//! [`state::QueryState`] per compile call, no I/O, no retries. Errors are
//! compile-time and local; no partial artifact is ever produced.

pub mod artifact;
pub mod binding;
pub mod cache;
pub mod document;
pub mod error;
pub mod join;
pub mod normalize;
pub mod sql;
pub mod state;

pub use artifact::{CompiledQuery, QueryArtifact};
pub use binding::{BindingTarget, ParameterBinding};
pub use cache::QueryCache;
pub use document::DocumentQueryBuilder;
pub use error::{CompileError, CompileResult};
pub use join::{JoinDirective, JoinField, JoinResolver, JunctionJoin};
pub use sql::{AnsiSqlDialect, PostgresSqlDialect, SqlDialect, SqlQueryBuilder};
pub use state::QueryState;
