//! The document-store pipeline dialect.
//!
//! Lowers the same criteria model into MongoDB-style aggregation
//! pipelines: `$lookup`/`$unwind` for joins, `$match` for predicates,
//! `$group`/`$count`/`$project` for projections, then `$sort`, `$skip`
//! and `$limit`. Deferred values appear as `{"$param": n}` marker
//! documents that the execution layer replaces, in binding order.

mod builder;

pub use builder::DocumentQueryBuilder;

/// The reserved identity field name of the document dialect. Every
/// reference to an identity property — predicates, joins, sorts,
/// projections — is substituted with this name.
pub const ID_FIELD: &str = "_id";

/// Key of the parameter marker documents embedded in emitted filters.
pub const PARAM_KEY: &str = "$param";
