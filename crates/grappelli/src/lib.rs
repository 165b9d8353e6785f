//! Grappelli: a criteria-to-query compiler.
//!
//! Describe a persistence operation once — predicate tree, projections,
//! joins, ordering, paging — and compile it to the dialect of your store:
//! SQL text with positional placeholders, or a document aggregation
//! pipeline, each paired with an ordered parameter-binding list.
//!
//! ```
//! use grappelli::prelude::*;
//!
//! let person = PersistentEntity::builder("Person")
//!     .property(PersistentProperty::new("id", DataType::Long).identity())
//!     .property(PersistentProperty::new("name", DataType::String))
//!     .property(PersistentProperty::new("age", DataType::Integer))
//!     .build();
//!
//! let query = CriteriaQuery::new().filter(Criterion::and(vec![
//!     Criterion::gt("age", 18),
//!     Criterion::starts_with("name", "A", true),
//! ]));
//!
//! let compiled = SqlQueryBuilder::new(AnsiSqlDialect)
//!     .build_query(&person, &query)
//!     .unwrap();
//! assert_eq!(compiled.bindings().len(), 2);
//! ```

pub use grappelli_criteria as criteria;
pub use grappelli_model as model;
pub use grappelli_query as query;

/// The common imports.
pub mod prelude {
	pub use grappelli_criteria::{
		AggregateFunction, CriteriaQuery, Criterion, Direction, JoinKind, JoinPath, Operand,
		Order, Pageable, Projection, Sort, UpdateSet,
	};
	pub use grappelli_model::{
		Association, AssociationKind, DataType, NamingStrategy, PersistentEntity,
		PersistentProperty, PersistentPropertyPath, Value,
	};
	pub use grappelli_query::{
		AnsiSqlDialect, CompileError, CompileResult, CompiledQuery, DocumentQueryBuilder,
		ParameterBinding, PostgresSqlDialect, QueryArtifact, QueryCache, SqlDialect,
		SqlQueryBuilder,
	};
}
