//! Persistent entity metadata for the Grappelli query compiler.
//!
//! The types in this crate describe persistent entities the way the
//! metadata layer hands them to the compiler: an entity with an ordered
//! property list, an identity, optional optimistic-lock version, and typed
//! associations to other entities. The compiler only ever reads this model;
//! it never mutates it, and a compile holds references (or `Arc`s) for its
//! whole duration.

pub mod association;
pub mod entity;
pub mod naming;
pub mod path;
pub mod value;

pub use association::{Association, AssociationKind};
pub use entity::{DataType, PersistentEntity, PersistentProperty};
pub use naming::NamingStrategy;
pub use path::{PathResolution, PersistentPropertyPath};
pub use value::Value;
