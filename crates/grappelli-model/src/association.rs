//! Association definitions between persistent entities.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entity::PersistentEntity;

/// The kind of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssociationKind {
	OneToOne,
	ManyToOne,
	OneToMany,
	ManyToMany,
	/// A sub-object flattened into the parent's field namespace.
	Embedded,
}

impl AssociationKind {
	/// Whether traversing this association yields at most one row/document.
	pub fn is_single_ended(self) -> bool {
		matches!(
			self,
			AssociationKind::OneToOne | AssociationKind::ManyToOne | AssociationKind::Embedded
		)
	}

	pub fn is_embedded(self) -> bool {
		matches!(self, AssociationKind::Embedded)
	}
}

/// A typed sub-relation from one entity to another.
///
/// # Examples
///
/// ```
/// use grappelli_model::{Association, AssociationKind, DataType, PersistentEntity, PersistentProperty};
///
/// let author = PersistentEntity::builder("Author")
///     .property(PersistentProperty::new("id", DataType::Long).identity())
///     .build();
/// let books = Association::new("books", AssociationKind::OneToMany, author.clone())
///     .foreign_key()
///     .inverse("author");
/// assert!(!books.requires_junction());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Association {
	name: String,
	kind: AssociationKind,
	target: Arc<PersistentEntity>,
	/// True when the key column lives on the associated side rather than on
	/// the owner.
	foreign_key: bool,
	/// Name of the inverse association on the target entity, if mapped.
	inverse: Option<String>,
	/// Junction table/collection name override.
	junction_name: Option<String>,
	/// Explicit key columns on the owning side of a junction.
	local_key_fields: Vec<String>,
	/// Explicit key columns on the target side of a junction.
	foreign_key_fields: Vec<String>,
}

impl Association {
	pub fn new(
		name: impl Into<String>,
		kind: AssociationKind,
		target: Arc<PersistentEntity>,
	) -> Self {
		Self {
			name: name.into(),
			kind,
			target,
			foreign_key: false,
			inverse: None,
			junction_name: None,
			local_key_fields: Vec::new(),
			foreign_key_fields: Vec::new(),
		}
	}

	/// Mark the key column as living on the associated side.
	pub fn foreign_key(mut self) -> Self {
		self.foreign_key = true;
		self
	}

	/// Name the inverse association mapped on the target entity.
	pub fn inverse(mut self, name: impl Into<String>) -> Self {
		self.inverse = Some(name.into());
		self
	}

	pub fn junction_name(mut self, name: impl Into<String>) -> Self {
		self.junction_name = Some(name.into());
		self
	}

	pub fn local_key_fields(mut self, fields: Vec<String>) -> Self {
		self.local_key_fields = fields;
		self
	}

	pub fn foreign_key_fields(mut self, fields: Vec<String>) -> Self {
		self.foreign_key_fields = fields;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> AssociationKind {
		self.kind
	}

	pub fn target(&self) -> &Arc<PersistentEntity> {
		&self.target
	}

	pub fn is_foreign_key(&self) -> bool {
		self.foreign_key
	}

	pub fn inverse_name(&self) -> Option<&str> {
		self.inverse.as_deref()
	}

	pub fn explicit_junction_name(&self) -> Option<&str> {
		self.junction_name.as_deref()
	}

	pub fn explicit_local_key_fields(&self) -> &[String] {
		&self.local_key_fields
	}

	pub fn explicit_foreign_key_fields(&self) -> &[String] {
		&self.foreign_key_fields
	}

	/// Whether referencing this association requires the two-hop junction
	/// construct. Many-to-many always does; so does an association whose
	/// key lives on the other side with no mapped inverse, since there is
	/// no plain field on either entity to join through.
	pub fn requires_junction(&self) -> bool {
		match self.kind {
			AssociationKind::ManyToMany => true,
			AssociationKind::Embedded => false,
			_ => self.foreign_key && self.inverse.is_none(),
		}
	}
}
