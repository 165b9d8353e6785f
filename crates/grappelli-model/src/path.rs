//! Property path addressing.
//!
//! A [`PersistentPropertyPath`] is the universal addressing scheme used by
//! criteria, projections, sorts, and parameter targets: the ordered list of
//! associations traversed from the root entity plus the terminal property.

use serde::{Deserialize, Serialize};

use crate::association::Association;
use crate::entity::{PersistentEntity, PersistentProperty};

/// A property addressed through zero or more associations.
///
/// Two paths are equal iff their association name sequence and terminal
/// property name are equal; the entities behind them do not participate in
/// the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistentPropertyPath {
	associations: Vec<Association>,
	property: PersistentProperty,
}

impl PersistentPropertyPath {
	pub fn new(associations: Vec<Association>, property: PersistentProperty) -> Self {
		Self {
			associations,
			property,
		}
	}

	pub fn associations(&self) -> &[Association] {
		&self.associations
	}

	pub fn property(&self) -> &PersistentProperty {
		&self.property
	}

	/// Whether the path crosses at least one non-embedded association.
	pub fn crosses_association(&self) -> bool {
		self.associations.iter().any(|a| !a.kind().is_embedded())
	}

	/// The dotted association prefix, e.g. `author.books` for
	/// `author.books.title`. Empty for root-level properties.
	pub fn association_prefix(&self) -> String {
		self.associations
			.iter()
			.map(Association::name)
			.collect::<Vec<_>>()
			.join(".")
	}

	/// The full dotted rendering, e.g. `author.books.title`.
	pub fn dotted(&self) -> String {
		let prefix = self.association_prefix();
		if prefix.is_empty() {
			self.property.name().to_string()
		} else {
			format!("{}.{}", prefix, self.property.name())
		}
	}
}

impl PartialEq for PersistentPropertyPath {
	fn eq(&self, other: &Self) -> bool {
		self.property.name() == other.property.name()
			&& self.associations.len() == other.associations.len()
			&& self
				.associations
				.iter()
				.zip(other.associations.iter())
				.all(|(a, b)| a.name() == b.name())
	}
}

impl Eq for PersistentPropertyPath {}

/// Outcome of resolving a dotted path against an entity.
#[derive(Debug, Clone)]
pub enum PathResolution {
	/// The path terminates in a property.
	Property(PersistentPropertyPath),
	/// The path terminates in an association itself.
	Association(Vec<Association>),
}

impl PersistentEntity {
	/// Resolve a dotted path to its terminal property.
	///
	/// A path whose terminal segment names an association resolves to the
	/// target entity's identity property, so `Equals("author", id)` means
	/// the same thing as `Equals("author.id", id)`. Returns `None` when a
	/// segment names neither a property nor an association, or when the
	/// terminal association has a composite identity.
	pub fn resolve_path(&self, path: &str) -> Option<PersistentPropertyPath> {
		match self.resolve_any(path)? {
			PathResolution::Property(resolved) => Some(resolved),
			PathResolution::Association(associations) => {
				let last = associations.last()?;
				let identity = last.target().single_identity()?.clone();
				Some(PersistentPropertyPath::new(associations, identity))
			}
		}
	}

	/// Resolve a dotted path without collapsing a terminal association to
	/// its identity.
	pub fn resolve_any(&self, path: &str) -> Option<PathResolution> {
		let mut associations: Vec<Association> = Vec::new();
		let mut owner: Option<std::sync::Arc<PersistentEntity>> = None;
		let mut segments = path.split('.').peekable();

		while let Some(segment) = segments.next() {
			let current: &PersistentEntity = owner.as_deref().unwrap_or(self);
			if segments.peek().is_none() {
				if let Some(property) = current.property(segment) {
					return Some(PathResolution::Property(PersistentPropertyPath::new(
						associations,
						property.clone(),
					)));
				}
				let association = current.association(segment)?.clone();
				associations.push(association);
				return Some(PathResolution::Association(associations));
			}
			let association = current.association(segment)?.clone();
			let next = association.target().clone();
			associations.push(association);
			owner = Some(next);
		}
		None
	}

	/// Resolve a dotted path of association names only.
	pub fn resolve_association_path(&self, path: &str) -> Option<Vec<Association>> {
		match self.resolve_any(path)? {
			PathResolution::Association(associations) => Some(associations),
			PathResolution::Property(_) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::association::AssociationKind;
	use crate::entity::DataType;

	fn book_entity() -> std::sync::Arc<PersistentEntity> {
		let publisher = PersistentEntity::builder("Publisher")
			.property(PersistentProperty::new("id", DataType::Long).identity())
			.property(PersistentProperty::new("name", DataType::String))
			.build();
		PersistentEntity::builder("Book")
			.property(PersistentProperty::new("id", DataType::Long).identity())
			.property(PersistentProperty::new("title", DataType::String))
			.association(Association::new(
				"publisher",
				AssociationKind::ManyToOne,
				publisher,
			))
			.build()
	}

	fn author_entity() -> std::sync::Arc<PersistentEntity> {
		PersistentEntity::builder("Author")
			.property(PersistentProperty::new("id", DataType::Long).identity())
			.property(PersistentProperty::new("name", DataType::String))
			.association(
				Association::new("books", AssociationKind::OneToMany, book_entity())
					.foreign_key()
					.inverse("author"),
			)
			.build()
	}

	#[test]
	fn resolves_root_property() {
		let author = author_entity();
		let path = author.resolve_path("name").unwrap();
		assert_eq!(path.dotted(), "name");
		assert!(!path.crosses_association());
	}

	#[test]
	fn resolves_nested_property() {
		let author = author_entity();
		let path = author.resolve_path("books.publisher.name").unwrap();
		assert_eq!(path.dotted(), "books.publisher.name");
		assert_eq!(path.association_prefix(), "books.publisher");
		assert!(path.crosses_association());
	}

	#[test]
	fn terminal_association_collapses_to_identity() {
		let author = author_entity();
		let path = author.resolve_path("books.publisher").unwrap();
		assert_eq!(path.property().name(), "id");
		assert_eq!(path.association_prefix(), "books.publisher");
	}

	#[test]
	fn unknown_segment_fails_resolution() {
		let author = author_entity();
		assert!(author.resolve_path("books.missing").is_none());
		assert!(author.resolve_path("nope.title").is_none());
	}

	#[test]
	fn path_equality_ignores_entity_instances() {
		let a = author_entity();
		let b = author_entity();
		assert_eq!(
			a.resolve_path("books.title").unwrap(),
			b.resolve_path("books.title").unwrap()
		);
		assert_ne!(
			a.resolve_path("books.title").unwrap(),
			a.resolve_path("name").unwrap()
		);
	}
}
