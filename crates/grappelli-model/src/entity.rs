//! Persistent entity and property definitions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::association::Association;
use crate::naming::NamingStrategy;

/// Data-type hint attached to a property.
///
/// The compiler records this on every parameter binding so the execution
/// layer can pick the right driver-level encoding without re-inspecting the
/// entity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
	Boolean,
	Integer,
	Long,
	Float,
	Double,
	String,
	Uuid,
	Date,
	Timestamp,
	Json,
	Bytes,
	Object,
}

impl DataType {
	/// Whether values of this type are compared as text.
	pub fn is_string_like(self) -> bool {
		matches!(self, DataType::String | DataType::Uuid)
	}
}

/// A single persistent property of an entity.
///
/// # Examples
///
/// ```
/// use grappelli_model::{DataType, PersistentProperty};
///
/// let version = PersistentProperty::new("version", DataType::Long).version();
/// assert!(version.is_version());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistentProperty {
	name: String,
	field_name: String,
	data_type: DataType,
	converter: Option<String>,
	identity: bool,
	version: bool,
	generated: bool,
}

impl PersistentProperty {
	pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
		let name = name.into();
		let field_name = NamingStrategy::default().mapped_name(&name);
		Self {
			name,
			field_name,
			data_type,
			converter: None,
			identity: false,
			version: false,
			generated: false,
		}
	}

	/// Override the persisted field/column name.
	pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
		self.field_name = field_name.into();
		self
	}

	/// Register a named value converter applied by the execution layer.
	pub fn with_converter(mut self, converter: impl Into<String>) -> Self {
		self.converter = Some(converter.into());
		self
	}

	/// Mark this property as (part of) the entity identity.
	pub fn identity(mut self) -> Self {
		self.identity = true;
		self
	}

	/// Mark this property as the optimistic-lock version.
	pub fn version(mut self) -> Self {
		self.version = true;
		self
	}

	/// Mark this property as database-generated (skipped on insert).
	pub fn generated(mut self) -> Self {
		self.generated = true;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn field_name(&self) -> &str {
		&self.field_name
	}

	pub fn data_type(&self) -> DataType {
		self.data_type
	}

	pub fn converter(&self) -> Option<&str> {
		self.converter.as_deref()
	}

	pub fn is_identity(&self) -> bool {
		self.identity
	}

	pub fn is_version(&self) -> bool {
		self.version
	}

	pub fn is_generated(&self) -> bool {
		self.generated
	}
}

/// Immutable description of a persistent type.
///
/// Instances are produced by the external metadata layer and shared with
/// the compiler behind `Arc`; nothing in this crate mutates an entity after
/// [`PersistentEntityBuilder::build`] returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistentEntity {
	name: String,
	persisted_name: String,
	properties: Vec<PersistentProperty>,
	associations: Vec<Association>,
}

impl PersistentEntity {
	pub fn builder(name: impl Into<String>) -> PersistentEntityBuilder {
		PersistentEntityBuilder::new(name)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// The table/collection this entity is persisted under.
	pub fn persisted_name(&self) -> &str {
		&self.persisted_name
	}

	pub fn properties(&self) -> &[PersistentProperty] {
		&self.properties
	}

	pub fn associations(&self) -> &[Association] {
		&self.associations
	}

	pub fn property(&self, name: &str) -> Option<&PersistentProperty> {
		self.properties.iter().find(|p| p.name() == name)
	}

	pub fn association(&self, name: &str) -> Option<&Association> {
		self.associations.iter().find(|a| a.name() == name)
	}

	/// All identity properties, in declaration order. A composite identity
	/// has more than one entry.
	pub fn identity_properties(&self) -> Vec<&PersistentProperty> {
		self.properties.iter().filter(|p| p.is_identity()).collect()
	}

	/// The identity property when the identity is not composite.
	pub fn single_identity(&self) -> Option<&PersistentProperty> {
		let identity = self.identity_properties();
		match identity.as_slice() {
			[single] => Some(single),
			_ => None,
		}
	}

	pub fn version_property(&self) -> Option<&PersistentProperty> {
		self.properties.iter().find(|p| p.is_version())
	}
}

/// Builder for [`PersistentEntity`].
#[derive(Debug)]
pub struct PersistentEntityBuilder {
	name: String,
	persisted_name: Option<String>,
	naming: NamingStrategy,
	properties: Vec<PersistentProperty>,
	associations: Vec<Association>,
}

impl PersistentEntityBuilder {
	fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			persisted_name: None,
			naming: NamingStrategy::default(),
			properties: Vec::new(),
			associations: Vec::new(),
		}
	}

	pub fn naming(mut self, naming: NamingStrategy) -> Self {
		self.naming = naming;
		self
	}

	/// Override the persisted table/collection name.
	pub fn persisted_name(mut self, name: impl Into<String>) -> Self {
		self.persisted_name = Some(name.into());
		self
	}

	pub fn property(mut self, property: PersistentProperty) -> Self {
		self.properties.push(property);
		self
	}

	pub fn association(mut self, association: Association) -> Self {
		self.associations.push(association);
		self
	}

	pub fn build(self) -> Arc<PersistentEntity> {
		let persisted_name = self
			.persisted_name
			.unwrap_or_else(|| self.naming.mapped_name(&self.name));
		Arc::new(PersistentEntity {
			name: self.name,
			persisted_name,
			properties: self.properties,
			associations: self.associations,
		})
	}
}
