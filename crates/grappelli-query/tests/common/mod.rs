//! Shared entity fixtures for the builder tests.
#![allow(dead_code)]

use std::sync::Arc;

use grappelli_model::{
    Association, AssociationKind, DataType, PersistentEntity, PersistentProperty,
};

/// `Person { id, name, age }`
pub fn person() -> Arc<PersistentEntity> {
    PersistentEntity::builder("Person")
        .property(PersistentProperty::new("id", DataType::Long).identity())
        .property(PersistentProperty::new("name", DataType::String))
        .property(PersistentProperty::new("age", DataType::Integer))
        .build()
}

/// `Person` with an optimistic-lock version property.
pub fn versioned_person() -> Arc<PersistentEntity> {
    PersistentEntity::builder("Person")
        .property(PersistentProperty::new("id", DataType::Long).identity())
        .property(PersistentProperty::new("name", DataType::String))
        .property(PersistentProperty::new("version", DataType::Long).version())
        .build()
}

/// `Publisher { id, name }`
pub fn publisher() -> Arc<PersistentEntity> {
    PersistentEntity::builder("Publisher")
        .property(PersistentProperty::new("id", DataType::Long).identity())
        .property(PersistentProperty::new("name", DataType::String))
        .build()
}

/// `Book { id, title, pages, publisher -> Publisher }`
pub fn book() -> Arc<PersistentEntity> {
    PersistentEntity::builder("Book")
        .property(PersistentProperty::new("id", DataType::Long).identity())
        .property(PersistentProperty::new("title", DataType::String))
        .property(PersistentProperty::new("pages", DataType::Integer))
        .association(Association::new(
            "publisher",
            AssociationKind::ManyToOne,
            publisher(),
        ))
        .build()
}

/// `Author { id, name, books -> [Book] }` with the key column on the book
/// side (`author_id`) and a mapped inverse.
pub fn author() -> Arc<PersistentEntity> {
    PersistentEntity::builder("Author")
        .property(PersistentProperty::new("id", DataType::Long).identity())
        .property(PersistentProperty::new("name", DataType::String))
        .association(
            Association::new("books", AssociationKind::OneToMany, book())
                .foreign_key()
                .inverse("author"),
        )
        .build()
}

/// `Article { id, title, tags <-> [Tag] }` via a junction.
pub fn article() -> Arc<PersistentEntity> {
    let tag = PersistentEntity::builder("Tag")
        .property(PersistentProperty::new("id", DataType::Long).identity())
        .property(PersistentProperty::new("name", DataType::String))
        .build();
    PersistentEntity::builder("Article")
        .property(PersistentProperty::new("id", DataType::Long).identity())
        .property(PersistentProperty::new("title", DataType::String))
        .association(Association::new("tags", AssociationKind::ManyToMany, tag))
        .build()
}

/// `Customer { id, address: Embedded { street, city } }`
pub fn customer() -> Arc<PersistentEntity> {
    let address = PersistentEntity::builder("Address")
        .property(PersistentProperty::new("street", DataType::String))
        .property(PersistentProperty::new("city", DataType::String))
        .build();
    PersistentEntity::builder("Customer")
        .property(PersistentProperty::new("id", DataType::Long).identity())
        .property(PersistentProperty::new("name", DataType::String))
        .association(Association::new(
            "address",
            AssociationKind::Embedded,
            address,
        ))
        .build()
}
