//! Join resolver behavior tests.

mod common;

use grappelli_criteria::JoinPath;
use grappelli_model::{
    Association, AssociationKind, DataType, PersistentEntity, PersistentProperty,
};
use grappelli_query::{CompileError, JoinResolver, QueryState};

#[test]
fn test_prefix_is_resolved_before_extension_regardless_of_request_order() {
    let author = common::author();
    // Deliberately request the longer path first; sorting guarantees the
    // prefix is established before the extension.
    let joins = vec![JoinPath::new("books.publisher"), JoinPath::new("books")];
    let mut state = QueryState::new(&author, true);
    JoinResolver::resolve(&joins, &mut state).unwrap();

    let directives = state.joins();
    assert_eq!(directives.len(), 2);
    assert_eq!(directives[0].path, "books");
    assert_eq!(directives[0].alias, "author_books_");
    assert_eq!(directives[0].source_alias, "author_");
    assert_eq!(directives[1].path, "books.publisher");
    // The nested join derives from the prefix alias, not from the root.
    assert_eq!(directives[1].source_alias, "author_books_");
    assert_eq!(directives[1].alias, "author_books_publisher_");
}

#[test]
fn test_requesting_both_prefix_and_extension_joins_each_once() {
    let author = common::author();
    let joins = vec![JoinPath::new("books"), JoinPath::new("books.publisher")];
    let mut state = QueryState::new(&author, true);
    JoinResolver::resolve(&joins, &mut state).unwrap();
    assert_eq!(state.joins().len(), 2);
    assert_eq!(state.alias_for("books"), Some("author_books_"));
    assert_eq!(
        state.alias_for("books.publisher"),
        Some("author_books_publisher_")
    );
}

#[test]
fn test_alias_override_feeds_derived_child_aliases() {
    let author = common::author();
    let joins = vec![
        JoinPath::new("books").with_alias("b"),
        JoinPath::new("books.publisher"),
    ];
    let mut state = QueryState::new(&author, true);
    JoinResolver::resolve(&joins, &mut state).unwrap();
    assert_eq!(state.alias_for("books"), Some("b"));
    assert_eq!(state.alias_for("books.publisher"), Some("b_publisher_"));
}

#[test]
fn test_many_to_many_uses_junction_construct() {
    let article = common::article();
    let joins = vec![JoinPath::new("tags")];
    let mut state = QueryState::new(&article, true);
    JoinResolver::resolve(&joins, &mut state).unwrap();

    let directive = &state.joins()[0];
    let junction = directive.junction.as_ref().expect("junction expected");
    assert_eq!(junction.table, "article_tags");
    assert_eq!(junction.owner_keys, vec!["article_id".to_string()]);
    assert_eq!(junction.target_keys, vec!["tag_id".to_string()]);
    assert!(directive.on_local.is_empty());
}

#[test]
fn test_foreign_key_without_inverse_uses_junction_construct() {
    let orphan = PersistentEntity::builder("Orphan")
        .property(PersistentProperty::new("id", DataType::Long).identity())
        .build();
    let owner = PersistentEntity::builder("Owner")
        .property(PersistentProperty::new("id", DataType::Long).identity())
        .association(
            Association::new("orphans", AssociationKind::OneToMany, orphan).foreign_key(),
        )
        .build();
    let joins = vec![JoinPath::new("orphans")];
    let mut state = QueryState::new(&owner, true);
    JoinResolver::resolve(&joins, &mut state).unwrap();
    assert!(state.joins()[0].junction.is_some());
}

#[test]
fn test_single_ended_joins_are_marked_for_flattening() {
    let book = common::book();
    let joins = vec![JoinPath::new("publisher")];
    let mut state = QueryState::new(&book, true);
    JoinResolver::resolve(&joins, &mut state).unwrap();
    assert!(state.joins()[0].flatten);

    let author = common::author();
    let joins = vec![JoinPath::new("books")];
    let mut state = QueryState::new(&author, true);
    JoinResolver::resolve(&joins, &mut state).unwrap();
    assert!(!state.joins()[0].flatten);
}

#[test]
fn test_embedded_paths_produce_no_directives() {
    let customer = common::customer();
    let joins = vec![JoinPath::new("address")];
    let mut state = QueryState::new(&customer, true);
    JoinResolver::resolve(&joins, &mut state).unwrap();
    assert!(state.joins().is_empty());
    assert!(state.join_paths().is_empty());
}

#[test]
fn test_key_field_count_mismatch_is_reported_with_both_lists() {
    let membership = PersistentEntity::builder("Membership")
        .property(PersistentProperty::new("userId", DataType::Long).identity())
        .property(PersistentProperty::new("groupId", DataType::Long).identity())
        .build();
    // One explicit local key against a composite two-field identity.
    let owner = PersistentEntity::builder("Account")
        .property(PersistentProperty::new("id", DataType::Long).identity())
        .association(
            Association::new("membership", AssociationKind::ManyToOne, membership)
                .local_key_fields(vec!["membership_ref".to_string()]),
        )
        .build();
    let joins = vec![JoinPath::new("membership")];
    let mut state = QueryState::new(&owner, true);
    match JoinResolver::resolve(&joins, &mut state).unwrap_err() {
        CompileError::JoinFieldMismatch {
            local_count,
            foreign_count,
            local,
            foreign,
            ..
        } => {
            assert_eq!(local_count, 1);
            assert_eq!(foreign_count, 2);
            assert_eq!(local, vec!["membership_ref".to_string()]);
            assert_eq!(
                foreign,
                vec!["user_id".to_string(), "group_id".to_string()]
            );
        }
        other => panic!("expected JoinFieldMismatch, got {:?}", other),
    }
}

#[test]
fn test_joins_disallowed_state_rejects_requests() {
    let author = common::author();
    let joins = vec![JoinPath::new("books")];
    let mut state = QueryState::new(&author, false);
    assert!(matches!(
        JoinResolver::resolve(&joins, &mut state).unwrap_err(),
        CompileError::JoinsNotPermitted { .. }
    ));
}

#[test]
fn test_unknown_join_path_is_unresolvable() {
    let author = common::author();
    let joins = vec![JoinPath::new("pamphlets")];
    let mut state = QueryState::new(&author, true);
    assert!(matches!(
        JoinResolver::resolve(&joins, &mut state).unwrap_err(),
        CompileError::UnresolvablePath { .. }
    ));
}

#[test]
fn test_resolve_property_requires_established_join() {
    let author = common::author();
    let state = QueryState::new(&author, true);
    assert!(matches!(
        state.resolve_property("books.title").unwrap_err(),
        CompileError::PathNotJoined { .. }
    ));

    let mut joined = QueryState::new(&author, true);
    JoinResolver::resolve(&[JoinPath::new("books")], &mut joined).unwrap();
    let resolved = joined.resolve_property("books.title").unwrap();
    assert_eq!(resolved.alias, "author_books_");
    assert_eq!(resolved.field_segments.as_slice(), ["title".to_string()]);
}
