//! End-to-end SQL compilation tests.

mod common;

use grappelli_criteria::{
    AggregateFunction, CriteriaQuery, Criterion, JoinPath, Operand, Order, Projection, UpdateSet,
};
use grappelli_model::Value;
use grappelli_query::sql::{AnsiSqlDialect, PostgresSqlDialect, SqlQueryBuilder};
use grappelli_query::{CompileError, QueryArtifact};
use proptest::prelude::*;
use rstest::rstest;

fn ansi() -> SqlQueryBuilder<AnsiSqlDialect> {
    SqlQueryBuilder::new(AnsiSqlDialect)
}

#[test]
fn test_conjunction_with_comparison_and_pattern() {
    let person = common::person();
    let query = CriteriaQuery::new().filter(Criterion::and(vec![
        Criterion::gt("age", 18),
        Criterion::starts_with("name", "A", true),
    ]));
    let compiled = ansi().build_query(&person, &query).unwrap();

    assert_eq!(
        compiled.query_text().unwrap(),
        "SELECT person_.id, person_.name, person_.age FROM person person_ \
         WHERE (person_.age > ? AND LOWER(person_.name) LIKE LOWER(?))"
    );
    // Two bindings, indices 0 and 1; the pattern is anchored in the bound
    // value while case-insensitivity stays in the clause.
    assert_eq!(compiled.bindings().len(), 2);
    assert_eq!(compiled.bindings()[0].index(), 0);
    assert_eq!(compiled.bindings()[0].value(), Some(&Value::Int(18)));
    assert_eq!(compiled.bindings()[1].index(), 1);
    assert_eq!(
        compiled.bindings()[1].value(),
        Some(&Value::String("A%".to_string()))
    );
}

#[rstest]
#[case(Criterion::ne("age", 1), "person_.age <> ?")]
#[case(Criterion::gt("age", 1), "person_.age > ?")]
#[case(Criterion::gte("age", 1), "person_.age >= ?")]
#[case(Criterion::lt("age", 1), "person_.age < ?")]
#[case(Criterion::lte("age", 1), "person_.age <= ?")]
#[case(Criterion::between("age", 1, 9), "person_.age BETWEEN ? AND ?")]
fn test_comparison_operator_spelling(#[case] criterion: Criterion, #[case] expected: &str) {
    let person = common::person();
    let compiled = ansi()
        .build_query(&person, &CriteriaQuery::new().filter(criterion))
        .unwrap();
    assert!(compiled.query_text().unwrap().contains(expected));
}

#[test]
fn test_equals_null_and_is_null_compile_identically() {
    let person = common::person();
    let explicit = ansi()
        .build_query(
            &person,
            &CriteriaQuery::new().filter(Criterion::eq("name", Value::Null)),
        )
        .unwrap();
    let shorthand = ansi()
        .build_query(
            &person,
            &CriteriaQuery::new().filter(Criterion::is_null("name")),
        )
        .unwrap();
    assert_eq!(explicit.query_text(), shorthand.query_text());
    assert!(explicit
        .query_text()
        .unwrap()
        .ends_with("WHERE person_.name IS NULL"));
    assert!(explicit.bindings().is_empty());
}

#[test]
fn test_negated_in_swaps_without_not_wrapper() {
    let person = common::person();
    let query = CriteriaQuery::new()
        .filter(Criterion::not(Criterion::is_in("age", vec![1, 2, 3])));
    let compiled = ansi().build_query(&person, &query).unwrap();
    let sql = compiled.query_text().unwrap();
    assert!(sql.contains("person_.age NOT IN (?, ?, ?)"));
    assert!(!sql.contains("NOT ("));
    assert_eq!(compiled.bindings().len(), 3);
}

#[test]
fn test_single_child_junction_equals_child_alone() {
    let person = common::person();
    let wrapped = ansi()
        .build_query(
            &person,
            &CriteriaQuery::new().filter(Criterion::and(vec![Criterion::gt("age", 18)])),
        )
        .unwrap();
    let bare = ansi()
        .build_query(
            &person,
            &CriteriaQuery::new().filter(Criterion::gt("age", 18)),
        )
        .unwrap();
    assert_eq!(wrapped.query_text(), bare.query_text());
}

#[test]
fn test_negating_multi_child_disjunction_fails() {
    let person = common::person();
    let query = CriteriaQuery::new().filter(Criterion::not(Criterion::or(vec![
        Criterion::gt("age", 18),
        Criterion::lt("age", 65),
    ])));
    assert_eq!(
        ansi().build_query(&person, &query).unwrap_err(),
        CompileError::MalformedNegation
    );
}

#[test]
fn test_negated_comparison_wraps_single_clause() {
    let person = common::person();
    let query = CriteriaQuery::new().filter(Criterion::not(Criterion::between("age", 18, 65)));
    let compiled = ansi().build_query(&person, &query).unwrap();
    assert!(compiled
        .query_text()
        .unwrap()
        .contains("NOT (person_.age BETWEEN ? AND ?)"));
}

#[test]
fn test_join_on_inverse_foreign_key() {
    let author = common::author();
    let query = CriteriaQuery::new()
        .join("books")
        .filter(Criterion::eq("books.title", "Rust"));
    let compiled = ansi().build_query(&author, &query).unwrap();
    assert_eq!(
        compiled.query_text().unwrap(),
        "SELECT author_.id, author_.name FROM author author_ \
         INNER JOIN book author_books_ ON author_.id = author_books_.author_id \
         WHERE author_books_.title = ?"
    );
    assert_eq!(compiled.join_paths(), ["books".to_string()]);
}

#[test]
fn test_nested_join_reuses_prefix_alias() {
    let author = common::author();
    let query = CriteriaQuery::new()
        .join("books")
        .join("books.publisher")
        .filter(Criterion::eq("books.publisher.name", "ACME"));
    let compiled = ansi().build_query(&author, &query).unwrap();
    let sql = compiled.query_text().unwrap();
    assert!(sql.contains(
        "INNER JOIN book author_books_ ON author_.id = author_books_.author_id"
    ));
    // The second directive hangs off the first join's alias, not the root.
    assert!(sql.contains(
        "LEFT JOIN publisher author_books_publisher_ \
         ON author_books_.publisher_id = author_books_publisher_.id"
    ));
    assert!(sql.contains("WHERE author_books_publisher_.name = ?"));
    assert_eq!(compiled.join_paths().len(), 2);
}

#[test]
fn test_many_to_many_emits_two_hop_junction() {
    let article = common::article();
    let query = CriteriaQuery::new()
        .join("tags")
        .filter(Criterion::eq("tags.name", "rust"));
    let compiled = ansi().build_query(&article, &query).unwrap();
    let sql = compiled.query_text().unwrap();
    assert!(sql.contains(
        "INNER JOIN article_tags article_tags_jt_ ON article_.id = article_tags_jt_.article_id"
    ));
    assert!(sql.contains(
        "INNER JOIN tag article_tags_ ON article_tags_jt_.tag_id = article_tags_.id"
    ));
}

#[test]
fn test_unjoined_path_in_criteria_is_an_error() {
    let author = common::author();
    let query = CriteriaQuery::new().filter(Criterion::eq("books.title", "Rust"));
    assert_eq!(
        ansi().build_query(&author, &query).unwrap_err(),
        CompileError::PathNotJoined {
            path: "books.title".to_string()
        }
    );
}

#[test]
fn test_unknown_path_is_unresolvable() {
    let person = common::person();
    let query = CriteriaQuery::new().filter(Criterion::eq("nope", 1));
    assert!(matches!(
        ansi().build_query(&person, &query).unwrap_err(),
        CompileError::UnresolvablePath { .. }
    ));
}

#[test]
fn test_update_rejects_predicates_that_need_joins() {
    let author = common::author();
    let query = CriteriaQuery::new().filter(Criterion::eq("books.title", "Rust"));
    let update = UpdateSet::new().set("name", "anonymous");
    assert!(matches!(
        ansi().build_update(&author, &query, &update).unwrap_err(),
        CompileError::JoinsNotPermitted { .. }
    ));
}

#[test]
fn test_update_rejects_explicit_joins() {
    let author = common::author();
    let query = CriteriaQuery::new().join(JoinPath::new("books"));
    let update = UpdateSet::new().set("name", "anonymous");
    assert!(matches!(
        ansi().build_update(&author, &query, &update).unwrap_err(),
        CompileError::JoinsNotPermitted { .. }
    ));
}

#[test]
fn test_update_auto_populates_version_with_previous_value_check() {
    let person = common::versioned_person();
    let query = CriteriaQuery::new().filter(Criterion::id_equals(7));
    let update = UpdateSet::new().set("name", "renamed");
    let compiled = ansi().build_update(&person, &query, &update).unwrap();

    match compiled.artifact() {
        QueryArtifact::SqlUpdate { query, set_clause } => {
            assert_eq!(
                query,
                "UPDATE person SET name = ?, version = ? WHERE (id = ? AND version = ?)"
            );
            assert_eq!(set_clause, "name = ?, version = ?");
        }
        other => panic!("expected SqlUpdate artifact, got {:?}", other),
    }
    let bindings = compiled.bindings();
    assert_eq!(bindings.len(), 4);
    // The new version value is supplied out-of-band.
    assert_eq!(bindings[1].value(), None);
    assert_eq!(
        compiled.required_parameters().get("version"),
        Some(&"version".to_string())
    );
    // The WHERE check binds the previous value of the version binding.
    assert_eq!(bindings[3].previous_value(), Some(1));
}

#[test]
fn test_delete_compiles_unqualified_predicate() {
    let person = common::person();
    let query = CriteriaQuery::new().filter(Criterion::lt("age", 18));
    let compiled = ansi().build_delete(&person, &query).unwrap();
    assert_eq!(
        compiled.query_text().unwrap(),
        "DELETE FROM person WHERE age < ?"
    );
}

#[test]
fn test_insert_covers_non_generated_properties() {
    let person = common::person();
    let compiled = ansi().build_insert(&person).unwrap();
    assert_eq!(
        compiled.query_text().unwrap(),
        "INSERT INTO person (id, name, age) VALUES (?, ?, ?)"
    );
    assert_eq!(compiled.bindings().len(), 3);
}

#[test]
fn test_count_projection_short_circuits() {
    let person = common::person();
    let query = CriteriaQuery::new().project(Projection::count());
    let compiled = ansi().build_query(&person, &query).unwrap();
    assert_eq!(
        compiled.query_text().unwrap(),
        "SELECT COUNT(*) FROM person person_"
    );
}

#[test]
fn test_count_distinct_root_is_plain_count() {
    let person = common::person();
    let count = ansi()
        .build_query(&person, &CriteriaQuery::new().project(Projection::count()))
        .unwrap();
    let distinct = ansi()
        .build_query(
            &person,
            &CriteriaQuery::new().project(Projection::count_distinct_root()),
        )
        .unwrap();
    assert_eq!(count.query_text(), distinct.query_text());
}

#[test]
fn test_count_distinct_property_fails_loudly() {
    let person = common::person();
    let query = CriteriaQuery::new().project(Projection::CountDistinct {
        path: Some("name".to_string()),
    });
    assert!(matches!(
        ansi().build_query(&person, &query).unwrap_err(),
        CompileError::UnsupportedProjection { .. }
    ));
}

#[test]
fn test_aggregates_group_by_plain_projections() {
    let person = common::person();
    let query = CriteriaQuery::new()
        .project(Projection::property("name"))
        .project(Projection::aggregate(AggregateFunction::Sum, "age").with_alias("total"));
    let compiled = ansi().build_query(&person, &query).unwrap();
    assert_eq!(
        compiled.query_text().unwrap(),
        "SELECT person_.name, SUM(person_.age) AS total FROM person person_ \
         GROUP BY person_.name"
    );
}

// Known asymmetry kept for compatibility: association projections whose
// path is not joined are dropped silently instead of failing loudly.
#[test]
fn test_unjoined_association_projection_is_silently_dropped() {
    let author = common::author();
    let query = CriteriaQuery::new().project(Projection::property("books"));
    let compiled = ansi().build_query(&author, &query).unwrap();
    assert_eq!(
        compiled.query_text().unwrap(),
        "SELECT author_.id, author_.name FROM author author_"
    );
}

#[test]
fn test_property_to_property_comparison_binds_nothing() {
    let person = common::person();
    let query =
        CriteriaQuery::new().filter(Criterion::gt("age", Operand::property("id")));
    let compiled = ansi().build_query(&person, &query).unwrap();
    assert!(compiled
        .query_text()
        .unwrap()
        .ends_with("WHERE person_.age > person_.id"));
    assert!(compiled.bindings().is_empty());
}

#[test]
fn test_sort_and_paging_render_in_fixed_order() {
    let person = common::person();
    let query = CriteriaQuery::new()
        .order_by(Order::desc("name"))
        .limit(10)
        .offset(5);
    let compiled = ansi().build_query(&person, &query).unwrap();
    assert!(compiled
        .query_text()
        .unwrap()
        .ends_with("ORDER BY person_.name DESC LIMIT 10 OFFSET 5"));
}

#[test]
fn test_embedded_association_flattens_without_join() {
    let customer = common::customer();
    let query = CriteriaQuery::new().filter(Criterion::eq("address.city", "Paris"));
    let compiled = ansi().build_query(&customer, &query).unwrap();
    assert!(compiled
        .query_text()
        .unwrap()
        .ends_with("WHERE customer_.address_city = ?"));
    assert!(compiled.join_paths().is_empty());
}

#[test]
fn test_postgres_dialect_numbers_placeholders_and_uses_ilike() {
    let person = common::person();
    let query = CriteriaQuery::new().filter(Criterion::and(vec![
        Criterion::gt("age", 18),
        Criterion::starts_with("name", "A", true),
    ]));
    let compiled = SqlQueryBuilder::new(PostgresSqlDialect)
        .build_query(&person, &query)
        .unwrap();
    assert!(compiled
        .query_text()
        .unwrap()
        .ends_with("WHERE (person_.age > $1 AND person_.name ILIKE $2)"));
}

#[test]
fn test_regex_requires_dialect_support() {
    let person = common::person();
    let query = CriteriaQuery::new().filter(Criterion::regex("name", "^a.*"));
    assert_eq!(
        ansi().build_query(&person, &query).unwrap_err(),
        CompileError::UnsupportedCriterion { name: "Regex" }
    );
    let compiled = SqlQueryBuilder::new(PostgresSqlDialect)
        .build_query(&person, &query)
        .unwrap();
    // Constant pattern text is inlined, not bound.
    assert!(compiled
        .query_text()
        .unwrap()
        .ends_with("WHERE person_.name ~ '^a.*'"));
    assert!(compiled.bindings().is_empty());
}

#[test]
fn test_deferred_in_parameter_is_expandable() {
    let person = common::person();
    let query =
        CriteriaQuery::new().filter(Criterion::is_in("age", Operand::parameter("ages")));
    let compiled = ansi().build_query(&person, &query).unwrap();
    assert!(compiled.query_text().unwrap().contains("person_.age IN (?)"));
    assert_eq!(compiled.bindings().len(), 1);
    assert!(compiled.bindings()[0].is_expandable());
    assert_eq!(compiled.bindings()[0].name(), Some("ages"));
}

proptest! {
    // Binding indices are strictly increasing from zero and match the
    // number of placeholders in the emitted text.
    #[test]
    fn prop_binding_indices_match_placeholders(values in proptest::collection::vec(0i64..1000, 1..20)) {
        let person = common::person();
        let children: Vec<Criterion> = values.iter().map(|v| Criterion::eq("age", *v)).collect();
        let query = CriteriaQuery::new().filter(Criterion::and(children));
        let compiled = SqlQueryBuilder::new(AnsiSqlDialect)
            .build_query(&person, &query)
            .unwrap();
        let placeholders = compiled.query_text().unwrap().matches('?').count();
        prop_assert_eq!(placeholders, compiled.bindings().len());
        for (position, binding) in compiled.bindings().iter().enumerate() {
            prop_assert_eq!(binding.index(), position);
        }
    }
}
