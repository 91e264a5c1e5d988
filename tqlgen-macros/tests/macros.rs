//! Compile generated modules from a fixture schema and exercise them.

use pretty_assertions::assert_eq;
use serde_json::json;

tqlgen_macros::schema_models!("tests/fixtures/library.tql");
tqlgen_macros::schema_dtos!("tests/fixtures/library.tql");
tqlgen_macros::schema_registry!("tests/fixtures/library.tql");

#[test]
fn test_model_types() {
    let book = models::Book {
        iid: None,
        genre: Some(models::Genre::NonFiction),
        isbn: "978-0441013593".to_string(),
        pages: Some(412),
        published: None,
        title: "Dune".to_string(),
    };

    assert_eq!(
        serde_json::to_value(&book).unwrap(),
        json!({
            "genre": "non-fiction",
            "isbn": "978-0441013593",
            "pages": 412,
            "title": "Dune",
        })
    );
    assert_eq!(models::Book::TYPE_NAME, "book");
    assert_eq!(models::SCHEMA_VERSION, "1.2.0");
}

#[test]
fn test_model_enum() {
    assert_eq!(models::Genre::ALL.len(), 3);
    assert_eq!(models::Genre::Poetry.as_str(), "poetry");

    let genre: models::Genre = serde_json::from_str("\"non-fiction\"").unwrap();
    assert_eq!(genre, models::Genre::NonFiction);
}

#[test]
fn test_model_relation_roles() {
    let authorship = models::Authorship {
        iid: Some("0x1".to_string()),
        rating: Some(4.5),
        author: Some(Box::new(models::Person {
            iid: None,
            name: "Frank Herbert".to_string(),
        })),
        publication: None,
    };
    let value = serde_json::to_value(&authorship).unwrap();
    assert_eq!(value["author"]["name"], "Frank Herbert");
    assert!(value.get("publication").is_none());
}

#[test]
fn test_dtos() {
    use dto::{EntityCreate, EntityOut, RelationCreate};

    let create = dto::BookCreate {
        type_name: "book".to_string(),
        genre: None,
        isbn: "978-0441013593".to_string(),
        pages: None,
        published: None,
        title: "Dune".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&create).unwrap(),
        json!({ "type": "book", "isbn": "978-0441013593", "title": "Dune" })
    );
    assert_eq!(<dto::BookCreate as EntityCreate>::TYPE_NAME, "book");

    let out: dto::BookOut =
        serde_json::from_value(json!({ "id": "0x2", "type": "book", "title": "Dune" })).unwrap();
    assert_eq!(out.title.as_deref(), Some("Dune"));
    assert_eq!(out.isbn, None);
    assert_eq!(<dto::BookOut as EntityOut>::TYPE_NAME, "book");

    let patch = dto::BookPatch::default();
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({}));

    let relation = dto::AuthorshipCreate {
        type_name: "authorship".to_string(),
        author_id: "0x3".to_string(),
        publication_id: "0x2".to_string(),
        rating: None,
    };
    assert_eq!(
        serde_json::to_value(&relation).unwrap(),
        json!({ "type": "authorship", "author_id": "0x3", "publication_id": "0x2" })
    );
    assert_eq!(<dto::AuthorshipCreate as RelationCreate>::TYPE_NAME, "authorship");

    assert_eq!(dto::CONCRETE_ENTITIES, &["book", "person"]);
    assert_eq!(dto::CONCRETE_RELATIONS, &["authorship"]);
}

#[test]
fn test_registry_constants() {
    assert_eq!(registry::TYPE_BOOK, "book");
    assert_eq!(registry::TYPE_PERSON, "person");
    assert_eq!(registry::REL_AUTHORSHIP, "authorship");
    assert_eq!(registry::GENRE_NON_FICTION, "non-fiction");
    assert_eq!(registry::SCHEMA_VERSION, "1.2.0");
    assert!(registry::SCHEMA_HASH.starts_with("sha256:"));
    assert_eq!(
        registry::ALL_ENTITIES,
        &["book", "person", "work"]
    );
}

#[test]
fn test_registry_lookups() {
    assert_eq!(registry::entity_parent("book"), Some("work"));
    assert_eq!(registry::entity_parent("person"), None);
    assert!(registry::is_abstract_entity("work"));
    assert!(!registry::is_abstract_entity("book"));

    assert_eq!(registry::entity_keys("book"), &["isbn"]);
    assert_eq!(
        registry::entity_attributes("book"),
        &["genre", "isbn", "pages", "published", "title"]
    );
    assert!(registry::entity_attributes("ghost").is_empty());
    assert_eq!(registry::attribute_value_type("published"), Some("datetime"));
    assert_eq!(
        registry::attribute_values("genre"),
        &["fiction", "non-fiction", "poetry"]
    );

    let author = registry::role_info("authorship", "author").unwrap();
    assert_eq!(author.player_types, &["person"]);
    assert_eq!(author.min_card, 1);
    assert_eq!(author.card, Some("1.."));
    assert_eq!(registry::relation_roles("authorship").len(), 2);
    assert!(registry::role_info("authorship", "editor").is_none());

    assert_eq!(registry::entity_annotation("book", "label"), Some("Book"));
    assert_eq!(registry::entity_annotation("book", "searchable"), Some(""));
    assert_eq!(registry::entity_annotation("person", "label"), None);

    let function = registry::function("books_by").unwrap();
    assert_eq!(function.parameters, &[("author", "person")]);
    assert_eq!(function.return_type, Some("{ book }"));
}
