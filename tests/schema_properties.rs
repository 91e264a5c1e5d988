//! End-to-end properties of parsing, inheritance and view building.

use pretty_assertions::assert_eq;
use tqlgen::codegen::{
    DtoBuilder, DtoConfig, ModelBuilder, ModelConfig, RegistryBuilder, RegistryConfig,
    RolePlayers,
};
use tqlgen::schema::{Schema, SchemaError, ThingType, parse_schema};

fn accumulated(source: &str) -> Schema {
    let mut schema = parse_schema(source).expect("schema should parse");
    schema
        .accumulate_inheritance()
        .expect("inheritance should resolve");
    schema
}

fn owned(schema: &Schema, name: &str) -> Vec<String> {
    let thing = schema.thing(name).expect("type should exist");
    let mut names: Vec<String> = thing.owns().iter().map(|o| o.attribute.to_string()).collect();
    names.sort();
    names
}

#[test]
fn test_descriptor_counts_match_declarations() {
    let schema = parse_schema(
        r#"define
        attribute a, value string;
        attribute b, value integer;
        attribute c, value boolean @values("x");
        entity e1;
        entity e2 sub e1;
        relation r1, relates x;
        struct s1: f value string;
        fun f1() -> integer: match $x isa e1; return count;
        fun f2($p: string) -> { string }: match $x isa e2; return { $p };
        "#,
    )
    .unwrap();
    let stats = schema.stats();
    assert_eq!(
        (
            stats.attributes,
            stats.entities,
            stats.relations,
            stats.structs,
            stats.functions
        ),
        (3, 2, 1, 1, 2)
    );
}

#[test]
fn test_transitive_inheritance() {
    let schema = accumulated(
        "define
        attribute x, value string;
        attribute y, value string;
        attribute z, value string;
        entity a, owns x;
        entity b sub a, owns y;
        entity c sub b, owns z;",
    );
    assert_eq!(owned(&schema, "c"), vec!["x", "y", "z"]);
    assert_eq!(owned(&schema, "b"), vec!["x", "y"]);
    assert_eq!(owned(&schema, "a"), vec!["x"]);
}

#[test]
fn test_child_redeclaration_wins() {
    let schema = accumulated(
        "define
        attribute code, value string;
        entity base, owns code @card(0..1);
        entity child sub base, owns code @key;",
    );
    let child = schema.entity("child").unwrap();
    let code: Vec<_> = child.owns.iter().filter(|o| o.attribute == "code").collect();
    assert_eq!(code.len(), 1);
    assert!(code[0].key);
    assert!(code[0].is_required());
}

#[test]
fn test_accumulation_is_idempotent() {
    let source = "define
        attribute x, value string;
        attribute y, value string;
        relation link, relates end, owns x;
        relation strong-link sub link, relates end, owns y;
        entity a, owns x @card(1);
        entity b sub a, owns y;
        entity c sub b;";
    let once = accumulated(source);
    let mut twice = once.clone();
    twice.accumulate_inheritance().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_cyclic_chain_is_rejected() {
    let mut schema = parse_schema("define entity a sub c; entity b sub a; entity c sub b;").unwrap();
    let err = schema.accumulate_inheritance().unwrap_err();
    assert!(matches!(err, SchemaError::CyclicInheritance { .. }));
}

#[test]
fn test_required_classification() {
    let schema = parse_schema(
        "define
        entity t,
            owns k @key,
            owns u @unique,
            owns open @card(0..),
            owns opt @card(0..1),
            owns plain,
            owns one @card(1),
            owns many @card(2..5);",
    )
    .unwrap();
    let t = schema.entity("t").unwrap();
    let required = |name: &str| t.owned(name).unwrap().is_required();
    assert!(required("k"));
    assert!(required("u"));
    assert!(!required("open"));
    assert!(!required("opt"));
    assert!(!required("plain"));
    assert!(required("one"));
    assert!(required("many"));
}

#[test]
fn test_role_player_specificity() {
    let schema = accumulated(
        "define
        entity party, plays contract:signer;
        entity organisation sub party, plays contract:signer;
        entity company sub organisation, plays contract:signer;
        entity person, plays contract:signer;
        relation contract, relates signer, relates witness;",
    );
    let players = RolePlayers::new(&schema);
    assert_eq!(players.players("contract", "signer"), vec!["company", "person"]);
    assert!(players.players("contract", "witness").is_empty());
}

#[test]
fn test_key_text_and_optional_integer_fields() {
    let schema = accumulated(
        "define
        attribute name, value string;
        attribute age, value integer;
        entity person, owns name @key, owns age @card(0..1);",
    );
    let view = ModelBuilder::new(&ModelConfig::default()).build(&schema);
    let fields: Vec<_> = view.entities[0]
        .fields
        .iter()
        .map(|f| (f.ident.as_str(), f.ty.as_str()))
        .collect();
    assert!(fields.contains(&("name", "String")));
    assert!(fields.contains(&("age", "Option<i64>")));
}

#[test]
fn test_abstract_supertype_is_skipped() {
    let schema = accumulated(
        "define
        attribute title, value string;
        attribute pages, value integer;
        entity work @abstract, owns title @key;
        entity book sub work, owns pages;",
    );

    let model = ModelBuilder::new(&ModelConfig::default()).build(&schema);
    let names: Vec<_> = model.entities.iter().map(|e| e.type_name.as_str()).collect();
    assert_eq!(names, vec!["book"]);
    let idents: Vec<_> = model.entities[0].fields.iter().map(|f| f.ident.as_str()).collect();
    assert_eq!(idents, vec!["iid", "pages", "title"]);

    let dto = DtoBuilder::new(&DtoConfig::default()).build(&schema);
    assert_eq!(dto.concrete_entities, vec!["book"]);
}

#[test]
fn test_registry_lists_are_sorted() {
    let schema = accumulated(
        "define
        attribute zeta, value string;
        attribute alpha, value string;
        entity zoo, owns zeta, owns alpha;
        entity ant;
        relation zap, relates z;
        relation amp, relates a;",
    );
    let view = RegistryBuilder::new(&RegistryConfig::default())
        .build(&schema)
        .unwrap();
    assert_eq!(view.all_entities, vec!["ant", "zoo"]);
    assert_eq!(view.all_relations, vec!["amp", "zap"]);
    assert_eq!(view.all_attributes, vec!["alpha", "zeta"]);
    let zoo = view
        .entity_attributes
        .iter()
        .find(|(name, _)| name == "zoo")
        .unwrap();
    assert_eq!(zoo.1, vec!["alpha", "zeta"]);
    assert!(view.relation_roles.iter().all(|(_, roles)| roles[0].players.is_empty()));
}
