use prisma_mock_core::{
    normalize, parse_schema, resolve_default, resolve_type, scan, DefaultExpr, ParseError,
    ScalarType, SemanticType, Value, TYPE_VOCABULARY,
};
use pretty_assertions::assert_eq;

fn names(fields: &[prisma_mock_core::FieldDescriptor]) -> Vec<&str> {
    fields.iter().map(|f| f.name.as_str()).collect()
}

// ===========================================================================
// Documented examples
// ===========================================================================

#[test]
fn conformance_user_model() {
    let input = r#"model User {
  id String @default(uuid())
  age Int?
  tags [String]
}"#;

    let catalog = scan(&normalize(input)).unwrap();
    assert_eq!(catalog.model_names().collect::<Vec<_>>(), vec!["User"]);

    let user = catalog.get("User").unwrap();
    assert_eq!(names(user), vec!["id", "age", "tags"]);

    let id = &user[0];
    assert_eq!(id.semantic_type, SemanticType::Scalar(ScalarType::String));
    assert_eq!(id.default.as_ref().unwrap().expr(), &DefaultExpr::Uuid);
    let first = id.default_value().unwrap();
    let second = id.default_value().unwrap();
    assert_ne!(first, second);

    let age = &user[1];
    assert_eq!(age.semantic_type, SemanticType::Optional(ScalarType::Int));
    assert!(age.default.is_none());

    let tags = &user[2];
    assert_eq!(
        tags.semantic_type,
        SemanticType::list_of(SemanticType::Scalar(ScalarType::String))
    );
    assert!(tags.default.is_none());
}

#[test]
fn conformance_datasource_is_not_a_model() {
    let input = r#"datasource db { provider = "postgresql" }
model User {
  id String
}
"#;

    let catalog = parse_schema(input).unwrap();
    assert_eq!(catalog.model_names().collect::<Vec<_>>(), vec!["User"]);
    assert!(!catalog.contains("db"));
}

#[test]
fn conformance_unknown_type_returns_no_catalog() {
    let input = "model Shop {\n  id Int\n  item Widget\n}\n";
    let result = parse_schema(input);
    assert!(matches!(
        result,
        Err(ParseError::UnknownType { ref token, .. }) if token == "Widget"
    ));
}

// ===========================================================================
// A realistic schema
// ===========================================================================

const BLOG_SCHEMA: &str = r#"
datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}

generator client {
  provider             = "prisma-client-py"
  recursive_type_depth = 5
}

model User {
  id        String   @id @default(uuid())
  email     String   @unique
  name      String?
  role      String   @default("member")
  karma     Int      @default(0)
  createdAt DateTime @default(now())
  settings  Json?
}

model Post {
  id        String    @id @default(uuid())
  title     String
  published Boolean   @default(false)
  rating    Float?
  price     Decimal   @default(9.99)
  views     BigInt    @default(0)
  cover     Bytes?
  tags      [String]
  postedAt  DateTime? @default("2024-01-01T00:00:00Z")
}
"#;

#[test]
fn conformance_blog_schema() {
    let catalog = parse_schema(BLOG_SCHEMA).unwrap();
    assert_eq!(catalog.len(), 2);

    let user = catalog.get("User").unwrap();
    assert_eq!(
        names(user),
        vec!["id", "email", "name", "role", "karma", "createdAt", "settings"]
    );
    assert_eq!(user[3].default_value(), Some(Value::String("member".into())));
    assert_eq!(user[4].default_value(), Some(Value::Int(0)));
    assert!(matches!(user[5].default_value(), Some(Value::DateTime(_))));
    assert!(user[6].nullable);
    assert!(!user[1].nullable);

    let post = catalog.get("Post").unwrap();
    assert_eq!(post.len(), 9);
    assert_eq!(post[2].default_value(), Some(Value::Boolean(false)));
    assert_eq!(post[5].default_value(), Some(Value::BigInt(0)));
    assert_eq!(post[6].semantic_type, SemanticType::Optional(ScalarType::Bytes));
    assert_eq!(post[7].source_type, "[String]");
    assert!(matches!(post[8].default_value(), Some(Value::DateTime(_))));
}

#[test]
fn conformance_tabs_and_blank_lines() {
    let input = "model\tTabbed {\n\n\n    a Int\n\n\n    b String?\n}\n\n\n";
    // Tabs are dropped entirely, so `model\tTabbed` glues into one word.
    let err = parse_schema(input).unwrap_err();
    assert!(matches!(err, ParseError::MalformedBlockHeader { .. }));

    let input = "model  Spaced  {\n\n\n    a Int\n\n\n    b String?\n}\n\n\n";
    let catalog = parse_schema(input).unwrap();
    assert_eq!(names(catalog.get("Spaced").unwrap()), vec!["a", "b"]);
}

#[test]
fn conformance_crlf_line_endings() {
    let input = "model A {\r\n  x Int\r\n  y String\r\n}\r\n";
    let catalog = parse_schema(input).unwrap();
    assert_eq!(names(catalog.get("A").unwrap()), vec!["x", "y"]);
}

// ===========================================================================
// Type resolution and defaults through the public API
// ===========================================================================

#[test]
fn conformance_vocabulary_round_trip() {
    for (token, expected) in TYPE_VOCABULARY.iter() {
        assert_eq!(&resolve_type(token).unwrap(), expected);
        assert_eq!(
            resolve_type(&format!("[{token}]")).unwrap(),
            SemanticType::list_of(expected.clone())
        );
    }
}

#[test]
fn conformance_now_is_lazy() {
    let producer = resolve_default(
        "@default(now())",
        &SemanticType::Scalar(ScalarType::DateTime),
    )
    .unwrap();
    let mut previous = None;
    for _ in 0..5 {
        let Value::DateTime(at) = producer.produce() else {
            panic!("now() must produce timestamps");
        };
        if let Some(prev) = previous {
            assert!(prev <= at);
        }
        previous = Some(at);
    }
}

#[test]
fn conformance_fail_fast_on_first_error() {
    let input = "model A {\n  x Int\n}\nmodel B {\n  y Int @default(cuid())\n}\nmodel C {\n  z Widget\n}\n";
    let err = parse_schema(input).unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedGenerator { ref model, .. } if model == "B"));
}
