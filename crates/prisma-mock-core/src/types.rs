use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Semantic types
// ---------------------------------------------------------------------------

/// Scalar types of the schema language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Int,
    Boolean,
    Float,
    Decimal,
    BigInt,
    DateTime,
    Json,
    Bytes,
}

impl ScalarType {
    pub const ALL: [ScalarType; 9] = [
        ScalarType::String,
        ScalarType::Int,
        ScalarType::Boolean,
        ScalarType::Float,
        ScalarType::Decimal,
        ScalarType::BigInt,
        ScalarType::DateTime,
        ScalarType::Json,
        ScalarType::Bytes,
    ];

    /// Schema token for the required form of this scalar.
    pub fn token(self) -> &'static str {
        match self {
            ScalarType::String => "String",
            ScalarType::Int => "Int",
            ScalarType::Boolean => "Boolean",
            ScalarType::Float => "Float",
            ScalarType::Decimal => "Decimal",
            ScalarType::BigInt => "BigInt",
            ScalarType::DateTime => "DateTime",
            ScalarType::Json => "Json",
            ScalarType::Bytes => "Bytes",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A resolved field type: a scalar, an optional scalar, or a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Scalar(ScalarType),
    Optional(ScalarType),
    List(Box<SemanticType>),
}

impl SemanticType {
    pub fn list_of(inner: SemanticType) -> Self {
        SemanticType::List(Box::new(inner))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, SemanticType::Optional(_))
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Scalar(s) => write!(f, "{s}"),
            SemanticType::Optional(s) => write!(f, "{s}?"),
            SemanticType::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

impl Serialize for SemanticType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Default values
// ---------------------------------------------------------------------------

/// A value produced by a field's default producer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    String(String),
    Int(i64),
    BigInt(i64),
    Boolean(bool),
    Float(f64),
    Decimal(Decimal),
    DateTime(DateTime<Utc>),
    Json(serde_json::Value),
    Bytes(Vec<u8>),
    List(Vec<Value>),
}

/// The expression inside `@default(...)`, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultExpr {
    /// `now()`: current UTC timestamp at call time.
    Now,
    /// `uuid()`: fresh v4 identifier per call.
    Uuid,
    /// `cuid()`: recognized but not supported.
    Cuid,
    /// Anything else, converted to the field's type.
    Literal(String),
}

impl DefaultExpr {
    pub fn classify(argument: &str) -> Self {
        match argument {
            "now()" => DefaultExpr::Now,
            "uuid()" => DefaultExpr::Uuid,
            "cuid()" => DefaultExpr::Cuid,
            other => DefaultExpr::Literal(other.to_string()),
        }
    }
}

impl fmt::Display for DefaultExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultExpr::Now => f.write_str("now()"),
            DefaultExpr::Uuid => f.write_str("uuid()"),
            DefaultExpr::Cuid => f.write_str("cuid()"),
            DefaultExpr::Literal(text) => f.write_str(text),
        }
    }
}

/// Zero-argument function yielding a field's default value.
#[derive(Clone)]
pub struct DefaultProducer {
    expr: DefaultExpr,
    produce: Arc<dyn Fn() -> Value + Send + Sync>,
}

impl DefaultProducer {
    pub fn new(expr: DefaultExpr, produce: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self {
            expr,
            produce: Arc::new(produce),
        }
    }

    pub fn expr(&self) -> &DefaultExpr {
        &self.expr
    }

    pub fn produce(&self) -> Value {
        (self.produce)()
    }
}

impl fmt::Debug for DefaultProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DefaultProducer({})", self.expr)
    }
}

// ---------------------------------------------------------------------------
// Field descriptors and the catalog
// ---------------------------------------------------------------------------

/// One declared field of one model.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub semantic_type: SemanticType,
    /// The type token exactly as written in the schema.
    pub source_type: String,
    pub default: Option<DefaultProducer>,
    pub nullable: bool,
}

impl FieldDescriptor {
    /// Nullability follows the resolved type: only `T?` fields are nullable.
    pub fn new(name: &str, semantic_type: SemanticType, source_type: &str) -> Self {
        Self {
            name: name.to_string(),
            nullable: semantic_type.is_optional(),
            semantic_type,
            source_type: source_type.to_string(),
            default: None,
        }
    }

    pub fn with_default(mut self, producer: DefaultProducer) -> Self {
        self.default = Some(producer);
        self
    }

    /// Invoke the default producer, if any.
    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(DefaultProducer::produce)
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (source: {}, nullable: {}",
            self.name, self.semantic_type, self.source_type, self.nullable
        )?;
        if let Some(producer) = &self.default {
            write!(f, ", default: {}", producer.expr())?;
        }
        f.write_str(")")
    }
}

/// Model name → fields in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    models: BTreeMap<String, Vec<FieldDescriptor>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty field list for `name`. Returns true if an earlier
    /// declaration was replaced.
    pub(crate) fn register_model(&mut self, name: &str) -> bool {
        self.models.insert(name.to_string(), Vec::new()).is_some()
    }

    pub(crate) fn push_field(&mut self, model: &str, field: FieldDescriptor) {
        self.models.entry(model.to_string()).or_default().push(field);
    }

    pub fn get(&self, model: &str) -> Option<&[FieldDescriptor]> {
        self.models.get(model).map(Vec::as_slice)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldDescriptor])> {
        self.models.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Move every model of `other` into this catalog. A model name present
    /// in both is an error and leaves `self` untouched.
    pub fn merge(&mut self, other: Catalog) -> Result<(), ParseError> {
        if let Some(name) = other.model_names().find(|name| self.contains(name)) {
            return Err(ParseError::DuplicateModel {
                name: name.to_string(),
            });
        }
        self.models.extend(other.models);
        Ok(())
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (model, fields) in &self.models {
            writeln!(f, "model {model}")?;
            for field in fields {
                writeln!(f, "  {field}")?;
            }
        }
        Ok(())
    }
}
