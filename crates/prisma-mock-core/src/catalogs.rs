use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::types::{ScalarType, SemanticType};

/// Schema type tokens and the semantic types they resolve to.
/// Every scalar appears in a required and a `?`-suffixed form; list types
/// are built by wrapping an entry, never stored here. Tokens not in this
/// table are rejected.
pub static TYPE_VOCABULARY: LazyLock<HashMap<&'static str, SemanticType>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("String", SemanticType::Scalar(ScalarType::String));
    m.insert("String?", SemanticType::Optional(ScalarType::String));
    m.insert("Int", SemanticType::Scalar(ScalarType::Int));
    m.insert("Int?", SemanticType::Optional(ScalarType::Int));
    m.insert("Boolean", SemanticType::Scalar(ScalarType::Boolean));
    m.insert("Boolean?", SemanticType::Optional(ScalarType::Boolean));
    m.insert("Float", SemanticType::Scalar(ScalarType::Float));
    m.insert("Float?", SemanticType::Optional(ScalarType::Float));
    m.insert("Decimal", SemanticType::Scalar(ScalarType::Decimal));
    m.insert("Decimal?", SemanticType::Optional(ScalarType::Decimal));
    m.insert("BigInt", SemanticType::Scalar(ScalarType::BigInt));
    m.insert("BigInt?", SemanticType::Optional(ScalarType::BigInt));
    m.insert("DateTime", SemanticType::Scalar(ScalarType::DateTime));
    m.insert("DateTime?", SemanticType::Optional(ScalarType::DateTime));
    m.insert("Json", SemanticType::Scalar(ScalarType::Json));
    m.insert("Json?", SemanticType::Optional(ScalarType::Json));
    m.insert("Bytes", SemanticType::Scalar(ScalarType::Bytes));
    m.insert("Bytes?", SemanticType::Optional(ScalarType::Bytes));
    m
});

/// Block keywords whose bodies never contribute models.
pub static SKIPPED_BLOCK_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut s = HashSet::new();
    // Configuration blocks
    s.insert("datasource");
    s.insert("generator");
    // Enumerations declare values, not fields
    s.insert("enum");
    s
});

pub const PARSER_VERSION: &str = "0.1.0";
