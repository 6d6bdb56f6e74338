//! JSON view of a catalog for the CLI and other string-in/string-out callers.
//!
//! Default producers are rendered by kind; literal defaults carry the value
//! they produce.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalogs::PARSER_VERSION;
use crate::parse_schema;
use crate::types::*;

// ---------------------------------------------------------------------------
// Rendered shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CatalogDocument<'a> {
    #[serde(rename = "parserVersion")]
    pub parser_version: &'static str,
    pub models: BTreeMap<&'a str, Vec<FieldDocument<'a>>>,
}

#[derive(Debug, Serialize)]
pub struct FieldDocument<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub semantic_type: &'a SemanticType,
    #[serde(rename = "sourceType")]
    pub source_type: &'a str,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultDocument>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DefaultDocument {
    Now,
    Uuid,
    Cuid,
    Literal { value: Value },
}

#[derive(Debug, Serialize)]
pub struct JsonResult<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Borrowing, serializable view of `catalog`.
pub fn render_catalog(catalog: &Catalog) -> CatalogDocument<'_> {
    let models = catalog
        .iter()
        .map(|(name, fields)| (name, fields.iter().map(render_field).collect()))
        .collect();
    CatalogDocument {
        parser_version: PARSER_VERSION,
        models,
    }
}

fn render_field(field: &FieldDescriptor) -> FieldDocument<'_> {
    FieldDocument {
        name: &field.name,
        semantic_type: &field.semantic_type,
        source_type: &field.source_type,
        nullable: field.nullable,
        default: field.default.as_ref().map(|producer| match producer.expr() {
            DefaultExpr::Now => DefaultDocument::Now,
            DefaultExpr::Uuid => DefaultDocument::Uuid,
            DefaultExpr::Cuid => DefaultDocument::Cuid,
            DefaultExpr::Literal(_) => DefaultDocument::Literal {
                value: producer.produce(),
            },
        }),
    }
}

/// Parse a schema document and return the catalog as JSON.
///
/// Output: `{ "success": true, "data": { ... } }` or
/// `{ "success": false, "error": "..." }`.
pub fn parse_to_json(content: &str) -> String {
    let result = std::panic::catch_unwind(|| parse_schema(content));

    match result {
        Ok(Ok(catalog)) => to_json_string(&JsonResult {
            success: true,
            data: Some(render_catalog(&catalog)),
            error: None,
        }),
        Ok(Err(e)) => to_json_string(&JsonResult::<()> {
            success: false,
            data: None,
            error: Some(e.to_string()),
        }),
        Err(_) => to_json_string(&JsonResult::<()> {
            success: false,
            data: None,
            error: Some("Internal parser panic".to_string()),
        }),
    }
}

fn to_json_string<T: Serialize>(result: &JsonResult<T>) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| {
        serde_json::json!({
            "success": false,
            "error": format!("JSON serialization error: {e}"),
        })
        .to_string()
    })
}
