use std::borrow::Cow;
use std::str::FromStr;

use base64::prelude::*;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ParseError;
use crate::types::{DefaultExpr, DefaultProducer, ScalarType, SemanticType, Value};

const DEFAULT_ATTRIBUTE: &str = "@default";

/// Locate the `@default(...)` clause in a field record. The clause runs to
/// the balanced closing parenthesis, or to the next whitespace when it has
/// no argument list.
pub fn find_default_clause(record: &str) -> Option<&str> {
    let start = record.find(DEFAULT_ATTRIBUTE)?;
    let rest = &record[start..];
    let end = if rest[DEFAULT_ATTRIBUTE.len()..].starts_with('(') {
        find_balanced_paren(rest, DEFAULT_ATTRIBUTE.len()).map_or(rest.len(), |close| close + 1)
    } else {
        rest.find(char::is_whitespace).unwrap_or(rest.len())
    };
    Some(&rest[..end])
}

/// Turn a `@default(...)` clause into a producer for a field of type
/// `semantic_type`.
///
/// `now()` and `uuid()` yield a fresh value on every call. Literals are
/// converted once, here, so a bad literal fails the parse instead of the
/// first call.
pub fn resolve_default(
    clause: &str,
    semantic_type: &SemanticType,
) -> Result<DefaultProducer, ParseError> {
    let expr = DefaultExpr::classify(default_argument(clause)?);

    match &expr {
        DefaultExpr::Now => {
            require_generator_type(&expr, semantic_type, ScalarType::DateTime)?;
            Ok(DefaultProducer::new(expr.clone(), || {
                Value::DateTime(Utc::now())
            }))
        }
        DefaultExpr::Uuid => {
            require_generator_type(&expr, semantic_type, ScalarType::String)?;
            Ok(DefaultProducer::new(expr.clone(), || {
                Value::String(Uuid::new_v4().to_string())
            }))
        }
        DefaultExpr::Cuid => Err(ParseError::UnsupportedGenerator {
            model: String::new(),
            field: String::new(),
            generator: expr.to_string(),
        }),
        DefaultExpr::Literal(literal) => {
            let value = convert_literal(literal, semantic_type)?;
            Ok(DefaultProducer::new(expr.clone(), move || value.clone()))
        }
    }
}

fn default_argument(clause: &str) -> Result<&str, ParseError> {
    let malformed = || ParseError::MalformedDefault {
        model: String::new(),
        field: String::new(),
        clause: clause.to_string(),
    };
    let open = clause.find('(').ok_or_else(malformed)?;
    let close = find_balanced_paren(clause, open).ok_or_else(malformed)?;
    let argument = clause[open + 1..close].trim();
    if argument.is_empty() {
        return Err(malformed());
    }
    Ok(argument)
}

fn require_generator_type(
    expr: &DefaultExpr,
    semantic_type: &SemanticType,
    scalar: ScalarType,
) -> Result<(), ParseError> {
    match semantic_type {
        SemanticType::Scalar(s) | SemanticType::Optional(s) if *s == scalar => Ok(()),
        _ => Err(ParseError::LiteralConversion {
            model: String::new(),
            field: String::new(),
            literal: expr.to_string(),
            expected: semantic_type.to_string(),
            reason: format!("{expr} only produces {scalar} values"),
        }),
    }
}

/// Convert a default literal to a value of `semantic_type`.
pub fn convert_literal(literal: &str, semantic_type: &SemanticType) -> Result<Value, ParseError> {
    match semantic_type {
        SemanticType::Scalar(scalar) => convert_scalar(literal, *scalar),
        SemanticType::Optional(_) if literal == "null" => Ok(Value::Null),
        SemanticType::Optional(scalar) => convert_scalar(literal, *scalar),
        SemanticType::List(inner) => {
            let body = literal
                .strip_prefix('[')
                .and_then(|l| l.strip_suffix(']'))
                .ok_or_else(|| ParseError::LiteralConversion {
                    model: String::new(),
                    field: String::new(),
                    literal: literal.to_string(),
                    expected: semantic_type.to_string(),
                    reason: "list defaults must be written as [a, b, ...]".to_string(),
                })?;
            if body.trim().is_empty() {
                return Ok(Value::List(Vec::new()));
            }
            split_top_level(body)
                .into_iter()
                .map(|item| convert_literal(item.trim(), inner))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        }
    }
}

fn convert_scalar(literal: &str, scalar: ScalarType) -> Result<Value, ParseError> {
    let fail = |reason: String| ParseError::LiteralConversion {
        model: String::new(),
        field: String::new(),
        literal: literal.to_string(),
        expected: scalar.to_string(),
        reason,
    };

    match scalar {
        ScalarType::String => Ok(Value::String(unquote(literal).into_owned())),
        ScalarType::Int => literal
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| fail(e.to_string())),
        ScalarType::BigInt => literal
            .parse::<i64>()
            .map(Value::BigInt)
            .map_err(|e| fail(e.to_string())),
        ScalarType::Float => literal
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| fail(e.to_string())),
        ScalarType::Decimal => Decimal::from_str(literal)
            .map(Value::Decimal)
            .map_err(|e| fail(e.to_string())),
        ScalarType::Boolean => match literal {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(fail("expected `true` or `false`".to_string())),
        },
        ScalarType::DateTime => parse_timestamp(&unquote(literal))
            .map(Value::DateTime)
            .ok_or_else(|| fail("unrecognized date/time format".to_string())),
        ScalarType::Json => serde_json::from_str(&unquote(literal))
            .map(Value::Json)
            .map_err(|e| fail(e.to_string())),
        ScalarType::Bytes => BASE64_STANDARD
            .decode(unquote(literal).as_bytes())
            .map(Value::Bytes)
            .map_err(|e| fail(e.to_string())),
    }
}

/// Accepts RFC 3339 and the common `YYYY-MM-DD[ HH:MM:SS]` shapes (UTC).
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Strip surrounding double quotes, resolving escapes when possible.
fn unquote(literal: &str) -> Cow<'_, str> {
    match literal
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
    {
        Some(inner) => serde_json::from_str::<String>(literal)
            .map(Cow::Owned)
            .unwrap_or(Cow::Borrowed(inner)),
        None => Cow::Borrowed(literal),
    }
}

/// Index of the `)` matching the `(` at `open_pos`, skipping quoted text.
fn find_balanced_paren(s: &str, open_pos: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut i = open_pos;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'"' => i = find_closing_quote(s, i)?,
            _ => {}
        }
        i += 1;
    }
    None
}

fn find_closing_quote(s: &str, open_pos: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = open_pos + 1;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == b'"' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Split on commas that are not nested in brackets, braces or quotes.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        if in_quotes {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}
