/// Errors raised while parsing a schema document.
///
/// Parsing is fail-fast: the first error aborts the whole document and no
/// partial catalog is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// A field's type token has no entry in the type vocabulary.
    #[error("unknown type `{token}`{}", location(.model, .field))]
    UnknownType {
        model: String,
        field: String,
        token: String,
    },

    /// `@default` without a usable parenthesized argument.
    #[error("malformed default clause `{clause}`{}", location(.model, .field))]
    MalformedDefault {
        model: String,
        field: String,
        clause: String,
    },

    /// A recognized generator keyword that is not implemented.
    #[error("default generator `{generator}` is not supported{}", location(.model, .field))]
    UnsupportedGenerator {
        model: String,
        field: String,
        generator: String,
    },

    /// A default literal that cannot be converted to the field's type.
    #[error(
        "cannot convert default `{literal}` to {expected}{}: {reason}",
        location(.model, .field)
    )]
    LiteralConversion {
        model: String,
        field: String,
        literal: String,
        expected: String,
        reason: String,
    },

    /// A field record without a type token.
    #[error("malformed field `{record}` in model `{model}`")]
    MalformedField { model: String, record: String },

    /// A block header that does not name a model.
    #[error("malformed block header `{header}`")]
    MalformedBlockHeader { header: String },

    /// Input ended inside a block.
    #[error("block `{name}` is never closed")]
    UnclosedBlock { name: String },

    /// Input ended inside a string opened outside any block.
    #[error("string literal `{fragment}` is never closed")]
    UnterminatedString { fragment: String },

    /// The same model declared in two merged catalogs.
    #[error("model `{name}` is declared more than once")]
    DuplicateModel { name: String },
}

impl ParseError {
    /// Attach model/field context to errors raised by the type and default
    /// resolvers, which do not know where they were called from.
    pub fn with_context(mut self, model_name: &str, field_name: &str) -> Self {
        match &mut self {
            ParseError::UnknownType { model, field, .. }
            | ParseError::MalformedDefault { model, field, .. }
            | ParseError::UnsupportedGenerator { model, field, .. }
            | ParseError::LiteralConversion { model, field, .. } => {
                *model = model_name.to_string();
                *field = field_name.to_string();
            }
            ParseError::MalformedField { .. }
            | ParseError::MalformedBlockHeader { .. }
            | ParseError::UnclosedBlock { .. }
            | ParseError::UnterminatedString { .. }
            | ParseError::DuplicateModel { .. } => {}
        }
        self
    }
}

fn location(model: &str, field: &str) -> String {
    match (model.is_empty(), field.is_empty()) {
        (true, true) => String::new(),
        (false, true) => format!(" in model `{model}`"),
        _ => format!(" on field `{model}.{field}`"),
    }
}
