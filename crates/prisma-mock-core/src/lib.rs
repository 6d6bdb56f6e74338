pub mod catalogs;
pub mod defaults;
pub mod error;
pub mod json;
pub mod lexer;
pub mod parser;
pub mod types;

pub use catalogs::{PARSER_VERSION, TYPE_VOCABULARY};
pub use defaults::resolve_default;
pub use error::ParseError;
pub use json::{parse_to_json, render_catalog, CatalogDocument};
pub use lexer::normalize;
pub use parser::{parse_schema, resolve_type, scan};
pub use types::*;
