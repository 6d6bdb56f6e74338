use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::catalogs::{SKIPPED_BLOCK_KEYWORDS, TYPE_VOCABULARY};
use crate::defaults::{find_default_clause, resolve_default};
use crate::error::ParseError;
use crate::lexer::normalize;
use crate::types::*;

static RE_BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(\S+)\]").unwrap());
static RE_LIST_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)\[\]$").unwrap());

/// Normalize and scan a schema document into a catalog.
pub fn parse_schema(raw: &str) -> Result<Catalog, ParseError> {
    scan(&normalize(raw))
}

/// Scan normalized schema text into a catalog.
pub fn scan(normalized: &str) -> Result<Catalog, ParseError> {
    let mut scanner = Scanner::default();
    for ch in normalized.chars() {
        scanner.step(ch)?;
    }
    scanner.finish()
}

/// Resolve a schema type token: `T`, `T?`, `[T]` or `T[]`.
pub fn resolve_type(token: &str) -> Result<SemanticType, ParseError> {
    if let Some(caps) = RE_BRACKETED
        .captures(token)
        .or_else(|| RE_LIST_SUFFIX.captures(token))
    {
        return lookup(&caps[1]).map(SemanticType::list_of);
    }
    lookup(token)
}

fn lookup(token: &str) -> Result<SemanticType, ParseError> {
    TYPE_VOCABULARY
        .get(token)
        .cloned()
        .ok_or_else(|| ParseError::UnknownType {
            model: String::new(),
            field: String::new(),
            token: token.to_string(),
        })
}

// --- Scanner state ---

#[derive(Debug, Clone, PartialEq)]
enum ScanState {
    TopLevel,
    /// Inside a datasource/generator/enum body; `depth` counts nested braces.
    SkipBlock { depth: usize },
    ModelBody { model: String },
    /// Inside a double-quoted string; `resume` is the state to return to.
    Quoted {
        resume: Box<ScanState>,
        escaped: bool,
    },
}

struct Scanner {
    state: ScanState,
    buffer: String,
    catalog: Catalog,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            state: ScanState::TopLevel,
            buffer: String::new(),
            catalog: Catalog::new(),
        }
    }
}

impl Scanner {
    fn step(&mut self, ch: char) -> Result<(), ParseError> {
        let state = std::mem::replace(&mut self.state, ScanState::TopLevel);
        self.state = self.transition(state, ch)?;
        Ok(())
    }

    fn transition(&mut self, state: ScanState, ch: char) -> Result<ScanState, ParseError> {
        match (state, ch) {
            (ScanState::Quoted { resume, escaped }, _) => {
                self.buffer.push(ch);
                Ok(match ch {
                    _ if escaped => ScanState::Quoted {
                        resume,
                        escaped: false,
                    },
                    '\\' => ScanState::Quoted {
                        resume,
                        escaped: true,
                    },
                    '"' => *resume,
                    _ => ScanState::Quoted {
                        resume,
                        escaped: false,
                    },
                })
            }

            // Skipped blocks only track brace depth.
            (ScanState::SkipBlock { depth }, '{') => Ok(ScanState::SkipBlock { depth: depth + 1 }),
            (ScanState::SkipBlock { depth: 0 }, '}') => {
                debug!("closed skipped block");
                Ok(ScanState::TopLevel)
            }
            (ScanState::SkipBlock { depth }, '}') => Ok(ScanState::SkipBlock { depth: depth - 1 }),
            (state @ ScanState::SkipBlock { .. }, _) => Ok(state),

            (ScanState::TopLevel, '{') => self.open_block(),
            (ScanState::TopLevel, '}') => {
                debug!("ignoring closing brace outside any block");
                Ok(ScanState::TopLevel)
            }
            (ScanState::TopLevel, '\n') => {
                // Keep words on separate lines apart in the next header.
                if !self.buffer.is_empty() {
                    self.buffer.push(' ');
                }
                Ok(ScanState::TopLevel)
            }

            (ScanState::ModelBody { .. }, '{') => Err(ParseError::MalformedBlockHeader {
                header: format!("{} {{", self.buffer.trim()),
            }),
            (ScanState::ModelBody { model }, '}') => {
                self.flush_record(&model)?;
                debug!(model = %model, "closed model block");
                Ok(ScanState::TopLevel)
            }
            (ScanState::ModelBody { model }, '\n') => {
                self.flush_record(&model)?;
                Ok(ScanState::ModelBody { model })
            }

            (state, '"') => {
                self.buffer.push(ch);
                Ok(ScanState::Quoted {
                    resume: Box::new(state),
                    escaped: false,
                })
            }
            (state, _) => {
                self.buffer.push(ch);
                Ok(state)
            }
        }
    }

    fn open_block(&mut self) -> Result<ScanState, ParseError> {
        let header = std::mem::take(&mut self.buffer);
        let words: Vec<&str> = header.split_whitespace().collect();

        if let Some(keyword) = words.iter().find(|w| SKIPPED_BLOCK_KEYWORDS.contains(**w)) {
            debug!(keyword = *keyword, header = header.trim(), "skipping block");
            return Ok(ScanState::SkipBlock { depth: 0 });
        }

        let Some(&name) = words.get(1) else {
            return Err(ParseError::MalformedBlockHeader {
                header: header.trim().to_string(),
            });
        };

        if self.catalog.register_model(name) {
            warn!(model = name, "model declared twice; keeping the later declaration");
        }
        debug!(model = name, "opened model block");
        Ok(ScanState::ModelBody {
            model: name.to_string(),
        })
    }

    fn flush_record(&mut self, model: &str) -> Result<(), ParseError> {
        let record = std::mem::take(&mut self.buffer);
        if let Some(field) = parse_field_record(&record, model)? {
            self.catalog.push_field(model, field);
        }
        Ok(())
    }

    fn finish(self) -> Result<Catalog, ParseError> {
        match self.state {
            ScanState::TopLevel => Ok(self.catalog),
            ScanState::ModelBody { model } => Err(ParseError::UnclosedBlock { name: model }),
            ScanState::SkipBlock { .. } => Err(ParseError::UnclosedBlock {
                name: "<skipped block>".to_string(),
            }),
            ScanState::Quoted { resume, .. } => match *resume {
                ScanState::ModelBody { model } => Err(ParseError::UnclosedBlock { name: model }),
                // Everything after the opening quote was swallowed.
                _ => Err(ParseError::UnterminatedString {
                    fragment: unterminated_fragment(&self.buffer),
                }),
            },
        }
    }
}

/// The first line of an unterminated string, starting at its opening quote.
fn unterminated_fragment(buffer: &str) -> String {
    let start = buffer.find('"').unwrap_or(0);
    buffer[start..].lines().next().unwrap_or_default().to_string()
}

/// Parse one line of a model body: `name type [attributes...]`.
/// Blank lines and `@@` block attributes yield no field.
fn parse_field_record(record: &str, model: &str) -> Result<Option<FieldDescriptor>, ParseError> {
    let mut words = record.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    if name.starts_with("@@") {
        debug!(model, record = record.trim(), "skipping block attribute");
        return Ok(None);
    }
    let Some(type_token) = words.next() else {
        return Err(ParseError::MalformedField {
            model: model.to_string(),
            record: record.trim().to_string(),
        });
    };

    let semantic_type = resolve_type(type_token).map_err(|e| e.with_context(model, name))?;
    let mut field = FieldDescriptor::new(name, semantic_type, type_token);

    if let Some(clause) = find_default_clause(record) {
        let producer = resolve_default(clause, &field.semantic_type)
            .map_err(|e| e.with_context(model, name))?;
        field = field.with_default(producer);
    }

    debug!(model, field = name, semantic_type = %field.semantic_type, "parsed field");
    Ok(Some(field))
}
