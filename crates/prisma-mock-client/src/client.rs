use prisma_mock_core::{parse_schema, Catalog};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ClientError;
use crate::method::PrismaMethod;

/// In-memory rows for one model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub model: String,
    pub rows: Vec<Map<String, Value>>,
}

impl Table {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            rows: Vec::new(),
        }
    }
}

/// Operations every Prisma client exposes.
pub trait PrismaClient {
    fn connect(&mut self) -> Result<(), ClientError>;
    fn disconnect(&mut self) -> Result<(), ClientError>;
    fn is_connected(&self) -> bool;

    /// Run one query. `model` is `None` for raw operations.
    fn execute(
        &self,
        method: PrismaMethod,
        arguments: &Value,
        model: Option<&str>,
        root_selection: Option<&[String]>,
    ) -> Result<Value, ClientError>;
}

/// A client that stands in for a real database connection in tests.
#[derive(Debug, Default)]
pub struct MockClient {
    pub tables: Vec<Table>,
    catalog: Option<Catalog>,
    connected: bool,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client whose models come from a Prisma schema document.
    pub fn from_schema(schema: &str) -> Result<Self, ClientError> {
        let catalog = parse_schema(schema)?;
        debug!(models = catalog.len(), "mock client loaded schema");
        Ok(Self {
            catalog: Some(catalog),
            ..Self::default()
        })
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }
}

impl PrismaClient for MockClient {
    fn connect(&mut self) -> Result<(), ClientError> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ClientError> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn execute(
        &self,
        method: PrismaMethod,
        arguments: &Value,
        model: Option<&str>,
        root_selection: Option<&[String]>,
    ) -> Result<Value, ClientError> {
        debug!(
            %method,
            model = model.unwrap_or("-"),
            %arguments,
            selection = ?root_selection,
            "mock execute"
        );
        Ok(Value::Null)
    }
}
