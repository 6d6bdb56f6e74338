use prisma_mock_core::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The schema handed to the client could not be parsed.
    #[error("schema error: {0}")]
    Schema(#[from] ParseError),
}
