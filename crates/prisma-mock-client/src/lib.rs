pub mod client;
pub mod error;
pub mod method;

pub use client::{MockClient, PrismaClient, Table};
pub use error::ClientError;
pub use method::PrismaMethod;
