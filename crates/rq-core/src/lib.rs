//! Core data model for the record query agent: records, documents,
//! corpus file I/O and configuration.

pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod record;

pub use config::RagConfig;
pub use document::Document;
pub use error::{CoreError, Result};
pub use record::Record;
