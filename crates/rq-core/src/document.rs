use serde::{Deserialize, Serialize};

use crate::record::Record;

/// A record prepared for retrieval.
///
/// `id` is the record's position in the corpus and doubles as its position
/// in the vector index, so search hits map back to text by direct lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: usize,
    pub text: String,
}

impl Document {
    pub fn new(id: usize, text: impl Into<String>) -> Self {
        Self { id, text: text.into() }
    }

    pub fn from_record(id: usize, record: &Record) -> Self {
        Self::new(id, record.serialize())
    }

    /// Serialize a whole corpus in input order.
    pub fn from_records(records: &[Record]) -> Vec<Self> {
        records
            .iter()
            .enumerate()
            .map(|(id, record)| Self::from_record(id, record))
            .collect()
    }
}
