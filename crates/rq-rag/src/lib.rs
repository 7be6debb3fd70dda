//! Retrieval-augmented answering over a record corpus.
//!
//! Build once with [`Retriever::build`], then per query:
//! [`Retriever::retrieve`] → [`ContextAssembler::assemble`] →
//! [`AnswerGenerator::answer`].

pub mod answer;
pub mod context;
pub mod error;
pub mod retriever;

pub use answer::{build_prompt, AnswerGenerator};
pub use context::ContextAssembler;
pub use error::{RagError, Result};
pub use retriever::{RetrievalResult, Retriever, ScoredDocument};

#[cfg(test)]
mod tests;
