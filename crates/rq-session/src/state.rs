//! Session-scoped application state.
//!
//! Everything a query needs (configuration, the built retriever and the
//! answer generator) is constructed once at startup and handed to the
//! session by reference.

use std::sync::Arc;

use rq_core::{RagConfig, Record};
use rq_llm::{EmbeddingProvider, GenerationParams, LanguageModel};
use rq_rag::{AnswerGenerator, ContextAssembler, Retriever};
use tracing::debug;

pub struct AppState {
    pub config: RagConfig,
    pub retriever: Retriever,
    pub assembler: ContextAssembler,
    pub generator: AnswerGenerator,
}

impl AppState {
    pub fn new(config: RagConfig, retriever: Retriever, generator: AnswerGenerator) -> Self {
        Self {
            config,
            retriever,
            assembler: ContextAssembler::new(),
            generator,
        }
    }

    /// Index `records` and wire up the generator from `config`.
    pub async fn build(
        config: RagConfig,
        records: &[Record],
        embedder: Arc<dyn EmbeddingProvider>,
        model: Arc<dyn LanguageModel>,
    ) -> rq_rag::Result<Self> {
        let retriever = Retriever::build(records, embedder).await?;
        let generator = AnswerGenerator::new(model, GenerationParams::from(&config.generation));
        Ok(Self::new(config, retriever, generator))
    }

    pub fn top_k(&self) -> usize {
        self.config.retrieval.top_k
    }

    /// Retrieve, assemble and generate for one query.
    pub async fn answer_query(&self, query: &str) -> rq_rag::Result<String> {
        let result = self.retriever.retrieve(query, self.top_k()).await?;
        let context = self.assembler.assemble(&result);
        debug!(hits = result.len(), context_chars = context.len(), "assembled context");
        self.generator.answer(query, &context).await
    }
}
