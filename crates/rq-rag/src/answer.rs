use std::sync::Arc;

use rq_llm::{GenerationParams, LanguageModel};
use tracing::debug;

use crate::error::{RagError, Result};

/// Prompt that grounds the model in `context` and asks `query`.
pub fn build_prompt(query: &str, context: &str) -> String {
    format!(
        "You are an expert. Answer the following question using only this data.\n\
         If the data does not contain the answer, say that you don't know.\n\
         \n\
         {context}\n\
         \n\
         Question: {query}\n\
         Answer:"
    )
}

pub struct AnswerGenerator {
    model: Arc<dyn LanguageModel>,
    params: GenerationParams,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, params: GenerationParams) -> Self {
        Self { model, params }
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Completion text, returned verbatim.
    pub async fn answer(&self, query: &str, context: &str) -> Result<String> {
        let prompt = build_prompt(query, context);
        debug!(
            model = self.model.name(),
            prompt_chars = prompt.len(),
            temperature = self.params.temperature,
            "generating answer"
        );
        self.model
            .generate(&prompt, &self.params)
            .await
            .map_err(RagError::Generation)
    }
}
