use crate::retriever::RetrievalResult;

/// Joins retrieved document texts, nearest first.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    separator: String,
}

impl ContextAssembler {
    pub fn new() -> Self {
        Self { separator: "\n".into() }
    }

    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self { separator: separator.into() }
    }

    /// An empty result yields an empty context.
    pub fn assemble(&self, result: &RetrievalResult) -> String {
        result
            .iter()
            .map(|hit| hit.document.text.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new()
    }
}
