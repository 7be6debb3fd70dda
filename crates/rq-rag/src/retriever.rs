use std::sync::Arc;

use rq_core::{Document, Record};
use rq_llm::EmbeddingProvider;
use rq_vectordb::{FlatIndex, VectorIndex};
use tracing::{debug, info, warn};

use crate::error::{RagError, Result};

/// One retrieved document and its squared L2 distance to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub distance: f32,
}

/// Retrieved documents, nearest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalResult {
    pub hits: Vec<ScoredDocument>,
}

impl RetrievalResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredDocument> {
        self.hits.iter()
    }

    pub fn ids(&self) -> Vec<usize> {
        self.hits.iter().map(|h| h.document.id).collect()
    }
}

/// Owns both the documents and their index so the two always agree on order.
pub struct Retriever {
    documents: Vec<Document>,
    index: Box<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    /// Serialize, embed (one batch) and index every record.
    ///
    /// Zero records is not an error here: the retriever is built over an
    /// empty index and every later `retrieve` reports `EmptyIndex`.
    pub async fn build(records: &[Record], embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let documents = Document::from_records(records);
        if documents.is_empty() {
            warn!("corpus is empty; queries will report no data");
            return Ok(Self {
                documents,
                index: Box::new(FlatIndex::new()),
                embedder,
            });
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let vectors = embedder
            .embed_batch(&texts)
            .await
            .map_err(RagError::Embedding)?;
        if vectors.len() != documents.len() {
            return Err(RagError::Embedding(rq_llm::ProviderError::MalformedResponse(
                format!("expected {} embeddings, got {}", documents.len(), vectors.len()),
            )));
        }

        let index = FlatIndex::build(&vectors)?;
        info!(
            documents = documents.len(),
            dimension = ?index.dimension(),
            embedder = embedder.name(),
            "built retrieval index"
        );
        Ok(Self {
            documents,
            index: Box::new(index),
            embedder,
        })
    }

    /// Top-`k` documents for `query`, nearest first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<RetrievalResult> {
        if k == 0 {
            return Err(RagError::InvalidArgument("k must be at least 1".into()));
        }
        if self.index.is_empty() {
            return Err(RagError::EmptyIndex);
        }

        let query_vector = self.embedder.embed(query).await.map_err(RagError::Embedding)?;
        let found = self.index.search(&query_vector, k)?;
        debug!(k, hits = found.len(), "retrieved documents");

        let hits = found
            .iter()
            .map(|(id, distance)| {
                // Index ids are positions in `documents`.
                let document = self.documents.get(id).cloned().ok_or_else(|| {
                    RagError::InvalidArgument(format!("index returned unknown id {id}"))
                })?;
                Ok(ScoredDocument { document, distance })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RetrievalResult { hits })
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.index.dimension()
    }
}
