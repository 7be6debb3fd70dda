use crate::*;
use async_trait::async_trait;
use rq_core::Record;
use rq_llm::{EmbeddingProvider, GenerationParams, HashingEmbedder, LanguageModel, ProviderError};
use serde_json::json;
use std::sync::{Arc, Mutex};

// ========== Test doubles ==========

/// Returns the prompt so tests can inspect it.
struct EchoModel;

#[async_trait]
impl LanguageModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> rq_llm::Result<String> {
        Ok(prompt.to_string())
    }
}

struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> rq_llm::Result<String> {
        Err(ProviderError::Status { status: 429, body: "quota exceeded".into() })
    }
}

/// Records the params it was called with.
struct RecordingModel {
    seen: Mutex<Vec<GenerationParams>>,
}

#[async_trait]
impl LanguageModel for RecordingModel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(&self, _prompt: &str, params: &GenerationParams) -> rq_llm::Result<String> {
        self.seen.lock().unwrap().push(params.clone());
        Ok(" verbatim \n".into())
    }
}

/// Hands out a fixed batch, and a fixed query vector.
struct ScriptedEmbedder {
    batch: Vec<Vec<f32>>,
    query: Vec<f32>,
    calls: Mutex<usize>,
}

impl ScriptedEmbedder {
    fn new(batch: Vec<Vec<f32>>, query: Vec<f32>) -> Arc<Self> {
        Arc::new(Self { batch, query, calls: Mutex::new(0) })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedEmbedder {
    fn name(&self) -> &str {
        "scripted"
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    async fn embed(&self, _text: &str) -> rq_llm::Result<Vec<f32>> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.query.clone())
    }

    async fn embed_batch(&self, _texts: &[String]) -> rq_llm::Result<Vec<Vec<f32>>> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.batch.clone())
    }
}

struct DownEmbedder;

#[async_trait]
impl EmbeddingProvider for DownEmbedder {
    fn name(&self) -> &str {
        "down"
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    async fn embed(&self, _text: &str) -> rq_llm::Result<Vec<f32>> {
        Err(ProviderError::Timeout)
    }
}

fn leaderboard() -> Vec<Record> {
    vec![
        Record::new(json!({"rank": "1", "model": "A"})),
        Record::new(json!({"rank": "2", "model": "B"})),
        Record::new(json!({"rank": "3", "model": "C"})),
    ]
}

fn hashing() -> Arc<HashingEmbedder> {
    Arc::new(HashingEmbedder::new(384).unwrap())
}

// ========== Retriever build ==========

#[tokio::test]
async fn test_build_keeps_record_order() {
    let records = leaderboard();
    let retriever = Retriever::build(&records, hashing()).await.unwrap();
    assert_eq!(retriever.len(), 3);
    assert_eq!(retriever.dimension(), Some(384));
    for (i, doc) in retriever.documents().iter().enumerate() {
        assert_eq!(doc.id, i);
        assert_eq!(doc.text, records[i].serialize());
    }
}

#[tokio::test]
async fn test_build_empty_corpus_succeeds() {
    let embedder = ScriptedEmbedder::new(vec![], vec![1.0]);
    let retriever = Retriever::build(&[], embedder.clone()).await.unwrap();
    assert!(retriever.is_empty());
    assert_eq!(retriever.dimension(), None);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_build_dimension_mismatch() {
    let embedder = ScriptedEmbedder::new(
        vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0, 1.0]],
        vec![1.0, 0.0],
    );
    let err = Retriever::build(&leaderboard(), embedder).await.err().unwrap();
    assert!(matches!(err, RagError::DimensionMismatch { expected: 2, got: 3 }));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_build_short_batch_is_embedding_error() {
    let embedder = ScriptedEmbedder::new(vec![vec![1.0]], vec![1.0]);
    let err = Retriever::build(&leaderboard(), embedder).await.err().unwrap();
    assert!(matches!(err, RagError::Embedding(ProviderError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_build_provider_failure() {
    let err = Retriever::build(&leaderboard(), Arc::new(DownEmbedder)).await.err().unwrap();
    assert!(matches!(err, RagError::Embedding(ProviderError::Timeout)));
}

// ========== Retrieval ==========

#[tokio::test]
async fn test_retrieve_orders_by_distance() {
    let embedder = ScriptedEmbedder::new(
        vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 3.0]],
        vec![0.9, 0.0],
    );
    let retriever = Retriever::build(&leaderboard(), embedder).await.unwrap();
    let result = retriever.retrieve("anything", 2).await.unwrap();
    assert_eq!(result.ids(), vec![1, 0]);
    assert_eq!(result.hits[0].document.text, leaderboard()[1].serialize());
    assert!(result.hits[0].distance <= result.hits[1].distance);
}

#[tokio::test]
async fn test_retrieve_clamps_k() {
    let retriever = Retriever::build(&leaderboard(), hashing()).await.unwrap();
    let result = retriever.retrieve("rank", 5).await.unwrap();
    assert_eq!(result.len(), 3);
}

#[tokio::test]
async fn test_retrieve_self_retrieval() {
    let records = leaderboard();
    let retriever = Retriever::build(&records, hashing()).await.unwrap();
    for (i, record) in records.iter().enumerate() {
        let result = retriever.retrieve(&record.serialize(), 1).await.unwrap();
        assert_eq!(result.ids(), vec![i]);
        assert!(result.hits[0].distance.abs() < 1e-6);
    }
}

#[tokio::test]
async fn test_retrieve_empty_index() {
    let retriever = Retriever::build(&[], hashing()).await.unwrap();
    let err = retriever.retrieve("who is rank 1?", 5).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyIndex));
    assert!(err.is_recoverable());
    assert_eq!(err.to_string(), "No data available: the corpus is empty.");
}

#[tokio::test]
async fn test_retrieve_zero_k() {
    let retriever = Retriever::build(&leaderboard(), hashing()).await.unwrap();
    assert!(matches!(
        retriever.retrieve("q", 0).await,
        Err(RagError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_retrieve_query_dimension_mismatch() {
    let embedder = ScriptedEmbedder::new(
        vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 3.0]],
        vec![0.9, 0.0, 0.0],
    );
    let retriever = Retriever::build(&leaderboard(), embedder).await.unwrap();
    assert!(matches!(
        retriever.retrieve("q", 1).await,
        Err(RagError::DimensionMismatch { expected: 2, got: 3 })
    ));
}

// ========== Context Assembler ==========

#[tokio::test]
async fn test_assemble_joins_nearest_first() {
    let embedder = ScriptedEmbedder::new(
        vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 3.0]],
        vec![0.0, 2.9],
    );
    let records = leaderboard();
    let retriever = Retriever::build(&records, embedder).await.unwrap();
    let result = retriever.retrieve("q", 2).await.unwrap();
    let context = ContextAssembler::new().assemble(&result);
    assert_eq!(
        context,
        format!("{}\n{}", records[2].serialize(), records[0].serialize())
    );
}

#[test]
fn test_assemble_empty_result() {
    assert_eq!(ContextAssembler::default().assemble(&RetrievalResult::default()), "");
}

#[test]
fn test_assemble_custom_separator() {
    let result = RetrievalResult {
        hits: vec![
            ScoredDocument { document: rq_core::Document::new(0, "a"), distance: 0.0 },
            ScoredDocument { document: rq_core::Document::new(1, "b"), distance: 1.0 },
        ],
    };
    assert_eq!(ContextAssembler::with_separator("\n---\n").assemble(&result), "a\n---\nb");
}

// ========== Answer Generator ==========

#[test]
fn test_prompt_layout() {
    let prompt = build_prompt("who is rank 1?", "CTX");
    assert!(prompt.starts_with("You are an expert."));
    assert!(prompt.contains("using only this data"));
    assert!(prompt.contains("\n\nCTX\n\nQuestion: who is rank 1?\nAnswer:"));
    assert!(prompt.ends_with("Answer:"));
}

#[tokio::test]
async fn test_answer_returns_completion_verbatim() {
    let model = Arc::new(RecordingModel { seen: Mutex::new(vec![]) });
    let params = GenerationParams { temperature: 0.0, max_tokens: 64 };
    let generator = AnswerGenerator::new(model.clone(), params.clone());
    let answer = generator.answer("q", "ctx").await.unwrap();
    assert_eq!(answer, " verbatim \n");
    assert_eq!(model.seen.lock().unwrap().as_slice(), &[params]);
}

#[tokio::test]
async fn test_answer_wraps_provider_failure() {
    let generator = AnswerGenerator::new(Arc::new(FailingModel), GenerationParams::default());
    let err = generator.answer("q", "ctx").await.unwrap_err();
    assert!(matches!(err, RagError::Generation(ProviderError::Status { status: 429, .. })));
    assert!(err.is_recoverable());
}

// ========== End to end ==========

#[tokio::test]
async fn test_rank_question_end_to_end() {
    let retriever = Retriever::build(&leaderboard(), hashing()).await.unwrap();
    let result = retriever.retrieve("who is rank 1?", 5).await.unwrap();
    assert_eq!(result.ids()[0], 0);

    let context = ContextAssembler::new().assemble(&result);
    let generator = AnswerGenerator::new(Arc::new(EchoModel), GenerationParams::default());
    let answer = generator.answer("who is rank 1?", &context).await.unwrap();
    assert!(answer.contains("\"model\": \"A\""));
    assert!(answer.contains("Question: who is rank 1?"));
}
