mod logging;

use anyhow::Context;
use rq_core::{corpus, RagConfig};
use rq_session::{AppState, QuerySession};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let env = |key: &str| std::env::var(key).ok();
    let config = RagConfig::load().context("failed to load configuration")?;

    // Providers resolve their credentials here, before any network call.
    let embedder = rq_llm::embedder_from_config(&config.embedding, env)
        .context("failed to configure the embedding provider")?;
    let model = rq_llm::language_model_from_config(&config.generation, env)
        .context("failed to configure the language model")?;

    let records = corpus::load_records(&config.corpus.path)
        .with_context(|| format!("failed to load corpus {}", config.corpus.path.display()))?;
    tracing::info!(records = records.len(), embedder = embedder.name(), "corpus loaded");

    let state = AppState::build(config, &records, embedder, model)
        .await
        .context("failed to build the retrieval index")?;

    let mut session = QuerySession::new(&state);
    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("terminal I/O failed")?;

    Ok(())
}
