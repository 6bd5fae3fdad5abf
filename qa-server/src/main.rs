//! qa-server: answers questions about members from their messages.
//!
//! ```bash
//! QA_FEED_API_KEY=... cargo run -p qa-server
//! curl 'localhost:8000/ask?question=How+many+cars+does+Vikram+have%3F'
//! ```
//!
//! See [`qa_server::config`] for the environment variables.

use qa_core::{MessageFeed, QaService};
use qa_server::{build_router, run_loader, Config, CorpusSource};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,qa_server=debug,qa_core=debug".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let service = Arc::new(QaService::new(config.synthesizer()?));
    tracing::info!(backend = %config.backend, "answer backend selected");

    let source = match &config.corpus_file {
        Some(path) => CorpusSource::File(path.clone()),
        None => CorpusSource::Feed(MessageFeed::new(config.feed.clone())?),
    };
    tokio::spawn(run_loader(Arc::clone(&service), source, config.refresh));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, build_router(service)).await?;

    Ok(())
}
