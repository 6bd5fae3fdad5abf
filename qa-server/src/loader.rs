//! Background corpus loading.
//!
//! The listener comes up before the corpus is available; `/ask` answers 503
//! until the first load succeeds. Each successful load is published as a new
//! snapshot.

use qa_core::{MessageFeed, QaService, ServiceError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Wait between attempts while no snapshot has been published.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(30);

/// Where the corpus comes from.
#[derive(Debug, Clone)]
pub enum CorpusSource {
    Feed(MessageFeed),
    File(PathBuf),
}

impl CorpusSource {
    /// Load once and publish into `service`. Returns the message count.
    pub async fn load_into(&self, service: &QaService) -> Result<usize, ServiceError> {
        match self {
            CorpusSource::Feed(feed) => service.reload_from_feed(feed).await,
            CorpusSource::File(path) => service.reload_from_file(path).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            CorpusSource::Feed(feed) => feed.url().to_string(),
            CorpusSource::File(path) => path.display().to_string(),
        }
    }
}

/// Load the corpus, then keep it fresh.
///
/// Until a snapshot exists, failed loads are retried every
/// [`RETRY_INTERVAL`]. After that, with `refresh` set, reloads on that
/// interval forever and failed reloads keep the previous snapshot; without
/// it, returns after the first successful load.
pub async fn run_loader(service: Arc<QaService>, source: CorpusSource, refresh: Option<Duration>) {
    let origin = source.describe();
    loop {
        match source.load_into(&service).await {
            Ok(count) => {
                tracing::info!(source = %origin, messages = count, "corpus loaded");
                if refresh.is_none() {
                    return;
                }
            }
            Err(e) => {
                tracing::error!(source = %origin, error = %e, "corpus load failed");
            }
        }

        let wait = match refresh {
            Some(interval) if service.is_ready() => interval,
            _ => RETRY_INTERVAL,
        };
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qa_core::testing::sample_feed_json;
    use qa_core::Synthesizer;

    fn temp_corpus_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("qa-server-{}-{name}.json", std::process::id()));
        std::fs::write(&path, sample_feed_json()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_file_source_publishes() {
        let path = temp_corpus_file("publish");
        let service = Arc::new(QaService::new(Synthesizer::default()));

        run_loader(Arc::clone(&service), CorpusSource::File(path.clone()), None).await;

        assert!(service.is_ready());
        assert_eq!(service.snapshot().unwrap().roster().len(), 7);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_retry_ignores_refresh_interval() {
        let path = std::env::temp_dir().join(format!(
            "qa-server-{}-late.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let service = Arc::new(QaService::new(Synthesizer::default()));

        let loader = tokio::spawn(run_loader(
            Arc::clone(&service),
            CorpusSource::File(path.clone()),
            Some(Duration::from_secs(3600)),
        ));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!service.is_ready());

        std::fs::write(&path, sample_feed_json()).unwrap();
        tokio::time::sleep(RETRY_INTERVAL + Duration::from_secs(1)).await;
        assert!(service.is_ready());

        loader.abort();
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_missing_file_leaves_service_loading() {
        let service = QaService::new(Synthesizer::default());
        let source = CorpusSource::File(PathBuf::from("/no/such/corpus.json"));
        assert!(source.load_into(&service).await.is_err());
        assert!(!service.is_ready());
    }
}
