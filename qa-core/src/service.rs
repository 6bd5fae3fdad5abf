//! The question-answering service.
//!
//! Holds the current corpus snapshot behind an `Arc` that is replaced
//! wholesale on reload, so a request always sees exactly one version of the
//! messages and roster.

use crate::corpus::{Corpus, CorpusError};
use crate::feed::{FeedError, MessageFeed};
use crate::rules::{Answer, RuleSynthesizer};
use crate::synth::Synthesizer;
use std::path::Path;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors surfaced to the caller of [`QaService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No corpus has been published yet.
    #[error("corpus not loaded")]
    NotReady,

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),
}

/// Answers questions against the latest published corpus.
#[derive(Debug, Default)]
pub struct QaService {
    snapshot: RwLock<Option<Arc<Corpus>>>,
    synthesizer: Synthesizer,
}

impl QaService {
    /// Create a service with no corpus yet.
    pub fn new(synthesizer: Synthesizer) -> Self {
        Self {
            snapshot: RwLock::new(None),
            synthesizer,
        }
    }

    /// Create a service that is ready immediately.
    pub fn with_corpus(synthesizer: Synthesizer, corpus: Corpus) -> Self {
        let service = Self::new(synthesizer);
        service.publish(corpus);
        service
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// Replace the current snapshot. Requests already holding the previous
    /// snapshot finish against it.
    pub fn publish(&self, corpus: Corpus) {
        let corpus = Arc::new(corpus);
        tracing::info!(
            messages = corpus.len(),
            people = corpus.roster().len(),
            "publishing corpus snapshot"
        );
        let mut slot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(corpus);
    }

    /// The current snapshot, if one has been published.
    pub fn snapshot(&self) -> Option<Arc<Corpus>> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_ready(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Fetch the feed and publish the result. Returns the message count.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn reload_from_feed(&self, feed: &MessageFeed) -> Result<usize, ServiceError> {
        let records = feed.fetch().await?;
        let corpus = Corpus::from_records(records);
        let count = corpus.len();
        self.publish(corpus);
        Ok(count)
    }

    /// Load a saved feed payload from disk and publish it.
    pub async fn reload_from_file(&self, path: impl AsRef<Path>) -> Result<usize, ServiceError> {
        let corpus = Corpus::load(path).await?;
        let count = corpus.len();
        self.publish(corpus);
        Ok(count)
    }

    /// Answer a question.
    ///
    /// Fails only with [`ServiceError::NotReady`]; every other outcome,
    /// including an unknown person, is an [`Answer`].
    pub async fn answer(&self, question: &str) -> Result<Answer, ServiceError> {
        let corpus = self.snapshot().ok_or(ServiceError::NotReady)?;

        let Some(person) = corpus.resolve(question) else {
            tracing::debug!("no person matched question");
            return Ok(Answer::NoInformation);
        };
        let messages = corpus.messages_of(person);
        tracing::debug!(person, messages = messages.len(), "resolved person");
        if messages.is_empty() {
            return Ok(Answer::NoInformation);
        }

        Ok(self.synthesizer.synthesize(question, &messages).await)
    }
}

/// The full pipeline against one snapshot, always rule-based.
pub fn answer_with_rules(corpus: &Corpus, question: &str) -> Answer {
    let Some(person) = corpus.resolve(question) else {
        return Answer::NoInformation;
    };
    let messages = corpus.messages_of(person);
    RuleSynthesizer::new().synthesize(question, &messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::RawMessage;

    fn corpus(pairs: &[(&str, &str)]) -> Corpus {
        Corpus::from_records(pairs.iter().map(|(s, b)| RawMessage::new(*s, *b)))
    }

    #[tokio::test]
    async fn test_not_ready_before_publish() {
        let service = QaService::default();
        assert!(!service.is_ready());
        let err = service.answer("Where is Jane going?").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotReady));
        assert_eq!(err.to_string(), "corpus not loaded");
    }

    #[tokio::test]
    async fn test_answer_after_publish() {
        let service = QaService::new(Synthesizer::default());
        service.publish(corpus(&[("Jane Doe", "I own 2 cars")]));
        assert!(service.is_ready());
        let answer = service.answer("How many cars does Jane have?").await.unwrap();
        assert_eq!(answer.text(), "2");
    }

    #[tokio::test]
    async fn test_unknown_person_is_sentinel() {
        let service =
            QaService::with_corpus(Synthesizer::default(), corpus(&[("Jane Doe", "book it")]));
        let answer = service.answer("What does Bob want?").await.unwrap();
        assert_eq!(answer, Answer::NoInformation);
        assert_eq!(service.answer("").await.unwrap().text(), "No information available.");
    }

    #[tokio::test]
    async fn test_old_snapshot_survives_publish() {
        let service = QaService::with_corpus(Synthesizer::default(), corpus(&[("Jane Doe", "a")]));
        let held = service.snapshot().unwrap();
        service.publish(corpus(&[("John Smith", "b"), ("Amy Lee", "c")]));

        assert_eq!(held.roster(), &["Jane Doe"]);
        assert_eq!(service.snapshot().unwrap().roster(), &["John Smith", "Amy Lee"]);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_snapshot() {
        let service = QaService::with_corpus(Synthesizer::default(), corpus(&[("Jane Doe", "a")]));
        let err = service.reload_from_file("/no/such/corpus.json").await.unwrap_err();
        assert!(matches!(err, ServiceError::Corpus(_)));
        assert_eq!(service.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_answer_with_rules() {
        let c = corpus(&[("Jane Doe", "I am going to Paris tomorrow")]);
        assert_eq!(
            answer_with_rules(&c, "Where is Jane traveling?").text(),
            "Destination: Paris, When: tomorrow"
        );
        assert_eq!(answer_with_rules(&c, "Where is Zed?"), Answer::NoInformation);
    }
}
