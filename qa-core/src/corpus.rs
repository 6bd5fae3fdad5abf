//! The message corpus and the roster of people it mentions.
//!
//! A [`Corpus`] is an immutable snapshot: it is built once from the raw feed
//! records and only ever replaced wholesale (see [`crate::service`]).

use crate::normalize::{fold, normalize};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from loading a corpus payload.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A message record exactly as the feed delivers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub user_name: String,
    pub message: String,
}

impl RawMessage {
    pub fn new(user_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            message: message.into(),
        }
    }
}

/// Feed response envelope: `{"items": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub items: Vec<RawMessage>,
}

/// A normalized message attributed to one speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub speaker: String,
    pub body: String,
}

/// An ordered, immutable set of messages plus the roster derived from them.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    messages: Vec<Message>,
    /// Distinct speakers in order of first appearance.
    roster: Vec<String>,
    /// `fold` of each roster entry, same order as `roster`.
    roster_keys: Vec<String>,
}

impl Corpus {
    /// Build a snapshot from raw feed records, preserving their order.
    ///
    /// Records whose speaker normalizes to the empty string are dropped: an
    /// empty name would be a substring of every question.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RawMessage>,
    {
        let mut corpus = Corpus::default();
        let mut dropped = 0usize;
        let mut seen = HashSet::new();

        for record in records {
            let speaker = normalize(&record.user_name);
            if speaker.is_empty() {
                dropped += 1;
                continue;
            }
            let key = fold(&speaker);
            if seen.insert(key.clone()) {
                corpus.roster.push(speaker.clone());
                corpus.roster_keys.push(key);
            }
            corpus.messages.push(Message {
                speaker,
                body: normalize(&record.message),
            });
        }

        if dropped > 0 {
            tracing::warn!(dropped, "skipped messages without a speaker");
        }
        tracing::debug!(
            messages = corpus.messages.len(),
            people = corpus.roster.len(),
            "built corpus snapshot"
        );
        corpus
    }

    /// Parse a feed payload (`{"items": [...]}`) into a snapshot.
    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        let page: FeedPage = serde_json::from_str(json)?;
        Ok(Self::from_records(page.items))
    }

    /// Load a feed payload previously saved to disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let json = fs::read_to_string(path.as_ref()).await?;
        Self::from_json_str(&json)
    }

    /// All messages in feed order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Distinct speakers in order of first appearance.
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Work out which person a question is about.
    ///
    /// Full names are tried first, then first names; in each pass the first
    /// roster entry (by first appearance) contained in the question wins.
    ///
    /// Matching is plain substring containment, not word matching, so a
    /// short first name can match inside an unrelated word ("Al" matches
    /// "calling"). Ambiguous questions resolve to the earliest roster entry
    /// rather than being reported.
    pub fn resolve(&self, question: &str) -> Option<&str> {
        let question = fold(question);

        let full = self
            .roster_keys
            .iter()
            .position(|name| question.contains(name.as_str()));
        if let Some(idx) = full {
            return Some(self.roster[idx].as_str());
        }

        self.roster_keys
            .iter()
            .position(|name| {
                name.split_whitespace()
                    .next()
                    .is_some_and(|first| question.contains(first))
            })
            .map(|idx| self.roster[idx].as_str())
    }

    /// Every message whose speaker equals `speaker` after folding, in corpus
    /// order.
    pub fn messages_of(&self, speaker: &str) -> Vec<&Message> {
        let key = fold(speaker);
        self.messages
            .iter()
            .filter(|m| fold(&m.speaker) == key)
            .collect()
    }
}
