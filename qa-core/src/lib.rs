//! Question answering over a corpus of member messages.
//!
//! This crate provides:
//! - Text normalization for names and message bodies
//! - An immutable corpus snapshot with its roster of people
//! - Person resolution and per-person message filtering
//! - Date, location and quantity extraction
//! - Keyword-driven answer rules, plus an optional Claude-backed synthesizer
//!
//! # Quick Start
//!
//! ```ignore
//! use qa_core::{QaService, Synthesizer};
//! use qa_core::feed::{FeedConfig, MessageFeed};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let feed = MessageFeed::new(FeedConfig::default().with_api_key("key"))?;
//!     let service = QaService::new(Synthesizer::default());
//!     service.reload_from_feed(&feed).await?;
//!
//!     let answer = service.answer("How many cars does Vikram have?").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

pub mod corpus;
pub mod extract;
pub mod feed;
pub mod model;
pub mod normalize;
pub mod rules;
pub mod service;
pub mod synth;
pub mod testing;

// Primary public API
pub use corpus::{Corpus, CorpusError, Message, RawMessage};
pub use feed::{FeedConfig, FeedError, MessageFeed};
pub use model::ModelSynthesizer;
pub use rules::{Answer, Intent, RuleSynthesizer, NO_INFORMATION};
pub use service::{answer_with_rules, QaService, ServiceError};
pub use synth::{Backend, Synthesizer};
