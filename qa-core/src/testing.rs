//! Testing utilities.
//!
//! Fixture corpora for unit and integration tests, so no test needs the live
//! feed.

use crate::corpus::{Corpus, FeedPage, RawMessage};

/// Build a corpus from `(speaker, body)` pairs.
pub fn corpus_of(pairs: &[(&str, &str)]) -> Corpus {
    Corpus::from_records(pairs.iter().map(|(s, b)| RawMessage::new(*s, *b)))
}

/// A small feed resembling the production one, in feed order.
pub fn sample_records() -> Vec<RawMessage> {
    [
        ("Sophia Al-Farsi", "Please book a private jet to Paris for this Friday."),
        ("Fatima El-Tahir", "Can you confirm my dinner reservation at The French Laundry restaurant?"),
        ("Armand Dupont", "I need two tickets to the opera in Milan next week."),
        ("Layla Kawaguchi", "Planning my trip to London first week of December."),
        ("Vikram Desai", "Update my profile: I now own 3 cars."),
        ("Sophia Al-Farsi", "My favorite restaurant is Nobu, please remember that."),
        ("Hans M\u{fc}ller", "Reserve a table for 4 at 8pm tonight."),
        ("Vikram Desai", "Arrange a chauffeur for my visit to Tokyo on 2025-03-14."),
        ("Layla Kawaguchi", "I prefer aisle seats \u{2014} always."),
        ("Lily O'Sullivan", "Thanks for everything last month!"),
    ]
    .into_iter()
    .map(|(s, b)| RawMessage::new(s, b))
    .collect()
}

/// [`sample_records`] as a corpus.
pub fn sample_corpus() -> Corpus {
    Corpus::from_records(sample_records())
}

/// [`sample_records`] wrapped in the feed envelope, as JSON.
pub fn sample_feed_json() -> String {
    let page = FeedPage {
        items: sample_records(),
    };
    serde_json::to_string(&page).unwrap_or_default()
}
