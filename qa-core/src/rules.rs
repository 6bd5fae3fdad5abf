//! Keyword-driven answer rules.
//!
//! The question is matched against an ordered table of rules; the first rule
//! whose trigger words occur in the lowercased question produces the answer
//! from the person's messages. The last rule has no triggers and catches
//! everything else.

use crate::corpus::Message;
use crate::extract::{extract_date, extract_location, extract_quantities};
use std::fmt;

/// The fixed reply when nothing can be said about a question.
pub const NO_INFORMATION: &str = "No information available.";

/// Coarse topic of a question, used to pick an answer rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Trips, destinations and dates.
    Travel,
    /// How many of something (cars).
    Quantity,
    /// Favorite places, restaurants.
    Preference,
    /// Bookings, reservations and anything else.
    Fallback,
}

impl Intent {
    /// Classify a question by the first rule it triggers.
    pub fn classify(question: &str) -> Intent {
        select_rule(question).map_or(Intent::Fallback, |rule| rule.intent)
    }

    /// The reply used when this intent's rule finds nothing.
    pub fn not_found_message(self) -> &'static str {
        match self {
            Intent::Travel => "No travel information available.",
            Intent::Quantity => "No information about cars.",
            Intent::Preference => "No restaurant information available.",
            Intent::Fallback => NO_INFORMATION,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Travel => write!(f, "travel"),
            Intent::Quantity => write!(f, "quantity"),
            Intent::Preference => write!(f, "preference"),
            Intent::Fallback => write!(f, "fallback"),
        }
    }
}

/// Outcome of answering a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// A fact taken or built from the messages.
    Found(String),
    /// The rule for this intent ran but no message qualified.
    NotFound(Intent),
    /// No person, no messages, or nothing relevant.
    NoInformation,
}

impl Answer {
    /// The reply text sent back to the caller.
    pub fn text(&self) -> &str {
        match self {
            Answer::Found(text) => text,
            Answer::NotFound(intent) => intent.not_found_message(),
            Answer::NoInformation => NO_INFORMATION,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Answer::Found(_))
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// One entry of the rule table.
pub struct Rule {
    pub intent: Intent,
    /// Substrings of the lowercased question that select this rule. Empty
    /// means "always".
    pub triggers: &'static [&'static str],
    handler: fn(&[&Message]) -> Answer,
}

impl Rule {
    fn triggered_by(&self, lowered_question: &str) -> bool {
        self.triggers.is_empty() || self.triggers.iter().any(|t| lowered_question.contains(t))
    }

    /// Run this rule's handler directly.
    pub fn apply(&self, messages: &[&Message]) -> Answer {
        (self.handler)(messages)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("intent", &self.intent)
            .field("triggers", &self.triggers)
            .finish()
    }
}

/// The first rule in [`RULES`] triggered by `question`.
pub fn select_rule(question: &str) -> Option<&'static Rule> {
    let lowered = question.to_lowercase();
    RULES.iter().find(|rule| rule.triggered_by(&lowered))
}

/// Rules in priority order. The first triggered rule answers.
pub static RULES: &[Rule] = &[
    Rule {
        intent: Intent::Travel,
        triggers: &["travel", "trip", "going to", "visit", "flight", "going"],
        handler: travel,
    },
    Rule {
        intent: Intent::Quantity,
        triggers: &["car", "cars"],
        handler: quantity,
    },
    Rule {
        intent: Intent::Preference,
        triggers: &["restaurant", "favorite"],
        handler: preference,
    },
    Rule {
        intent: Intent::Fallback,
        triggers: &[],
        handler: fallback,
    },
];

const FALLBACK_KEYWORDS: &[&str] = &["book", "reserve", "appointment", "tickets", "confirm"];

/// "Destination: <place>, When: <date>" from the first message mentioning
/// either.
fn travel(messages: &[&Message]) -> Answer {
    for message in messages {
        let location = extract_location(&message.body);
        let date = extract_date(&message.body);
        if location.is_none() && date.is_none() {
            continue;
        }
        let mut parts = Vec::with_capacity(2);
        if let Some(location) = location {
            parts.push(format!("Destination: {location}"));
        }
        if let Some(date) = date {
            parts.push(format!("When: {date}"));
        }
        return Answer::Found(parts.join(", "));
    }
    Answer::NotFound(Intent::Travel)
}

/// First number in the first message that has one.
fn quantity(messages: &[&Message]) -> Answer {
    messages
        .iter()
        .find_map(|m| extract_quantities(&m.body).first().map(|n| n.to_string()))
        .map(Answer::Found)
        .unwrap_or(Answer::NotFound(Intent::Quantity))
}

/// First message that talks about a restaurant, verbatim.
fn preference(messages: &[&Message]) -> Answer {
    messages
        .iter()
        .find(|m| m.body.to_lowercase().contains("restaurant"))
        .map(|m| Answer::Found(m.body.clone()))
        .unwrap_or(Answer::NotFound(Intent::Preference))
}

/// First message about a booking, reservation, appointment or tickets.
fn fallback(messages: &[&Message]) -> Answer {
    messages
        .iter()
        .find(|m| {
            let body = m.body.to_lowercase();
            FALLBACK_KEYWORDS.iter().any(|k| body.contains(k))
        })
        .map(|m| Answer::Found(m.body.clone()))
        .unwrap_or(Answer::NoInformation)
}

/// Deterministic, rule-based answer synthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSynthesizer;

impl RuleSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Answer `question` from `messages`, which must already be limited to
    /// the person the question is about.
    pub fn synthesize(&self, question: &str, messages: &[&Message]) -> Answer {
        if messages.is_empty() {
            return Answer::NoInformation;
        }
        match select_rule(question) {
            Some(rule) => {
                tracing::debug!(intent = %rule.intent, "answer rule selected");
                rule.apply(messages)
            }
            None => Answer::NoInformation,
        }
    }
}
