//! Pattern extractors over a single message body.
//!
//! All extractors are pure and return slices of the input, so matched text
//! keeps the casing it had in the message.

use regex::Regex;

lazy_static::lazy_static! {
    static ref DATE: Regex = Regex::new(
        r"(?i)\b(?:[0-9]{4}-[0-9]{2}-[0-9]{2}|monday|tuesday|wednesday|thursday|friday|saturday|sunday|tonight|tomorrow|this friday|this saturday|next week|next monday|first week of (?:january|february|march|april|may|june|july|august|september|october|november|december))\b"
    ).expect("date pattern is valid");

    /// A lowercase `in`/`to` followed by one or more capitalized words.
    static ref LOCATION: Regex = Regex::new(
        r"\b(?:in|to)\s+([A-Z][a-zA-Z]+(?:\s[A-Z][a-zA-Z]+)*)"
    ).expect("location pattern is valid");

    static ref NUMBER: Regex = Regex::new(r"[0-9]+").expect("number pattern is valid");
}

/// First date or time expression: an ISO date, a weekday, a relative phrase
/// such as "next week", or "first week of <month>". Case-insensitive.
pub fn extract_date(text: &str) -> Option<&str> {
    DATE.find(text).map(|m| m.as_str())
}

/// First place name introduced by "in" or "to", without the preposition.
///
/// Only capitalized words count, so "to the city" yields nothing.
pub fn extract_location(text: &str) -> Option<&str> {
    LOCATION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Every maximal run of ASCII digits, in order of appearance.
pub fn extract_quantities(text: &str) -> Vec<&str> {
    NUMBER.find_iter(text).map(|m| m.as_str()).collect()
}
