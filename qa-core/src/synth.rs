//! Backend selection for answer synthesis.

use crate::corpus::Message;
use crate::model::ModelSynthesizer;
use crate::rules::{Answer, RuleSynthesizer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which synthesizer to deploy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    Rules,
    Model,
}

#[derive(Debug, Error)]
#[error("unknown synthesis backend '{0}' (expected 'rules' or 'model')")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rules" | "rule" => Ok(Backend::Rules),
            "model" | "llm" => Ok(Backend::Model),
            other => Err(UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Rules => write!(f, "rules"),
            Backend::Model => write!(f, "model"),
        }
    }
}

/// An answer synthesizer: `synthesize(question, messages) -> Answer`.
#[derive(Debug, Clone)]
pub enum Synthesizer {
    Rules(RuleSynthesizer),
    Model(ModelSynthesizer),
}

impl Default for Synthesizer {
    fn default() -> Self {
        Synthesizer::Rules(RuleSynthesizer::new())
    }
}

impl Synthesizer {
    pub fn backend(&self) -> Backend {
        match self {
            Synthesizer::Rules(_) => Backend::Rules,
            Synthesizer::Model(_) => Backend::Model,
        }
    }

    /// Answer `question` from the messages of the person it is about.
    pub async fn synthesize(&self, question: &str, messages: &[&Message]) -> Answer {
        match self {
            Synthesizer::Rules(rules) => rules.synthesize(question, messages),
            Synthesizer::Model(model) => model.synthesize(question, messages).await,
        }
    }
}

impl From<RuleSynthesizer> for Synthesizer {
    fn from(rules: RuleSynthesizer) -> Self {
        Synthesizer::Rules(rules)
    }
}

impl From<ModelSynthesizer> for Synthesizer {
    fn from(model: ModelSynthesizer) -> Self {
        Synthesizer::Model(model)
    }
}
