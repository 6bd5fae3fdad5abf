//! Server configuration from environment variables.
//!
//!   QA_FEED_URL        message feed (default: the production feed)
//!   QA_FEED_API_KEY    sent as `X-API-Key`
//!   QA_CORPUS_FILE     serve a saved feed payload instead of the feed
//!   QA_BIND_ADDR       listen address (default: 0.0.0.0:8000)
//!   QA_BACKEND         `rules` (default) or `model`
//!   QA_MODEL           Claude model for the `model` backend
//!   QA_REFRESH_SECS    reload interval, 0 loads once (default: 0)
//!   ANTHROPIC_API_KEY  required for the `model` backend

use qa_core::feed::DEFAULT_FEED_URL;
use qa_core::{Backend, FeedConfig, ModelSynthesizer, RuleSynthesizer, Synthesizer};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not valid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Claude client: {0}")]
    Claude(#[from] qa_core::model::ClaudeError),
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub feed: FeedConfig,
    pub corpus_file: Option<PathBuf>,
    pub backend: Backend,
    pub model: Option<String>,
    pub anthropic_api_key: Option<String>,
    /// `None` means load once.
    pub refresh: Option<Duration>,
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = get("QA_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "QA_BIND_ADDR",
                reason: e.to_string(),
            })?;

        let mut feed =
            FeedConfig::new(get("QA_FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string()));
        if let Some(key) = get("QA_FEED_API_KEY") {
            feed = feed.with_api_key(key);
        }

        let backend = match get("QA_BACKEND") {
            Some(value) => value.parse::<Backend>().map_err(|e| ConfigError::Invalid {
                var: "QA_BACKEND",
                reason: e.to_string(),
            })?,
            None => Backend::Rules,
        };

        let refresh_secs = match get("QA_REFRESH_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: "QA_REFRESH_SECS",
                reason: e.to_string(),
            })?,
            None => 0,
        };

        let anthropic_api_key = get("ANTHROPIC_API_KEY");
        if backend == Backend::Model && anthropic_api_key.is_none() {
            return Err(ConfigError::Missing("ANTHROPIC_API_KEY"));
        }

        Ok(Self {
            bind_addr,
            feed,
            corpus_file: get("QA_CORPUS_FILE").map(PathBuf::from),
            backend,
            model: get("QA_MODEL"),
            anthropic_api_key,
            refresh: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
        })
    }

    /// Build the configured answer synthesizer.
    pub fn synthesizer(&self) -> Result<Synthesizer, ConfigError> {
        match self.backend {
            Backend::Rules => Ok(Synthesizer::Rules(RuleSynthesizer::new())),
            Backend::Model => {
                let key = self
                    .anthropic_api_key
                    .as_deref()
                    .ok_or(ConfigError::Missing("ANTHROPIC_API_KEY"))?;
                let mut model = ModelSynthesizer::from_api_key(key)?;
                if let Some(name) = &self.model {
                    model = model.with_model(name.clone());
                }
                Ok(Synthesizer::Model(model))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.feed.api_key, None);
        assert_eq!(config.backend, Backend::Rules);
        assert_eq!(config.refresh, None);
        assert!(config.corpus_file.is_none());
        assert_eq!(config.synthesizer().unwrap().backend(), Backend::Rules);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("QA_BIND_ADDR", "127.0.0.1:9100"),
            ("QA_FEED_URL", "http://feed.local/messages"),
            ("QA_FEED_API_KEY", "k"),
            ("QA_REFRESH_SECS", "300"),
            ("QA_CORPUS_FILE", "/tmp/corpus.json"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9100);
        assert_eq!(config.feed.url, "http://feed.local/messages");
        assert_eq!(config.feed.api_key.as_deref(), Some("k"));
        assert_eq!(config.refresh, Some(Duration::from_secs(300)));
        assert_eq!(config.corpus_file, Some(PathBuf::from("/tmp/corpus.json")));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config(&[("QA_BIND_ADDR", "  "), ("QA_REFRESH_SECS", "")]).unwrap();
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.refresh, None);
    }

    #[test]
    fn test_invalid_values() {
        let err = config(&[("QA_BIND_ADDR", "nowhere")]).unwrap_err();
        assert!(err.to_string().starts_with("QA_BIND_ADDR is not valid"));

        let err = config(&[("QA_REFRESH_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "QA_REFRESH_SECS", .. }));

        let err = config(&[("QA_BACKEND", "oracle")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "QA_BACKEND", .. }));
    }

    #[test]
    fn test_model_backend_needs_key() {
        let err = config(&[("QA_BACKEND", "model")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ANTHROPIC_API_KEY")));

        let config = config(&[
            ("QA_BACKEND", "model"),
            ("ANTHROPIC_API_KEY", "test-key"),
            ("QA_MODEL", "claude-3-5-haiku-20241022"),
        ])
        .unwrap();
        match config.synthesizer().unwrap() {
            Synthesizer::Model(model) => assert_eq!(model.model(), "claude-3-5-haiku-20241022"),
            other => panic!("expected model backend, got {other:?}"),
        }
    }
}
