//! HTTP front end for member message question answering.

pub mod config;
pub mod loader;
pub mod routes;

pub use config::{Config, ConfigError};
pub use loader::{run_loader, CorpusSource};
pub use routes::build_router;
