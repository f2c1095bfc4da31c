//! # Provider Factories
//!
//! Centralizes construction of dialect adapters and AI providers so that
//! engine selection happens exactly once, at configuration time. No other
//! component branches on the engine.

use crate::{
    errors::CoreError,
    providers::{
        ai::{openai::OpenAiProvider, AiProvider},
        db::{mysql::MySqlAdapter, postgres::PostgresAdapter, DatabaseAdapter, Engine},
    },
};
use tracing::info;

/// Creates the dialect adapter for the chosen engine.
pub fn create_adapter(engine: Engine) -> Box<dyn DatabaseAdapter> {
    match engine {
        Engine::Postgres => Box::new(PostgresAdapter::new()),
        Engine::MySql => Box::new(MySqlAdapter::new()),
    }
}

/// Creates the generation provider for one request.
///
/// `model` defaults to the fixed baseline model; `base_url` switches the
/// request to an OpenAI-compatible alternative endpoint.
pub fn create_ai_provider(
    api_key: &str,
    model: Option<&str>,
    base_url: Option<&str>,
) -> Result<Box<dyn AiProvider>, CoreError> {
    if let Some(url) = base_url {
        info!("Configuring OpenAI-compatible provider with base URL: {url}");
    }
    Ok(Box::new(OpenAiProvider::new(api_key, model, base_url)?))
}
