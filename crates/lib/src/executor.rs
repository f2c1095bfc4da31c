//! # The Core Executor
//!
//! The facade the desktop shell calls into. It holds the settings gateway
//! and the dialect adapter selected at configuration time, and converts
//! every internal fault into the `{error, data}` envelope at this boundary.
//! Each operation is independently awaitable and owns its network resources;
//! nothing is pipelined, retried, or cached.

use crate::{
    errors::CoreError,
    providers::{
        db::{DatabaseAdapter, Engine},
        factory::{create_adapter, create_ai_provider},
    },
    settings::{Settings, SettingsGateway},
    types::{ConnectionConfig, Envelope, GenerateQueryOptions},
    QueryClientBuilder,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Ties the settings gateway and the active dialect adapter together behind
/// envelope-returning operations.
#[derive(Debug)]
pub struct Executor {
    adapter: Box<dyn DatabaseAdapter>,
    settings: Arc<dyn SettingsGateway>,
}

impl Executor {
    /// Creates a new `Executor` for one engine. The engine choice is made
    /// here, once; no later call re-checks it.
    pub fn new(engine: Engine, settings: Arc<dyn SettingsGateway>) -> Self {
        Self::with_adapter(create_adapter(engine), settings)
    }

    /// Creates an `Executor` over a caller-supplied adapter, for embedders
    /// and tests that bring their own dialect implementation.
    pub fn with_adapter(
        adapter: Box<dyn DatabaseAdapter>,
        settings: Arc<dyn SettingsGateway>,
    ) -> Self {
        Self { adapter, settings }
    }

    /// Validates the descriptor with a connect/close round trip and persists
    /// it only on success. Returns whether the descriptor was saved.
    pub async fn test_and_save_connection(&self, config: ConnectionConfig) -> bool {
        if !self.adapter.test_connection(&config).await {
            return false;
        }
        let mut settings = match self.settings.get().await {
            Ok(settings) => settings,
            Err(e) => {
                error!("Failed to load settings: {e}");
                return false;
            }
        };
        settings.connection = Some(config);
        match self.settings.set(settings).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to persist connection config: {e}");
                false
            }
        }
    }

    /// Runs one statement against the configured database.
    pub async fn run_query(&self, query: &str) -> Envelope<Vec<Value>> {
        self.run_query_inner(query).await.into()
    }

    async fn run_query_inner(&self, query: &str) -> Result<Vec<Value>, CoreError> {
        let settings = self.settings.get().await?;
        let config = settings.connection.ok_or(CoreError::MissingConnection)?;
        self.adapter.execute(&config, query).await
    }

    /// Generates a single SQL query from natural-language intent, optionally
    /// editing an existing query. Generation fully completes before any
    /// execution the caller may request afterwards.
    pub async fn generate_query(
        &self,
        prompt: &str,
        existing_query: Option<&str>,
    ) -> Envelope<String> {
        info!("Generating query for prompt: {prompt:?}");
        self.generate_query_inner(prompt, existing_query)
            .await
            .into()
    }

    async fn generate_query_inner(
        &self,
        prompt: &str,
        existing_query: Option<&str>,
    ) -> Result<String, CoreError> {
        let settings = self.settings.get().await?;
        let config = settings.connection.ok_or(CoreError::MissingConnection)?;

        let options = GenerateQueryOptions {
            prompt: prompt.to_string(),
            existing_query: existing_query.map(String::from),
            model: settings.model,
            api_base_url: settings.api_base_url,
        };
        let api_key = settings.api_key.unwrap_or_default();
        let ai_provider = create_ai_provider(
            &api_key,
            options.model.as_deref(),
            options.api_base_url.as_deref(),
        )?;

        let client = QueryClientBuilder::new()
            .ai_provider(ai_provider)
            .adapter(self.adapter.clone())
            .build()?;
        client.generate_query(&config, &options).await
    }

    /// Returns the persisted settings.
    pub async fn settings(&self) -> Result<Settings, CoreError> {
        self.settings.get().await
    }

    /// Returns the persisted connection descriptor, if any.
    pub async fn connection_config(&self) -> Result<Option<ConnectionConfig>, CoreError> {
        Ok(self.settings.get().await?.connection)
    }

    /// Stores the model provider API key.
    pub async fn set_api_key(&self, api_key: String) -> Result<(), CoreError> {
        self.update(|settings| settings.api_key = Some(api_key)).await
    }

    /// Stores the base URL for OpenAI-compatible alternative providers.
    pub async fn set_api_base_url(&self, api_base_url: String) -> Result<(), CoreError> {
        self.update(|settings| settings.api_base_url = Some(api_base_url))
            .await
    }

    /// Stores the preferred model identifier.
    pub async fn set_model(&self, model: String) -> Result<(), CoreError> {
        self.update(|settings| settings.model = Some(model)).await
    }

    async fn update(&self, mutate: impl FnOnce(&mut Settings)) -> Result<(), CoreError> {
        let mut settings = self.settings.get().await?;
        mutate(&mut settings);
        self.settings.set(settings).await
    }
}
