//! # Natural Language to SQL
//!
//! This crate is the core of a desktop query-authoring tool: it connects to
//! a relational database, introspects its schema into a canonical textual
//! contract, and uses a configurable AI provider to turn natural-language
//! intent into a single validated SQL query, which the caller can then
//! execute through the same dialect adapter.

pub mod errors;
pub mod executor;
pub mod prompts;
pub mod providers;
pub mod schema;
pub mod settings;
pub mod types;

pub use errors::CoreError;
pub use executor::Executor;
pub use types::{
    ConnectionConfig, Envelope, GenerateQueryOptions, QueryClient, QueryClientBuilder,
};

use crate::prompts::{build_system_prompt, query_response_schema, QUERY_RESPONSE_FIELD};
use crate::schema::canonical_schema;
use serde_json::Value;
use tracing::{debug, info};

impl QueryClient {
    /// Converts a natural-language prompt into a single SQL query.
    ///
    /// Pipeline: introspect the catalog through the dialect adapter, render
    /// the canonical schema text, build the system instruction, then issue
    /// one constrained-generation call whose output must be an object with a
    /// single `query` string field. That field is returned verbatim; the
    /// read-only restriction is prompt-level policy only, and the core does
    /// not re-validate the statement.
    ///
    /// Introspection failure aborts before any model call; an empty catalog
    /// is an error of its own. Provider failures propagate with the upstream
    /// message attached and are never retried.
    pub async fn generate_query(
        &self,
        config: &ConnectionConfig,
        options: &GenerateQueryOptions,
    ) -> Result<String, CoreError> {
        info!("[generate_query] received prompt: {:?}", options.prompt);

        let columns = self.adapter.introspect(config).await?;
        if columns.is_empty() {
            return Err(CoreError::EmptySchema);
        }

        let schema_text = canonical_schema(&columns);
        let system_prompt = build_system_prompt(
            &schema_text,
            self.adapter.quote_style(),
            options.existing_query.as_deref(),
        );

        debug!(system_prompt = %system_prompt, user_prompt = %options.prompt, "--> Sending prompts to AI provider");

        let response = self
            .ai_provider
            .generate_structured(&system_prompt, &options.prompt, &query_response_schema())
            .await?;

        debug!("<-- Structured response from AI: {response}");

        match response.get(QUERY_RESPONSE_FIELD).and_then(Value::as_str) {
            Some(query) => Ok(query.to_string()),
            None => Err(CoreError::MalformedAiResponse(response.to_string())),
        }
    }
}
