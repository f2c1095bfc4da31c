//! # Prompt Construction
//!
//! Builds the system instruction for query generation and defines the
//! response shape the model is constrained to. The read-only restriction
//! lives here, at the prompt level only; nothing downstream parses or
//! rejects the generated statement.

use crate::providers::db::QuoteStyle;
use serde_json::{json, Value};

/// The single field name the model must return.
pub const QUERY_RESPONSE_FIELD: &str = "query";

/// The JSON schema the model response is constrained to: an object with
/// exactly one required string field named [`QUERY_RESPONSE_FIELD`].
pub fn query_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            QUERY_RESPONSE_FIELD: {
                "type": "string",
                "description": "A single SQL query with no surrounding commentary."
            }
        },
        "required": [QUERY_RESPONSE_FIELD],
        "additionalProperties": false
    })
}

/// Builds the system instruction for one generation request.
///
/// Embeds the canonical schema text verbatim, states the read-only
/// constraint, and names the identifier quoting convention of the active
/// dialect. When `existing_query` is non-empty after trimming it is quoted
/// verbatim as editing context.
pub fn build_system_prompt(
    schema_text: &str,
    quote_style: QuoteStyle,
    existing_query: Option<&str>,
) -> String {
    let mut prompt = format!(
        "You are an expert SQL engineer. Write a single read-only query that answers the user's request.\n\n\
         # Rules\n\
         1. Produce exactly one retrieval statement (SELECT or WITH). Never produce INSERT, UPDATE, DELETE, DDL, or any other statement that modifies data or schema.\n\
         2. {}\n\
         3. Only reference tables and columns that appear in the schema below.\n\
         4. Do not add explanations, apologies, or markdown formatting.\n\n\
         # Database schema\n\
         {}",
        quote_style.instruction(),
        schema_text
    );

    if let Some(existing) = existing_query {
        if !existing.trim().is_empty() {
            prompt.push_str(&format!(
                "\n\n# Existing query\n\
                 The user is editing the following query. Treat it as the starting point and apply the requested change to it:\n\
                 {existing}"
            ));
        }
    }

    prompt
}
