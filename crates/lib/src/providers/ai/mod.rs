pub mod openai;

use crate::errors::CoreError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde_json::Value;
use std::fmt::Debug;

/// A trait for interacting with a generation provider.
///
/// This defines the single seam between the core and a language model:
/// a constrained-generation call whose output must conform to the supplied
/// JSON schema. Providers never retry; every upstream failure is reported
/// once with the original message attached.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a JSON object conforming to `response_schema` from the
    /// given system and user prompts.
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        response_schema: &Value,
    ) -> Result<Value, CoreError>;
}

dyn_clone::clone_trait_object!(AiProvider);
