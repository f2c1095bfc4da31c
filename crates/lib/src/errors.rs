use thiserror::Error;

/// Custom error types for the application.
///
/// Every fallible core operation funnels into this enum. The `executor`
/// module converts these into the `{error, data}` envelope at the boundary,
/// so callers never see a raw fault.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Failed to send request to the model provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize the model provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("The model provider returned an error: {0}")]
    AiApi(String),
    #[error("The model response did not match the expected shape: {0}")]
    MalformedAiResponse(String),
    #[error("API key is missing")]
    MissingApiKey,
    #[error("AI provider is not configured")]
    MissingAiProvider,
    #[error("Database adapter is not configured")]
    MissingAdapter,
    #[error("Failed to connect to the database: {0}")]
    ConnectionFailed(String),
    #[error("Query execution failed: {0}")]
    QueryExecution(String),
    #[error("Schema introspection failed: {0}")]
    Introspection(String),
    #[error("The database contains no user-visible tables")]
    EmptySchema,
    #[error("No connection configuration set")]
    MissingConnection,
    #[error("Settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
