#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared mocks for the logic tests: a scripted AI provider and an in-memory
//! dialect adapter, so generation tests run without a database or a model.

use async_trait::async_trait;
use serde_json::{json, Value};
use snapquery::errors::CoreError;
use snapquery::providers::ai::AiProvider;
use snapquery::providers::db::{DatabaseAdapter, QuoteStyle};
use snapquery::types::{ColumnMetadata, ConnectionConfig, ConstraintKind};
use std::sync::{Arc, Once, RwLock};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// A structured descriptor pointing at a host that accepts no connections.
pub fn unreachable_config() -> ConnectionConfig {
    ConnectionConfig::Params {
        host: "127.0.0.1".into(),
        port: Some(1),
        username: "app".into(),
        password: "secret".into(),
        database: "inventory".into(),
    }
}

/// Builds one catalog row.
pub fn column(
    table: &str,
    name: &str,
    data_type: &str,
    max_length: Option<i64>,
    nullable: bool,
    default: Option<&str>,
    constraint: Option<ConstraintKind>,
    foreign: Option<(&str, &str)>,
) -> ColumnMetadata {
    ColumnMetadata {
        table: table.into(),
        column: name.into(),
        data_type: data_type.into(),
        max_length,
        nullable,
        default: default.map(String::from),
        constraint,
        foreign_table: foreign.map(|(t, _)| t.to_string()),
        foreign_column: foreign.map(|(_, c)| c.to_string()),
    }
}

/// A small two-table catalog used across the generation tests.
pub fn sample_columns() -> Vec<ColumnMetadata> {
    vec![
        column(
            "users",
            "id",
            "integer",
            None,
            false,
            Some("nextval('users_id_seq'::regclass)"),
            Some(ConstraintKind::PrimaryKey),
            None,
        ),
        column(
            "users",
            "email",
            "character varying",
            Some(255),
            false,
            None,
            None,
            None,
        ),
        column(
            "users",
            "created_at",
            "timestamp with time zone",
            None,
            true,
            Some("now()"),
            None,
            None,
        ),
        column(
            "orders",
            "id",
            "integer",
            None,
            false,
            None,
            Some(ConstraintKind::PrimaryKey),
            None,
        ),
        column(
            "orders",
            "user_id",
            "integer",
            None,
            false,
            None,
            Some(ConstraintKind::ForeignKey),
            Some(("users", "id")),
        ),
        column("orders", "total", "numeric", None, true, None, None, None),
    ]
}

// --- Mock AI Provider ---

/// Records every call and replays scripted responses in order; when the
/// script runs out it falls back to a fixed default, which keeps repeated
/// identical calls deterministic.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<(String, String)>>>,
    pub responses: Arc<RwLock<Vec<Value>>>,
}

impl MockAiProvider {
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(responses.into_iter().rev().collect())),
        }
    }

    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.call_history.read().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        _response_schema: &Value,
    ) -> Result<Value, CoreError> {
        self.call_history
            .write()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if let Some(response) = self.responses.write().unwrap().pop() {
            Ok(response)
        } else {
            Ok(json!({"query": "SELECT 1"}))
        }
    }
}

/// An AI provider that always fails with the given upstream message.
#[derive(Clone, Debug)]
pub struct FailingAiProvider {
    pub message: String,
}

#[async_trait]
impl AiProvider for FailingAiProvider {
    async fn generate_structured(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _response_schema: &Value,
    ) -> Result<Value, CoreError> {
        Err(CoreError::AiApi(self.message.clone()))
    }
}

// --- Mock Dialect Adapter ---

/// An in-memory adapter with canned catalog rows and query results.
#[derive(Clone, Debug)]
pub struct MockAdapter {
    pub columns: Vec<ColumnMetadata>,
    pub rows: Vec<Value>,
    pub quote_style: QuoteStyle,
    pub fail_introspection: bool,
    pub fail_execution: Option<String>,
}

impl MockAdapter {
    pub fn new(columns: Vec<ColumnMetadata>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            quote_style: QuoteStyle::DoubleQuote,
            fail_introspection: false,
            fail_execution: None,
        }
    }
}

#[async_trait]
impl DatabaseAdapter for MockAdapter {
    fn name(&self) -> &str {
        "MockDB"
    }

    fn quote_style(&self) -> QuoteStyle {
        self.quote_style
    }

    async fn test_connection(&self, _config: &ConnectionConfig) -> bool {
        true
    }

    async fn execute(
        &self,
        _config: &ConnectionConfig,
        _query: &str,
    ) -> Result<Vec<Value>, CoreError> {
        if let Some(message) = &self.fail_execution {
            return Err(CoreError::QueryExecution(message.clone()));
        }
        Ok(self.rows.clone())
    }

    async fn introspect(
        &self,
        _config: &ConnectionConfig,
    ) -> Result<Vec<ColumnMetadata>, CoreError> {
        if self.fail_introspection {
            return Err(CoreError::Introspection("catalog query failed".into()));
        }
        Ok(self.columns.clone())
    }
}
