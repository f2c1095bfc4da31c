pub mod mysql;
pub mod postgres;

use crate::errors::CoreError;
use crate::types::{ColumnMetadata, ConnectionConfig};
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde_json::Value;
use std::fmt::Debug;

/// The supported relational engines.
///
/// Selected once at configuration time; everything downstream goes through
/// the [`DatabaseAdapter`] trait and never branches on this again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engine {
    Postgres,
    MySql,
}

/// The identifier quoting convention of a dialect. Owned by the adapter so
/// prompt construction never inspects the engine directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuoteStyle {
    DoubleQuote,
    Backtick,
}

impl QuoteStyle {
    /// The prompt sentence describing this convention to the model.
    pub fn instruction(&self) -> &'static str {
        match self {
            QuoteStyle::DoubleQuote => {
                "Quote identifiers with double quotes when needed, e.g. \"users\".\"created_at\"."
            }
            QuoteStyle::Backtick => {
                "Quote identifiers with backticks when needed, e.g. `users`.`created_at`."
            }
        }
    }
}

/// A trait for one relational engine behind the uniform dialect contract.
///
/// Adapters are stateless: every call opens a fresh connection and fully
/// closes it on both success and failure paths. There is no pool and no
/// handle held between calls. Adding a third engine means implementing this
/// trait and nothing else.
#[async_trait]
pub trait DatabaseAdapter: Send + Sync + Debug + DynClone {
    /// Returns the display name of the engine (e.g., "PostgreSQL").
    fn name(&self) -> &str;

    /// Returns the identifier quoting convention of this dialect.
    fn quote_style(&self) -> QuoteStyle;

    /// Opens a connection, immediately closes it, and reports whether the
    /// full round trip succeeded. Connection errors are logged and swallowed,
    /// never propagated.
    async fn test_connection(&self, config: &ConnectionConfig) -> bool;

    /// Runs exactly one statement and returns every row as a JSON object
    /// mapping column name to value, with SQL NULL preserved as JSON null.
    /// The result is never truncated or paginated.
    async fn execute(
        &self,
        config: &ConnectionConfig,
        query: &str,
    ) -> Result<Vec<Value>, CoreError>;

    /// Issues a single catalog query describing every column of every
    /// user-visible table, ordered by table name then ordinal position.
    /// Columns without constraints must survive the join (left joins only).
    async fn introspect(&self, config: &ConnectionConfig)
        -> Result<Vec<ColumnMetadata>, CoreError>;
}

dyn_clone::clone_trait_object!(DatabaseAdapter);
