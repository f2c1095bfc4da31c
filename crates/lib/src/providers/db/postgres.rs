//! PostgreSQL dialect adapter.

use crate::errors::CoreError;
use crate::providers::db::{DatabaseAdapter, QuoteStyle};
use crate::types::{ColumnMetadata, ConnectionConfig, ConstraintKind};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{json, Value};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{Column, ConnectOptions, Connection, Row, TypeInfo};
use tracing::{debug, error, warn};

const DEFAULT_PORT: u16 = 5432;

/// One catalog query covering all eight column facts. Constraint joins are
/// LEFT so columns without any constraint survive; system catalogs are
/// excluded. Ordered by table name then ordinal position for stable output.
const INTROSPECTION_SQL: &str = r#"
SELECT
    c.table_name::text AS table_name,
    c.column_name::text AS column_name,
    c.data_type::text AS data_type,
    c.character_maximum_length::bigint AS character_maximum_length,
    c.is_nullable::text AS is_nullable,
    c.column_default::text AS column_default,
    tc.constraint_type::text AS constraint_type,
    ccu.table_name::text AS foreign_table_name,
    ccu.column_name::text AS foreign_column_name
FROM information_schema.columns c
JOIN information_schema.tables t
  ON t.table_schema = c.table_schema
 AND t.table_name = c.table_name
 AND t.table_type = 'BASE TABLE'
LEFT JOIN information_schema.key_column_usage kcu
  ON kcu.table_schema = c.table_schema
 AND kcu.table_name = c.table_name
 AND kcu.column_name = c.column_name
LEFT JOIN information_schema.table_constraints tc
  ON tc.constraint_name = kcu.constraint_name
 AND tc.table_schema = kcu.table_schema
 AND tc.constraint_type IN ('PRIMARY KEY', 'FOREIGN KEY')
LEFT JOIN information_schema.constraint_column_usage ccu
  ON ccu.constraint_name = tc.constraint_name
 AND ccu.table_schema = tc.table_schema
 AND tc.constraint_type = 'FOREIGN KEY'
WHERE c.table_schema NOT IN ('pg_catalog', 'information_schema')
ORDER BY c.table_name, c.ordinal_position
"#;

/// The PostgreSQL adapter. Stateless; each call is self-contained.
#[derive(Clone, Debug, Default)]
pub struct PostgresAdapter;

impl PostgresAdapter {
    pub fn new() -> Self {
        Self
    }

    fn connect_options(config: &ConnectionConfig) -> Result<PgConnectOptions, CoreError> {
        match config {
            ConnectionConfig::Url { connection_string } => connection_string
                .parse::<PgConnectOptions>()
                .map_err(|e| CoreError::ConnectionFailed(e.to_string())),
            ConnectionConfig::Params {
                host,
                port,
                username,
                password,
                database,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(port.unwrap_or(DEFAULT_PORT))
                .username(username)
                .password(password)
                .database(database)),
        }
    }

    async fn open(config: &ConnectionConfig) -> Result<PgConnection, CoreError> {
        Self::connect_options(config)?
            .connect()
            .await
            .map_err(|e| CoreError::ConnectionFailed(e.to_string()))
    }
}

#[async_trait]
impl DatabaseAdapter for PostgresAdapter {
    fn name(&self) -> &str {
        "PostgreSQL"
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::DoubleQuote
    }

    async fn test_connection(&self, config: &ConnectionConfig) -> bool {
        match Self::open(config).await {
            Ok(conn) => match conn.close().await {
                Ok(()) => true,
                Err(e) => {
                    error!("Failed to close PostgreSQL test connection: {e}");
                    false
                }
            },
            Err(e) => {
                error!("PostgreSQL connection test failed: {e}");
                false
            }
        }
    }

    async fn execute(
        &self,
        config: &ConnectionConfig,
        query: &str,
    ) -> Result<Vec<Value>, CoreError> {
        debug!(query = %query, "--> Executing PostgreSQL query");
        let mut conn = Self::open(config).await?;
        let result = sqlx::query(query).fetch_all(&mut conn).await;
        if let Err(e) = conn.close().await {
            warn!("Failed to close PostgreSQL connection: {e}");
        }
        let rows = result.map_err(|e| CoreError::QueryExecution(e.to_string()))?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn introspect(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Vec<ColumnMetadata>, CoreError> {
        let mut conn = Self::open(config).await?;
        let result = sqlx::query(INTROSPECTION_SQL).fetch_all(&mut conn).await;
        if let Err(e) = conn.close().await {
            warn!("Failed to close PostgreSQL connection: {e}");
        }
        let rows = result.map_err(|e| CoreError::Introspection(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let constraint_label: Option<String> = row
                    .try_get("constraint_type")
                    .map_err(|e| CoreError::Introspection(e.to_string()))?;
                let nullable: String = row
                    .try_get("is_nullable")
                    .map_err(|e| CoreError::Introspection(e.to_string()))?;
                Ok(ColumnMetadata {
                    table: catalog_field(row, "table_name")?,
                    column: catalog_field(row, "column_name")?,
                    data_type: catalog_field(row, "data_type")?,
                    max_length: row
                        .try_get("character_maximum_length")
                        .map_err(|e| CoreError::Introspection(e.to_string()))?,
                    nullable: nullable == "YES",
                    default: row
                        .try_get("column_default")
                        .map_err(|e| CoreError::Introspection(e.to_string()))?,
                    constraint: constraint_label
                        .as_deref()
                        .and_then(ConstraintKind::from_catalog),
                    foreign_table: row
                        .try_get("foreign_table_name")
                        .map_err(|e| CoreError::Introspection(e.to_string()))?,
                    foreign_column: row
                        .try_get("foreign_column_name")
                        .map_err(|e| CoreError::Introspection(e.to_string()))?,
                })
            })
            .collect()
    }
}

fn catalog_field(row: &PgRow, name: &str) -> Result<String, CoreError> {
    row.try_get(name)
        .map_err(|e| CoreError::Introspection(e.to_string()))
}

/// Converts a PostgreSQL row to a JSON object, preserving NULLs.
fn row_to_json(row: &PgRow) -> Value {
    let mut map = serde_json::Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = decode_value(row, index, column.type_info().name());
        map.insert(column.name().to_string(), value);
    }
    Value::Object(map)
}

/// Decodes one cell by catalog type name, falling back to a string
/// rendering for types without a native JSON mapping.
fn decode_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "BOOL" => json!(row.try_get::<Option<bool>, _>(index).ok().flatten()),
        "INT2" => json!(row.try_get::<Option<i16>, _>(index).ok().flatten()),
        "INT4" => json!(row.try_get::<Option<i32>, _>(index).ok().flatten()),
        "INT8" => json!(row.try_get::<Option<i64>, _>(index).ok().flatten()),
        "FLOAT4" => json!(row.try_get::<Option<f32>, _>(index).ok().flatten()),
        "FLOAT8" => json!(row.try_get::<Option<f64>, _>(index).ok().flatten()),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => {
            json!(row.try_get::<Option<String>, _>(index).ok().flatten())
        }
        "UUID" => json!(row
            .try_get::<Option<uuid::Uuid>, _>(index)
            .ok()
            .flatten()
            .map(|u| u.to_string())),
        "JSON" | "JSONB" => row
            .try_get::<Option<Value>, _>(index)
            .ok()
            .flatten()
            .unwrap_or(Value::Null),
        "TIMESTAMPTZ" => json!(row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .ok()
            .flatten()
            .map(|t| t.to_rfc3339())),
        "TIMESTAMP" => json!(row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(|t| t.to_string())),
        "DATE" => json!(row
            .try_get::<Option<NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map(|d| d.to_string())),
        "TIME" => json!(row
            .try_get::<Option<NaiveTime>, _>(index)
            .ok()
            .flatten()
            .map(|t| t.to_string())),
        "NUMERIC" => json!(row
            .try_get::<Option<sqlx::types::BigDecimal>, _>(index)
            .ok()
            .flatten()
            .map(|d| d.to_string())),
        "BYTEA" => json!(row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(|bytes| format!("[BLOB: {} bytes]", bytes.len()))),
        other => match row.try_get::<Option<String>, _>(index) {
            Ok(value) => json!(value),
            Err(_) => Value::String(format!("<{other}>")),
        },
    }
}
