//! # Settings Gateway
//!
//! The persistence seam for the connection descriptor and model provider
//! credentials. The core never touches the storage medium directly; it goes
//! through [`SettingsGateway`], which makes an in-memory fake trivially
//! substitutable in tests.

use crate::errors::CoreError;
use crate::types::ConnectionConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::warn;

/// Everything the desktop process persists between sessions.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub connection: Option<ConnectionConfig>,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub model: Option<String>,
}

/// The sole source of truth for "is a connection configured".
///
/// An empty `connection` means unconfigured; callers surface
/// [`CoreError::MissingConnection`] rather than attempting to connect.
#[async_trait]
pub trait SettingsGateway: Send + Sync + Debug {
    async fn get(&self) -> Result<Settings, CoreError>;
    async fn set(&self, settings: Settings) -> Result<(), CoreError>;
}

/// A JSON-file-backed gateway.
///
/// A missing file reads as defaults. An unreadable or invalid file also
/// reads as defaults and is rewritten in place, so one corrupt write never
/// wedges the application.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsGateway for JsonFileSettings {
    async fn get(&self) -> Result<Settings, CoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Settings::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!("Settings file is invalid, resetting to defaults: {e}");
                let defaults = Settings::default();
                self.set(defaults.clone()).await?;
                Ok(defaults)
            }
        }
    }

    async fn set(&self, settings: Settings) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(&settings)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

/// An in-memory gateway for tests and embedders that manage persistence
/// themselves.
#[derive(Debug, Default)]
pub struct MemorySettings {
    inner: RwLock<Settings>,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }
}

#[async_trait]
impl SettingsGateway for MemorySettings {
    async fn get(&self) -> Result<Settings, CoreError> {
        Ok(self.inner.read().await.clone())
    }

    async fn set(&self, settings: Settings) -> Result<(), CoreError> {
        *self.inner.write().await = settings;
        Ok(())
    }
}
