//! Configuration management for SkillSwap CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skillswap::{AuthInfo, MemoryStore, SkillSwapClient};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::demo;

/// CLI configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Authentication credentials.
    pub auth: Option<AuthConfig>,
    /// Document service settings.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Access token.
    pub token: String,
    /// User ID.
    pub uid: String,
    /// Display name used as the author of new listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AuthConfig {
    fn to_auth_info(&self) -> AuthInfo {
        let info = AuthInfo::new(&self.token, self.uid.as_str());
        match &self.name {
            Some(name) => info.with_name(name),
            None => info,
        }
    }
}

/// Document service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the document service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Live query polling interval in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,
}

/// Where the client keeps its data.
#[derive(Debug, Clone)]
pub enum Backend {
    /// The configured document service.
    Remote,
    /// A seeded in-process store, discarded on exit.
    Offline(MemoryStore),
}

impl Backend {
    pub async fn from_flag(offline: bool) -> Result<Self> {
        if !offline {
            return Ok(Backend::Remote);
        }
        let store = demo::seeded_store()
            .await
            .context("Failed to seed offline store")?;
        tracing::info!("offline mode: changes are discarded on exit");
        Ok(Backend::Offline(store))
    }
}

/// Get the configuration file path.
pub fn config_path() -> Result<PathBuf> {
    let exe_path = env::current_exe().context("Could not determine executable path")?;
    let exe_dir = exe_path
        .parent()
        .context("Could not determine executable directory")?;

    Ok(exe_dir.join("skillswap.toml"))
}

/// Load configuration from file.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).context("Failed to read config file")?;

    toml::from_str(&content).context("Failed to parse config file")
}

/// Save configuration to file.
pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content).context("Failed to write config file")?;

    Ok(())
}

fn build_with(config: Config, auth: Option<AuthConfig>, backend: &Backend) -> Result<SkillSwapClient> {
    let mut builder = SkillSwapClient::builder();

    if let Some(auth) = auth {
        builder = builder.with_auth(auth.to_auth_info());
    }

    match backend {
        Backend::Offline(store) => {
            builder = builder.store(Arc::new(store.clone()));
        }
        Backend::Remote => {
            if let Some(url) = config.backend.base_url {
                builder = builder.base_url(url);
            }
            if let Some(ms) = config.backend.poll_interval_ms {
                builder = builder.poll_interval(Duration::from_millis(ms));
            }
        }
    }

    builder.build().context("Failed to build SkillSwap client")
}

/// Build a SkillSwap client from the current configuration.
pub fn build_client(backend: &Backend) -> Result<SkillSwapClient> {
    let mut config = load_config()?;
    let auth = config.auth.take();
    build_with(config, auth, backend)
}

/// Build a SkillSwap client that requires authentication.
pub fn build_authed_client(backend: &Backend) -> Result<SkillSwapClient> {
    let mut config = load_config()?;

    let auth = config
        .auth
        .take()
        .context("Authentication required. Run 'skillswap auth login' first.")?;

    build_with(config, Some(auth), backend)
}
