//! Configuration for the `maconomy` binary.
//!
//! Values are layered: YAML file, then `MACONOMY_*` environment variables,
//! then command-line flags. The result is validated once before any command
//! runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use maconomy_core::RpcConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

pub const DEFAULT_SESSION_FILE: &str = ".maconomy-session-id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_rpc")]
    pub rpc: RpcConfig,

    /// Where the session id from `login` is kept between invocations.
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

fn default_rpc() -> RpcConfig {
    RpcConfig::new("")
}

fn default_session_file() -> PathBuf {
    PathBuf::from(DEFAULT_SESSION_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: default_rpc(),
            session_file: default_session_file(),
        }
    }
}

impl Config {
    /// `config.yaml` in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "maconomy").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                tracing::warn!("Config file not found at {}, using defaults", path.display());
                Self::default()
            }
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("MACONOMY_RPC_URL") {
            self.rpc.endpoint = url;
        }

        if let Ok(timeout) = std::env::var("MACONOMY_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.rpc.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid MACONOMY_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(lang) = std::env::var("MACONOMY_LANG") {
            self.rpc.options.lang = lang;
        }

        if let Ok(locale) = std::env::var("MACONOMY_LOCALE") {
            self.rpc.options.locale = locale;
        }

        if let Ok(path) = std::env::var("MACONOMY_SESSION_FILE") {
            self.session_file = PathBuf::from(path);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.rpc_url {
            self.rpc.endpoint = url.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc.endpoint.trim().is_empty() {
            anyhow::bail!("No RPC endpoint configured. Set rpc.endpoint in the config file, MACONOMY_RPC_URL or --rpc-url");
        }
        self.rpc.validate()?;
        if self.session_file.as_os_str().is_empty() {
            anyhow::bail!("session_file must not be empty");
        }
        Ok(())
    }
}
