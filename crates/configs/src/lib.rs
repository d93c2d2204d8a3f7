use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_signups_path")]
    pub signups_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { signups_path: default_signups_path() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }
fn default_signups_path() -> PathBuf { PathBuf::from("beta-signups.json") }

pub fn config_path() -> PathBuf {
    std::env::var("CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// `None` only when the file does not exist; unreadable or malformed files are errors.
pub fn load_if_present(path: &Path) -> Result<Option<AppConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(anyhow!("read {}: {e}", path.display())),
    };
    load_from_str(&content)
        .map(Some)
        .map_err(|e| anyhow!("parse {}: {e}", path.display()))
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// `$CONFIG_PATH` (or `config.toml`) when it exists, otherwise the environment.
    pub fn load_or_env() -> Result<Self> {
        Self::load_from_path_or_env(&config_path())
    }

    pub fn load_from_path_or_env(path: &Path) -> Result<Self> {
        let mut cfg = load_if_present(path)?.unwrap_or_else(Self::from_env);
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// `SERVER_HOST`, `PORT` (or `SERVER_PORT`), `SIGNUPS_PATH`, `TOKIO_WORKER_THREADS`.
    pub fn from_env() -> Self {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("PORT")
            .or_else(|_| std::env::var("SERVER_PORT"))
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or_else(default_port);
        let worker_threads = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok());
        let signups_path = std::env::var("SIGNUPS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_signups_path());
        Self {
            server: ServerConfig { host, port, worker_threads },
            storage: StorageConfig { signups_path },
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.signups_path.as_os_str().is_empty() {
            return Err(anyhow!("storage.signups_path is empty"));
        }
        Ok(())
    }
}
