//! Configuration management.
//!
//! Read from a JSON file (`config.json` in the working directory unless
//! `--config` says otherwise). Unknown keys such as bot credentials are
//! ignored so the same file can be shared with the chat integration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base path of all server log folders. The port is appended verbatim,
    /// so this usually ends with a path separator.
    #[serde(default)]
    pub path: String,

    /// Server port whose logs are watched.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Display label template; `{0}` is the current count, `{1}` the maximum.
    #[serde(default = "default_nickname")]
    pub nickname: String,

    /// Maximum player count shown in the label.
    #[serde(rename = "maxplayers", default = "default_max_players")]
    pub max_players: u32,

    /// Optional file that always holds the latest label.
    #[serde(rename = "labelFile", default)]
    pub label_file: Option<PathBuf>,
}

fn default_port() -> u16 {
    7777
}

fn default_nickname() -> String {
    scpwatch_presence::DEFAULT_TEMPLATE.into()
}

fn default_max_players() -> u32 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: String::new(),
            port: default_port(),
            nickname: default_nickname(),
            max_players: default_max_players(),
            label_file: None,
        }
    }
}

impl Config {
    /// Loads configuration from `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration read");
        Ok(config)
    }

    /// The watched log directory: `path` followed by `port`.
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.path, self.port))
    }

    /// Rejects settings the watcher cannot run with.
    ///
    /// The label file must live outside the watched directory, otherwise
    /// every publish is seen as a log update and publishes again.
    pub fn validate(&self) -> anyhow::Result<()> {
        let Some(label_file) = &self.label_file else {
            return Ok(());
        };

        let log_dir = self.log_dir();
        let log_dir = std::fs::canonicalize(&log_dir).unwrap_or(log_dir);
        let label_dir = match label_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let label_dir = std::fs::canonicalize(&label_dir).unwrap_or(label_dir);

        if label_dir.starts_with(&log_dir) {
            anyhow::bail!(
                "labelFile {} is inside the watched log directory {}",
                label_file.display(),
                log_dir.display()
            );
        }
        Ok(())
    }
}
