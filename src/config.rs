use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;

/// Default bind address.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8088";

/// Default capacity of the per-connection read buffer, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 256;

/// Environment variable naming a YAML configuration file.
pub const CONFIG_ENV: &str = "FERRY_CONFIG";

/// Environment variable overriding `server.listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Capacity of the read buffer. A read returning fewer bytes than this
    /// ends the request.
    pub buffer_size: usize,
    /// Upper bound on a single read. Unset means reads may block forever.
    pub read_timeout_ms: Option<u64>,
    /// Dispatch each connection on its own task instead of one at a time.
    pub concurrent: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            read_timeout_ms: None,
            concurrent: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.listen_addr.is_empty() {
            bail!("server.listen_addr must not be empty");
        }
        if self.buffer_size == 0 {
            bail!("server.buffer_size must be greater than zero");
        }
        if self.read_timeout_ms == Some(0) {
            bail!("server.read_timeout_ms must be greater than zero when set");
        }
        Ok(())
    }
}

impl LoggingConfig {
    /// Parses the configured level into a `tracing::Level`.
    pub fn max_level(&self) -> anyhow::Result<tracing::Level> {
        self.level
            .parse()
            .with_context(|| format!("invalid log level {:?}", self.level))
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// Starts from the YAML file named by `FERRY_CONFIG` (or the defaults when
    /// unset), then applies the `LISTEN` override.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                Self::parse(&text)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var(LISTEN_ENV) {
            cfg.server.listen_addr = listen_addr;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg = Self::parse(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn parse(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("invalid YAML configuration")
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.server.validate()?;
        self.logging.max_level()?;
        Ok(())
    }
}
