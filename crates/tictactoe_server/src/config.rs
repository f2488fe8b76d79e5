//! Server configuration.
//!
//! Values are layered: defaults, then an optional TOML file, then
//! environment variables, then command-line flags.

use crate::render::SvgRenderer;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Environment variable overriding the bind host.
pub const ENV_HOST: &str = "HOST";
/// Environment variable overriding the bind port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable enabling board image export.
pub const ENV_EXPORT_DIR: &str = "BOARD_EXPORT_DIR";

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    host: String,

    /// Port to bind to.
    port: u16,

    /// Directory rendered boards are also written to.
    export_dir: Option<PathBuf>,

    /// Width of one board cell in the rendered image, in pixels.
    cell_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            export_dir: None,
            cell_size: 100,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Host to bind to.
    pub host: Option<String>,
    /// Port to bind to.
    pub port: Option<u16>,
    /// Export directory for board images.
    pub export_dir: Option<PathBuf>,
    /// Cell size in pixels.
    pub cell_size: Option<u32>,
}

impl ServerConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Applies `HOST`, `PORT` and `BOARD_EXPORT_DIR` from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides read through `lookup`.
    #[instrument(skip(self, lookup))]
    pub fn apply_env_with(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            debug!(%host, "Host from environment");
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|e| {
                ConfigError::new(format!("Invalid {} value {:?}: {}", ENV_PORT, port, e))
            })?;
            debug!(port = self.port, "Port from environment");
        }
        if let Some(dir) = lookup(ENV_EXPORT_DIR).filter(|d| !d.trim().is_empty()) {
            self.export_dir = Some(PathBuf::from(dir));
        }
        Ok(self)
    }

    /// Applies command-line overrides.
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(dir) = overrides.export_dir {
            self.export_dir = Some(dir);
        }
        if let Some(cell_size) = overrides.cell_size {
            self.cell_size = cell_size;
        }
        self
    }

    /// Resolves the full layering: defaults, file, environment, flags.
    #[instrument(skip(overrides))]
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.apply_env()?.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let allowed = SvgRenderer::MIN_CELL_SIZE..=SvgRenderer::MAX_CELL_SIZE;
        if !allowed.contains(&self.cell_size) {
            return Err(ConfigError::new(format!(
                "cell_size must be between {} and {} pixels, got {}",
                allowed.start(),
                allowed.end(),
                self.cell_size
            )));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
