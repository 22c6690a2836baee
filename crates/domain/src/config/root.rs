use serde::{Deserialize, Serialize};

use super::dig::DigConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::trace::TraceConfig;
use crate::dns_protocol::Protocol;

const LOCAL_CONFIG_FILE: &str = "digtrace.toml";

/// Main configuration structure for digtrace
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Resolver, transport and timeout settings
    #[serde(default)]
    pub dig: DigConfig,

    /// Iterative trace settings
    #[serde(default)]
    pub trace: TraceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. digtrace.toml in current directory
    /// 3. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_FILE).exists() {
            Self::from_file(LOCAL_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(server) = overrides.server {
            self.dig.server = Some(server);
        }
        if let Some(backup) = overrides.backup_server {
            self.dig.backup_server = Some(backup);
        }
        if let Some(local) = overrides.local_addr {
            self.dig.local_addr = Some(local);
        }
        if let Some(subnet) = overrides.client_subnet {
            self.dig.client_subnet = Some(subnet);
        }
        if let Some(protocol) = overrides.protocol {
            self.dig.protocol = protocol;
        }
        if let Some(timeout) = overrides.timeout_ms {
            self.dig.dial_timeout_ms = timeout;
            self.dig.read_timeout_ms = timeout;
            self.dig.write_timeout_ms = timeout;
        }
        if let Some(retry) = overrides.retry {
            self.dig.retry = retry;
        }
        if let Some(max_hops) = overrides.max_hops {
            self.trace.max_hops = max_hops;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dig.validate()?;

        if self.trace.max_hops == 0 {
            return Err(ConfigError::Invalid {
                field: "trace.max_hops",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::Write {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub server: Option<String>,
    pub backup_server: Option<String>,
    pub local_addr: Option<String>,
    pub client_subnet: Option<String>,
    pub protocol: Option<Protocol>,
    pub timeout_ms: Option<u64>,
    pub retry: Option<usize>,
    pub max_hops: Option<usize>,
    pub log_level: Option<String>,
}
