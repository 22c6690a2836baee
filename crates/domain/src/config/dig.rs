use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ConfigError;
use crate::client_subnet::ClientSubnet;
use crate::dns_protocol::{Protocol, ResolverEndpoint};

/// Dial, read and write timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

pub const DEFAULT_RETRY: usize = 1;

/// File-level resolver settings. Zero timeouts and a zero retry count fall
/// back to the defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DigConfig {
    #[serde(default)]
    pub server: Option<String>,

    #[serde(default)]
    pub backup_server: Option<String>,

    #[serde(default)]
    pub local_addr: Option<String>,

    #[serde(default)]
    pub client_subnet: Option<String>,

    #[serde(default)]
    pub protocol: Protocol,

    #[serde(default)]
    pub dial_timeout_ms: u64,

    #[serde(default)]
    pub read_timeout_ms: u64,

    #[serde(default)]
    pub write_timeout_ms: u64,

    #[serde(default)]
    pub retry: usize,
}

impl DigConfig {
    pub fn dial_timeout(&self) -> Duration {
        or_default(self.dial_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        or_default(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        or_default(self.write_timeout_ms)
    }

    pub fn retry(&self) -> usize {
        if self.retry > 0 {
            self.retry
        } else {
            DEFAULT_RETRY
        }
    }

    /// Checks the syntax of every address-like field without any lookups.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let servers = [
            ("dig.server", &self.server),
            ("dig.backup_server", &self.backup_server),
        ];
        for (field, server) in servers {
            if let Some(server) = server {
                ResolverEndpoint::parse(server).map_err(|e| ConfigError::Invalid {
                    field,
                    reason: e.to_string(),
                })?;
            }
        }
        if let Some(subnet) = &self.client_subnet {
            subnet
                .parse::<ClientSubnet>()
                .map_err(|e| ConfigError::Invalid {
                    field: "dig.client_subnet",
                    reason: e.to_string(),
                })?;
        }
        if let Some(local) = &self.local_addr {
            local
                .parse::<std::net::IpAddr>()
                .map_err(|e| ConfigError::Invalid {
                    field: "dig.local_addr",
                    reason: format!("{}: {}", local, e),
                })?;
        }
        Ok(())
    }
}

fn or_default(ms: u64) -> Duration {
    if ms == 0 {
        DEFAULT_TIMEOUT
    } else {
        Duration::from_millis(ms)
    }
}
