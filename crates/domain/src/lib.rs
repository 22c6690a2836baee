//! digtrace domain layer: codec-independent types shared by the resolver
//! engine and the command line.
pub mod client_subnet;
pub mod config;
pub mod dns_protocol;
pub mod dns_record;
pub mod errors;

pub use client_subnet::ClientSubnet;
pub use config::{CliOverrides, Config, ConfigError, DigConfig, LoggingConfig, TraceConfig};
pub use dns_protocol::{Protocol, ResolverEndpoint, DEFAULT_DNS_PORT};
pub use dns_record::RecordType;
pub use errors::DigError;
