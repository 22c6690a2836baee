use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigError {
    #[error("Bad resolver address {addr}: {reason}")]
    InvalidResolverAddress { addr: String, reason: String },

    #[error("Resolver address not configured, forgot set_dns?")]
    ResolverNotConfigured,

    #[error("Invalid client subnet {0}: not an IPv4 address")]
    InvalidClientSubnet(String),

    #[error("Invalid local address: {0}")]
    InvalidLocalAddress(String),

    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Host lookup failed for {host}: {reason}")]
    HostLookup { host: String, reason: String },

    #[error("No such host: {0}")]
    NoSuchHost(String),

    #[error("Timeout connecting to {server}")]
    DialTimeout { server: String },

    #[error("Failed to connect to {server}: {reason}")]
    Dial { server: String, reason: String },

    #[error("Timeout sending query to {server}")]
    WriteTimeout { server: String },

    #[error("Timeout waiting for response from {server}")]
    ReadTimeout { server: String },

    #[error("I/O error with {server}: {reason}")]
    Io { server: String, reason: String },

    #[error("Invalid DNS response from {server}: {reason}")]
    InvalidDnsResponse { server: String, reason: String },

    #[error("Failed to encode DNS message: {0}")]
    Encode(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("DNS id mismatch: sent {sent}, received {received}")]
    IdMismatch {
        sent: u16,
        received: u16,
        /// The mismatched response as received on the wire
        response: Vec<u8>,
    },

    #[error("Neither resolver produced a result")]
    RaceFailed,

    #[error("{server}: {reason}")]
    TraceHop { server: String, reason: Box<DigError> },

    #[error("Referral loop: no authoritative answer after {0} hops")]
    ReferralLoop(usize),

    #[error("Trace returned no responses")]
    EmptyTrace,
}

impl DigError {
    /// Configuration errors are fatal to the call and never retried.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DigError::InvalidResolverAddress { .. }
                | DigError::ResolverNotConfigured
                | DigError::InvalidClientSubnet(_)
                | DigError::InvalidLocalAddress(_)
                | DigError::UnsupportedProtocol(_)
                | DigError::ConfigError(_)
                | DigError::InvalidDomainName(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            DigError::DialTimeout { .. } | DigError::WriteTimeout { .. } | DigError::ReadTimeout { .. }
        )
    }
}
