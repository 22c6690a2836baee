use crate::errors::DigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// Transport used to reach a resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Udp,
    Tcp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Udp => "udp",
            Protocol::Tcp => "tcp",
        }
    }
}

impl FromStr for Protocol {
    type Err = DigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "udp" => Ok(Protocol::Udp),
            "tcp" => Ok(Protocol::Tcp),
            other => Err(DigError::UnsupportedProtocol(other.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolver as typed by the user: a host (IP literal or name) and a port.
///
/// Accepted forms:
/// - `1.2.3.4`, `ns1.example.com` (port 53)
/// - `1.2.3.4:5353`, `ns1.example.com:5353`
/// - `[2001:db8::1]:53`, `[2001:db8::1]`
/// - `2001:db8::1` (a bare IPv6 literal, port 53)
/// - `a:b:c:d:e:f:0:1:5353` (anything else with several colons: port after the last one)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolverEndpoint {
    host: String,
    port: u16,
}

impl ResolverEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn parse(input: &str) -> Result<Self, DigError> {
        let (host, port) = split_host_port(input)?;

        if host.is_empty() {
            return Err(invalid(input, "empty host"));
        }
        if looks_like_ipv4(host) && host.parse::<IpAddr>().is_err() {
            return Err(invalid(input, "malformed IPv4 address"));
        }

        Ok(Self::new(host, port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Socket address for IP literals; `None` when the host needs a lookup.
    pub fn literal_addr(&self) -> Option<SocketAddr> {
        self.host
            .parse::<IpAddr>()
            .ok()
            .map(|ip| SocketAddr::new(ip, self.port))
    }
}

impl FromStr for ResolverEndpoint {
    type Err = DigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResolverEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

fn split_host_port(input: &str) -> Result<(&str, u16), DigError> {
    if let Some(rest) = input.strip_prefix('[') {
        let end = rest
            .find(']')
            .ok_or_else(|| invalid(input, "missing ']'"))?;
        let host = &rest[..end];
        let port = match &rest[end + 1..] {
            "" => DEFAULT_DNS_PORT,
            tail => {
                let port_str = tail
                    .strip_prefix(':')
                    .ok_or_else(|| invalid(input, "unexpected text after ']'"))?;
                parse_port(input, port_str)?
            }
        };
        return Ok((host, port));
    }

    match input.matches(':').count() {
        0 => Ok((input, DEFAULT_DNS_PORT)),
        1 => {
            let (host, port_str) = input
                .split_once(':')
                .ok_or_else(|| invalid(input, "missing port"))?;
            Ok((host, parse_port(input, port_str)?))
        }
        _ => {
            if input.parse::<std::net::Ipv6Addr>().is_ok() {
                return Ok((input, DEFAULT_DNS_PORT));
            }
            let (host, port_str) = input
                .rsplit_once(':')
                .ok_or_else(|| invalid(input, "missing port"))?;
            Ok((host, parse_port(input, port_str)?))
        }
    }
}

fn parse_port(input: &str, port: &str) -> Result<u16, DigError> {
    if port.is_empty() {
        return Err(invalid(input, "missing port"));
    }
    port.parse::<u16>()
        .map_err(|e| invalid(input, &format!("invalid port '{}': {}", port, e)))
}

fn looks_like_ipv4(host: &str) -> bool {
    host.contains('.') && host.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn invalid(addr: &str, reason: &str) -> DigError {
    DigError::InvalidResolverAddress {
        addr: addr.to_string(),
        reason: reason.to_string(),
    }
}
