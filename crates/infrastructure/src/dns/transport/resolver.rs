use async_trait::async_trait;
use digtrace_domain::{DigError, ResolverEndpoint};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

/// Turns a resolver host name into the address to dial.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve(
        &self,
        endpoint: &ResolverEndpoint,
        timeout: Duration,
    ) -> Result<SocketAddr, DigError>;
}

/// Uses the host system's resolver; IP literals are returned without a lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHostResolver;

#[async_trait]
impl HostResolver for SystemHostResolver {
    async fn resolve(
        &self,
        endpoint: &ResolverEndpoint,
        timeout: Duration,
    ) -> Result<SocketAddr, DigError> {
        if let Some(addr) = endpoint.literal_addr() {
            return Ok(addr);
        }

        let addrs = resolve_all(endpoint.host(), endpoint.port(), timeout).await?;
        let addr = addrs[0];
        debug!(host = endpoint.host(), resolved = %addr, "Resolver host resolved");
        Ok(addr)
    }
}

/// Resolves a hostname to all its IP addresses (IPv4 + IPv6).
pub async fn resolve_all(
    hostname: &str,
    port: u16,
    timeout: Duration,
) -> Result<Vec<SocketAddr>, DigError> {
    let addrs_iter = tokio::time::timeout(timeout, tokio::net::lookup_host((hostname, port)))
        .await
        .map_err(|_| DigError::HostLookup {
            host: hostname.to_string(),
            reason: format!("timed out after {:?}", timeout),
        })?
        .map_err(|e| DigError::HostLookup {
            host: hostname.to_string(),
            reason: e.to_string(),
        })?;

    let addrs: Vec<SocketAddr> = addrs_iter.collect();

    if addrs.is_empty() {
        return Err(DigError::NoSuchHost(hostname.to_string()));
    }

    Ok(addrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_literal_skips_lookup() {
        let endpoint = ResolverEndpoint::parse("[::1]:5353").unwrap();
        let addr = SystemHostResolver
            .resolve(&endpoint, Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(addr, "[::1]:5353".parse().unwrap());
    }

    #[tokio::test]
    async fn test_localhost_resolves() {
        let endpoint = ResolverEndpoint::parse("localhost:53").unwrap();
        let addr = SystemHostResolver
            .resolve(&endpoint, Duration::from_secs(2))
            .await
            .unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 53);
    }
}
