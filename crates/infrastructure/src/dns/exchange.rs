//! One query/response pair over one connection, plus the retry policy.

use crate::dns::forwarding::{apply_client_subnet, MessageBuilder, ResponseParser};
use crate::dns::transport;
use async_trait::async_trait;
use digtrace_domain::config::dig::{DEFAULT_RETRY, DEFAULT_TIMEOUT};
use digtrace_domain::{ClientSubnet, DigError, Protocol};
use hickory_proto::op::Message;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Snapshot of the resolver configuration used by a single exchange.
///
/// Races and traces work on clones of this value, never on shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeSettings {
    pub local_addr: Option<IpAddr>,
    pub remote_addr: Option<SocketAddr>,
    pub backup_remote_addr: Option<SocketAddr>,
    pub client_subnet: Option<ClientSubnet>,
    pub dial_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    pub protocol: Protocol,
    pub retry: usize,
}

impl ExchangeSettings {
    pub fn dial_timeout(&self) -> Duration {
        positive_or_default(self.dial_timeout)
    }

    pub fn read_timeout(&self) -> Duration {
        positive_or_default(self.read_timeout)
    }

    pub fn write_timeout(&self) -> Duration {
        positive_or_default(self.write_timeout)
    }

    /// Number of attempts made by [`exchange_with_retry`]; never below one.
    pub fn retry(&self) -> usize {
        if self.retry > 0 {
            self.retry
        } else {
            DEFAULT_RETRY
        }
    }

    pub fn remote_addr(&self) -> Result<SocketAddr, DigError> {
        self.remote_addr.ok_or(DigError::ResolverNotConfigured)
    }

    /// The backup resolver as a primary of its own, with no backup behind it.
    pub fn use_backup(&self) -> Option<Self> {
        let backup = self.backup_remote_addr?;
        Some(Self {
            remote_addr: Some(backup),
            backup_remote_addr: None,
            ..self.clone()
        })
    }

    /// The primary resolver alone.
    pub fn without_backup(&self) -> Self {
        Self {
            backup_remote_addr: None,
            ..self.clone()
        }
    }
}

fn positive_or_default(timeout: Option<Duration>) -> Duration {
    match timeout {
        Some(t) if !t.is_zero() => t,
        _ => DEFAULT_TIMEOUT,
    }
}

/// A single exchange attempt. Implementations must not retry.
#[async_trait]
pub trait Exchanger: Send + Sync {
    async fn exchange_once(
        &self,
        settings: &ExchangeSettings,
        query: &Message,
    ) -> Result<Message, DigError>;
}

/// Exchanges messages over real UDP/TCP sockets.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkExchanger;

#[async_trait]
impl Exchanger for NetworkExchanger {
    async fn exchange_once(
        &self,
        settings: &ExchangeSettings,
        query: &Message,
    ) -> Result<Message, DigError> {
        let remote = settings.remote_addr()?;

        let mut outbound = query.clone();
        apply_client_subnet(&mut outbound, settings.client_subnet.as_ref());
        let query_bytes = MessageBuilder::serialize(&outbound)?;

        let mut conn = transport::dial(
            settings.protocol,
            settings.local_addr,
            remote,
            settings.dial_timeout(),
        )
        .await?;

        let started = Instant::now();
        let write_deadline = started + settings.write_timeout();
        let read_deadline = started + settings.read_timeout();

        timeout_at(write_deadline, conn.send(&query_bytes))
            .await
            .map_err(|_| DigError::WriteTimeout {
                server: remote.to_string(),
            })??;

        let response_bytes = timeout_at(read_deadline, conn.recv())
            .await
            .map_err(|_| DigError::ReadTimeout {
                server: remote.to_string(),
            })??;

        debug!(
            server = %remote,
            protocol = conn.protocol_name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Exchange completed"
        );

        let response = ResponseParser::parse(&response_bytes, remote)?;
        validate_response_id(query.id(), &response, &response_bytes)?;

        Ok(response)
    }
}

/// A response that does not carry the query's id is a failed attempt. The
/// error keeps the response bytes so callers can still inspect them.
pub fn validate_response_id(sent: u16, response: &Message, wire: &[u8]) -> Result<(), DigError> {
    let received = response.id();
    if received != sent {
        warn!(sent, received, "DNS response id mismatch");
        return Err(DigError::IdMismatch {
            sent,
            received,
            response: wire.to_vec(),
        });
    }
    Ok(())
}

/// Runs up to `settings.retry()` attempts, returning the first success or
/// the last error. Configuration errors end the loop immediately.
pub async fn exchange_with_retry(
    exchanger: &dyn Exchanger,
    settings: &ExchangeSettings,
    query: &Message,
) -> Result<Message, DigError> {
    let attempts = settings.retry();
    let mut attempt = 1;

    loop {
        match exchanger.exchange_once(settings, query).await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_config_error() || attempt >= attempts => return Err(e),
            Err(e) => {
                warn!(attempt, attempts, error = %e, "Exchange failed, retrying");
                attempt += 1;
            }
        }
    }
}
