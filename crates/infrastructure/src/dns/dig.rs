use crate::dns::exchange::{exchange_with_retry, ExchangeSettings, Exchanger, NetworkExchanger};
use crate::dns::forwarding::MessageBuilder;
use crate::dns::race::race_exchange;
use crate::dns::selector::{RandomSelector, ServerSelector};
use crate::dns::transport::{HostResolver, SystemHostResolver};
use digtrace_domain::config::trace::DEFAULT_MAX_HOPS;
use digtrace_domain::{
    ClientSubnet, DigConfig, DigError, Protocol, RecordType, ResolverEndpoint, TraceConfig,
};
use hickory_proto::op::Message;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A DNS query client: resolver endpoints, transport options and the
/// pluggable pieces used to exchange messages.
///
/// Setters mutate the configuration in place; exchanges only ever read a
/// snapshot of it, so a `Dig` can be reconfigured between queries.
pub struct Dig {
    settings: ExchangeSettings,
    exchanger: Arc<dyn Exchanger>,
    pub(crate) host_resolver: Arc<dyn HostResolver>,
    pub(crate) selector: Arc<dyn ServerSelector>,
    pub(crate) max_hops: usize,
}

impl Default for Dig {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Dig {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            exchanger: Arc::clone(&self.exchanger),
            host_resolver: Arc::clone(&self.host_resolver),
            selector: Arc::clone(&self.selector),
            max_hops: self.max_hops,
        }
    }
}

impl Dig {
    pub fn new() -> Self {
        Self {
            settings: ExchangeSettings::default(),
            exchanger: Arc::new(NetworkExchanger),
            host_resolver: Arc::new(SystemHostResolver),
            selector: Arc::new(RandomSelector),
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    /// Builds a client from file configuration, resolving server names.
    pub async fn from_config(dig: &DigConfig, trace: &TraceConfig) -> Result<Self, DigError> {
        let mut client = Self::new().with_max_hops(trace.max_hops);

        client.settings.protocol = dig.protocol;
        client.settings.retry = dig.retry();
        client.set_dial_timeout(dig.dial_timeout());
        client.set_read_timeout(dig.read_timeout());
        client.set_write_timeout(dig.write_timeout());

        if let Some(local) = &dig.local_addr {
            client.set_local_addr(local)?;
        }
        if let Some(subnet) = &dig.client_subnet {
            client.set_client_subnet(subnet)?;
        }
        if let Some(server) = &dig.server {
            client.set_dns(server).await?;
        }
        if let Some(backup) = &dig.backup_server {
            client.set_backup_dns(backup).await?;
        }

        Ok(client)
    }

    pub fn with_exchanger(mut self, exchanger: Arc<dyn Exchanger>) -> Self {
        self.exchanger = exchanger;
        self
    }

    pub fn with_host_resolver(mut self, resolver: Arc<dyn HostResolver>) -> Self {
        self.host_resolver = resolver;
        self
    }

    pub fn with_selector(mut self, selector: Arc<dyn ServerSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops.max(1);
        self
    }

    pub fn settings(&self) -> &ExchangeSettings {
        &self.settings
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.settings.remote_addr
    }

    pub fn backup_remote_addr(&self) -> Option<SocketAddr> {
        self.settings.backup_remote_addr
    }

    /// Sets the resolver to query. Accepts `host`, `host:port`, `[v6]:port`
    /// or a bare IPv6 literal; the port defaults to 53.
    pub async fn set_dns(&mut self, host: &str) -> Result<(), DigError> {
        let addr = self.lookup_dns(host).await?;
        self.settings.remote_addr = Some(addr);
        Ok(())
    }

    /// With a backup set, every exchange races both resolvers and returns
    /// the first response.
    pub async fn set_backup_dns(&mut self, host: &str) -> Result<(), DigError> {
        let addr = self.lookup_dns(host).await?;
        self.settings.backup_remote_addr = Some(addr);
        Ok(())
    }

    pub fn clear_backup_dns(&mut self) {
        self.settings.backup_remote_addr = None;
    }

    /// Adds an EDNS client-subnet option (IPv4, /32) to every outbound query.
    pub fn set_client_subnet(&mut self, client_ip: &str) -> Result<(), DigError> {
        self.settings.client_subnet = Some(client_ip.parse::<ClientSubnet>()?);
        Ok(())
    }

    pub fn clear_client_subnet(&mut self) {
        self.settings.client_subnet = None;
    }

    /// Egress address for multi-homed hosts; the port is picked by the OS.
    pub fn set_local_addr(&mut self, local: &str) -> Result<(), DigError> {
        let ip = local
            .parse::<IpAddr>()
            .map_err(|_| DigError::InvalidLocalAddress(local.to_string()))?;
        self.settings.local_addr = Some(ip);
        Ok(())
    }

    pub fn set_protocol(&mut self, protocol: Protocol) {
        self.settings.protocol = protocol;
    }

    pub fn set_retry(&mut self, retry: usize) {
        self.settings.retry = retry;
    }

    /// Sets dial, read and write timeouts at once.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.set_dial_timeout(timeout);
        self.set_read_timeout(timeout);
        self.set_write_timeout(timeout);
    }

    pub fn set_dial_timeout(&mut self, timeout: Duration) {
        self.settings.dial_timeout = Some(timeout);
    }

    pub fn set_read_timeout(&mut self, timeout: Duration) {
        self.settings.read_timeout = Some(timeout);
    }

    pub fn set_write_timeout(&mut self, timeout: Duration) {
        self.settings.write_timeout = Some(timeout);
    }

    /// Sends `query` and returns the matching response.
    ///
    /// With a backup resolver configured both resolvers are raced, one
    /// attempt each; otherwise the primary is tried up to `retry` times.
    pub async fn exchange(&self, query: &Message) -> Result<Message, DigError> {
        match self.settings.use_backup() {
            Some(backup) => {
                race_exchange(
                    Arc::clone(&self.exchanger),
                    self.settings.without_backup(),
                    backup,
                    query,
                )
                .await
            }
            None => exchange_with_retry(self.exchanger.as_ref(), &self.settings, query).await,
        }
    }

    /// Builds a query for `domain` and returns the full response.
    pub async fn get_msg(&self, record_type: RecordType, domain: &str) -> Result<Message, DigError> {
        let query = MessageBuilder::new_query(&record_type, domain)?;
        self.exchange(&query).await
    }

    pub(crate) async fn exchange_with(
        &self,
        settings: &ExchangeSettings,
        query: &Message,
    ) -> Result<Message, DigError> {
        exchange_with_retry(self.exchanger.as_ref(), settings, query).await
    }

    pub(crate) async fn lookup_dns(&self, host: &str) -> Result<SocketAddr, DigError> {
        let endpoint = ResolverEndpoint::parse(host)?;
        let addr = self
            .host_resolver
            .resolve(&endpoint, self.settings.dial_timeout())
            .await?;
        debug!(host, resolved = %addr, "Resolver address set");
        Ok(addr)
    }
}
