#![allow(dead_code)]
use super::builders::MessageFixtures;
use async_trait::async_trait;
use digtrace_domain::{DigError, ResolverEndpoint};
use digtrace_infrastructure::dns::{ExchangeSettings, Exchanger, HostResolver, ServerSelector};
use hickory_proto::op::Message;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What a scripted server does with every query it receives.
#[derive(Debug, Clone)]
pub enum Step {
    /// Non-authoritative referral to the given NS names
    Referral(Vec<String>),
    /// Authoritative A answer
    Authoritative(Ipv4Addr),
    /// Non-authoritative, no referral
    DeadEnd,
    Fail(DigError),
    Delay(Duration, Box<Step>),
}

impl Step {
    pub fn referral(servers: &[&str]) -> Self {
        Step::Referral(servers.iter().map(|s| s.to_string()).collect())
    }

    pub fn delayed(delay: Duration, step: Step) -> Self {
        Step::Delay(delay, Box::new(step))
    }
}

/// Exchanger that answers from a per-address script, without sockets.
#[derive(Default)]
pub struct ScriptedExchanger {
    steps: HashMap<SocketAddr, Step>,
    calls: Mutex<Vec<SocketAddr>>,
    queries: Mutex<Vec<Message>>,
}

impl ScriptedExchanger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, addr: SocketAddr, step: Step) -> Self {
        self.steps.insert(addr, step);
        self
    }

    /// Remote addresses contacted, in call order.
    pub fn calls(&self) -> Vec<SocketAddr> {
        self.calls.lock().unwrap().clone()
    }

    /// Queries received, in call order.
    pub fn queries(&self) -> Vec<Message> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Exchanger for ScriptedExchanger {
    async fn exchange_once(
        &self,
        settings: &ExchangeSettings,
        query: &Message,
    ) -> Result<Message, DigError> {
        let remote = settings.remote_addr()?;
        self.calls.lock().unwrap().push(remote);
        self.queries.lock().unwrap().push(query.clone());

        let mut step = self.steps.get(&remote).cloned().unwrap_or_else(|| {
            Step::Fail(DigError::Dial {
                server: remote.to_string(),
                reason: "unscripted server".to_string(),
            })
        });

        loop {
            match step {
                Step::Delay(delay, next) => {
                    tokio::time::sleep(delay).await;
                    step = *next;
                }
                Step::Referral(servers) => {
                    let names: Vec<&str> = servers.iter().map(String::as_str).collect();
                    return Ok(MessageFixtures::referral(query, "example.com.", &names));
                }
                Step::Authoritative(ip) => return Ok(MessageFixtures::authoritative(query, ip)),
                Step::DeadEnd => return Ok(MessageFixtures::dead_end(query)),
                Step::Fail(err) => return Err(err),
            }
        }
    }
}

/// Fails the first `failures` attempts with a read timeout, then answers.
pub struct FlakyExchanger {
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyExchanger {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Exchanger for FlakyExchanger {
    async fn exchange_once(
        &self,
        settings: &ExchangeSettings,
        query: &Message,
    ) -> Result<Message, DigError> {
        let remote = settings.remote_addr()?;
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            return Err(DigError::ReadTimeout {
                server: format!("{remote}#{attempt}"),
            });
        }
        Ok(MessageFixtures::authoritative(query, Ipv4Addr::new(192, 0, 2, 1)))
    }
}

/// Resolves names from a fixed table; IP literals pass through.
#[derive(Default)]
pub struct StaticHostResolver {
    hosts: HashMap<String, SocketAddr>,
}

impl StaticHostResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, addr: SocketAddr) -> Self {
        self.hosts.insert(normalize(name), addr);
        self
    }
}

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

#[async_trait]
impl HostResolver for StaticHostResolver {
    async fn resolve(
        &self,
        endpoint: &ResolverEndpoint,
        _timeout: Duration,
    ) -> Result<SocketAddr, DigError> {
        if let Some(addr) = endpoint.literal_addr() {
            return Ok(addr);
        }
        self.hosts
            .get(&normalize(endpoint.host()))
            .copied()
            .ok_or_else(|| DigError::NoSuchHost(endpoint.host().to_string()))
    }
}

/// Always takes the first candidate.
pub struct FirstSelector;

impl ServerSelector for FirstSelector {
    fn pick(&self, candidates: &[String]) -> Option<String> {
        candidates.first().cloned()
    }
}
