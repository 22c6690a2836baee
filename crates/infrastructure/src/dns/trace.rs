//! Iterative resolution from a root server down the NS referral chain,
//! like `dig +trace`.

use crate::dns::dig::Dig;
use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use digtrace_domain::{DigError, RecordType};
use hickory_proto::op::Message;
use std::fmt;
use std::net::SocketAddr;
use tracing::{debug, info};

pub const ROOT_SERVERS: [&str; 13] = [
    "a.root-servers.net",
    "b.root-servers.net",
    "c.root-servers.net",
    "d.root-servers.net",
    "e.root-servers.net",
    "f.root-servers.net",
    "g.root-servers.net",
    "h.root-servers.net",
    "i.root-servers.net",
    "j.root-servers.net",
    "k.root-servers.net",
    "l.root-servers.net",
    "m.root-servers.net",
];

/// One hop of a trace.
#[derive(Debug, Clone)]
pub struct TraceResponse {
    /// Name of the server queried (root or NS target)
    pub server: String,
    /// Address actually contacted
    pub server_addr: SocketAddr,
    pub message: Message,
}

impl TraceResponse {
    pub fn authoritative(&self) -> bool {
        self.message.authoritative()
    }
}

/// A failed trace, with every hop completed before the failure.
#[derive(Debug, Clone)]
pub struct TraceFailure {
    pub hops: Vec<TraceResponse>,
    pub error: DigError,
}

impl fmt::Display for TraceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trace failed after {} hops: {}", self.hops.len(), self.error)
    }
}

impl std::error::Error for TraceFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<TraceFailure> for DigError {
    fn from(failure: TraceFailure) -> Self {
        failure.error
    }
}

impl Dig {
    /// `dig +trace` for an A record.
    pub async fn trace(&self, domain: &str) -> Result<Vec<TraceResponse>, TraceFailure> {
        self.trace_for_record(domain, RecordType::A).await
    }

    /// Walks from a random root server down the referral chain until a
    /// server answers authoritatively or refers nowhere.
    ///
    /// A referral with no NS records ends the trace successfully; callers
    /// inspect the last hop. Hops run on a copy of the configuration with
    /// the backup resolver removed, so `self` is left unchanged.
    pub async fn trace_for_record(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> Result<Vec<TraceResponse>, TraceFailure> {
        let roots: Vec<String> = ROOT_SERVERS.iter().map(|s| s.to_string()).collect();
        let mut hop_settings = self.settings().without_backup();
        let mut hops: Vec<TraceResponse> = Vec::new();

        let Some(mut server) = self.selector.pick(&roots) else {
            return Err(TraceFailure {
                hops,
                error: DigError::EmptyTrace,
            });
        };

        loop {
            if hops.len() >= self.max_hops {
                return Err(TraceFailure {
                    hops,
                    error: DigError::ReferralLoop(self.max_hops),
                });
            }

            let server_addr = match self.lookup_dns(&server).await {
                Ok(addr) => addr,
                Err(e) => return Err(hop_failure(hops, &server, e)),
            };
            hop_settings.remote_addr = Some(server_addr);

            let query = match MessageBuilder::new_query(&record_type, domain) {
                Ok(q) => q,
                Err(e) => return Err(TraceFailure { hops, error: e }),
            };

            let message = match self.exchange_with(&hop_settings, &query).await {
                Ok(m) => m,
                Err(e) => return Err(hop_failure(hops, &server, e)),
            };

            let authoritative = message.authoritative();
            let referrals = if authoritative {
                Vec::new()
            } else {
                ResponseParser::referral_servers(&message)
            };

            debug!(
                hop = hops.len() + 1,
                server = %server,
                addr = %server_addr,
                authoritative,
                referrals = referrals.len(),
                "Trace hop"
            );

            hops.push(TraceResponse {
                server: server.clone(),
                server_addr,
                message,
            });

            if authoritative {
                info!(domain, hops = hops.len(), "Trace reached authoritative server");
                return Ok(hops);
            }

            match self.selector.pick(&referrals) {
                Some(next) => server = next,
                None => {
                    info!(domain, hops = hops.len(), server = %server, "Trace ended without referral");
                    return Ok(hops);
                }
            }
        }
    }
}

fn hop_failure(hops: Vec<TraceResponse>, server: &str, error: DigError) -> TraceFailure {
    TraceFailure {
        hops,
        error: DigError::TraceHop {
            server: server.to_string(),
            reason: Box::new(error),
        },
    }
}
