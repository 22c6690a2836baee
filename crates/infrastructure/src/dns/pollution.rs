//! Pollution heuristic: a trace whose last hop is not authoritative is
//! taken as a sign of interception along the path.
//!
//! A broken delegation looks exactly the same, so this is a hint, not proof.

use crate::dns::dig::Dig;
use crate::dns::trace::TraceResponse;
use digtrace_domain::DigError;
use tracing::info;

#[derive(Debug, Clone)]
pub struct PollutionReport {
    pub domain: String,
    pub polluted: bool,
    pub hops: Vec<TraceResponse>,
}

impl Dig {
    /// Traces `domain` (A record) and classifies the last hop.
    pub async fn check_pollution(&self, domain: &str) -> Result<PollutionReport, DigError> {
        let hops = self.trace(domain).await?;

        let last = hops.last().ok_or(DigError::EmptyTrace)?;
        let polluted = !last.authoritative();

        info!(domain, polluted, hops = hops.len(), last_server = %last.server, "Pollution check");

        Ok(PollutionReport {
            domain: domain.to_string(),
            polluted,
            hops,
        })
    }

    pub async fn is_polluted(&self, domain: &str) -> Result<bool, DigError> {
        Ok(self.check_pollution(domain).await?.polluted)
    }
}

/// Checks `domain` with a default client (system resolver, UDP, 3s timeouts).
pub async fn is_polluted(domain: &str) -> Result<bool, DigError> {
    Dig::new().is_polluted(domain).await
}
