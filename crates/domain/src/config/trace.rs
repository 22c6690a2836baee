use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_HOPS: usize = 32;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TraceConfig {
    /// Referral hops allowed before a trace is abandoned as a loop.
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
        }
    }
}

fn default_max_hops() -> usize {
    DEFAULT_MAX_HOPS
}
