//! digtrace resolver engine: transports, exchange, primary/backup racing,
//! iterative tracing and the pollution heuristic, on top of `hickory-proto`.
pub mod dns;

pub use dns::{Dig, TraceFailure, TraceResponse};
