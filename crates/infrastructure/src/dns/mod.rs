pub mod dig;
pub mod exchange;
pub mod forwarding;
pub mod pollution;
pub mod race;
pub mod records;
pub mod selector;
pub mod trace;
pub mod transport;

pub use dig::Dig;
pub use exchange::{ExchangeSettings, Exchanger, NetworkExchanger};
pub use pollution::{is_polluted, PollutionReport};
pub use selector::{RandomSelector, ServerSelector};
pub use trace::{TraceFailure, TraceResponse, ROOT_SERVERS};
pub use transport::{HostResolver, SystemHostResolver};
