pub mod dig;
pub mod errors;
pub mod logging;
pub mod root;
pub mod trace;

pub use dig::DigConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use trace::TraceConfig;
