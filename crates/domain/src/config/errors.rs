/// Failures while loading, checking or saving a digtrace configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read configuration {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Cannot write configuration {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Invalid TOML in {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Cannot serialize configuration: {0}")]
    Serialize(String),

    /// A setting that parsed but cannot be used, keyed by its `section.key` name
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
