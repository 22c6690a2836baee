use anyhow::Context;
use digtrace_domain::{CliOverrides, Config};

/// Runs before logging is initialised, so failures are only reported
/// through the returned error chain.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    Config::load(path, overrides).context("Failed to load configuration")
}
