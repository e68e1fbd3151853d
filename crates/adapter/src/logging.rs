use crate::cli::LogFormat;
use crate::error::{AdapterError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Output goes to stderr: stdout carries the MCP protocol.
///
/// # Errors
///
/// Returns an error if `filter` is not a valid `EnvFilter` directive or a subscriber is
/// already installed.
pub fn init(filter: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| AdapterError::Config(format!("invalid log filter '{filter}': {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| AdapterError::Config(format!("failed to install logger: {e}")))
}
