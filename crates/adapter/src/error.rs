//! Error types for the MCP adapter.

use thiserror::Error;
use warpmetrics_openapi_tools::error::OpenApiToolsError;

/// Main error type for the adapter.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Configuration errors (bad flags, invalid patterns)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WARPMETRICS_API_KEY environment variable is required")]
    MissingApiKey,

    /// Catalog build failures (spec unreachable, malformed, hash mismatch)
    #[error(transparent)]
    OpenApi(#[from] OpenApiToolsError),

    /// MCP transport failures
    #[error("MCP server error: {0}")]
    Serve(String),
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
