//! Error types for `warpmetrics-openapi-tools`.

use thiserror::Error;
use warpmetrics_http_tools::runtime::ExecutionError;

/// Main error type for `OpenAPI` tooling.
#[derive(Error, Debug)]
pub enum OpenApiToolsError {
    /// Configuration errors (invalid spec location, bad hash format).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The spec endpoint answered with a non-success status.
    #[error("Failed to fetch spec: {status}")]
    SpecStatus { status: u16 },

    #[error("Failed to fetch spec from '{url}': {message}")]
    SpecFetch { url: String, message: String },

    #[error("Failed to read spec file '{path}': {source}")]
    SpecReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse spec from '{location}': {message}")]
    SpecParse { location: String, message: String },

    #[error("Spec hash mismatch. Expected: {expected}, Got: {actual}")]
    SpecHashMismatch { expected: String, actual: String },

    /// A `$ref` that cannot be followed inside the document.
    #[error("Invalid $ref '{reference}': {message}")]
    InvalidReference { reference: String, message: String },

    #[error("Unknown tool \"{0}\"")]
    UnknownTool(String),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Result type alias for `OpenAPI` tooling operations.
pub type Result<T> = std::result::Result<T, OpenApiToolsError>;
