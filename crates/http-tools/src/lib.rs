//! Shared HTTP runtime for Warpmetrics MCP tools.
//!
//! This crate is used by:
//! - `warpmetrics-openapi-tools` (dispatching spec-derived tools)
//! - `warpmetrics-mcp` (the stdio host)
//!
//! It intentionally knows nothing about `OpenAPI`; callers hand it a path template plus the
//! parameters to bind.

pub mod config;
pub mod render;
pub mod runtime;
pub mod semantics;
mod value;
