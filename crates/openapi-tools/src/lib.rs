//! `OpenAPI` -> MCP tooling for the Warpmetrics API.
//!
//! The interface description is loaded once, translated into an immutable [`translate::Catalog`]
//! of read-only tools, and served through [`runtime::OpenApiToolSource`]. Only `GET` operations
//! with an `operationId` ever become tools.

pub mod config;
pub mod document;
pub mod error;
pub mod loader;
pub mod resolver;
pub mod runtime;
pub mod translate;
