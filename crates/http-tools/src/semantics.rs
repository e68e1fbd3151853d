//! MCP tool annotations for API-backed tools.
//!
//! Only `GET` operations are ever exposed, so every tool carries the same RFC 9110 safe-method
//! hints. `openWorldHint` is always `true`: the tools talk to an external system.

use rmcp::model::ToolAnnotations;

/// Annotations for a read-only, idempotent tool, optionally titled.
#[must_use]
pub fn read_only_annotations(title: Option<String>) -> ToolAnnotations {
    ToolAnnotations {
        title,
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(true),
    }
}
