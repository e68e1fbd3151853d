//! Local `$ref` resolution.
//!
//! The Warpmetrics description is a single self-contained document, so only same-document
//! references (`#/components/...`) are followed. External references are reported as errors
//! and the caller decides whether to skip the affected item.

use crate::error::{OpenApiToolsError, Result};
use serde_json::Value;
use std::collections::HashSet;

/// Resolves `$ref` chains against one root document.
#[derive(Debug, Clone, Copy)]
pub struct LocalResolver<'a> {
    root: &'a Value,
}

impl<'a> LocalResolver<'a> {
    #[must_use]
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// Follow `node` through any chain of `$ref`s and return the first concrete value.
    ///
    /// Values that are not references are returned as-is.
    ///
    /// # Errors
    ///
    /// Returns an error for external or malformed references, dangling pointers, and cycles.
    pub fn resolve<'v>(&self, node: &'v Value) -> Result<&'v Value>
    where
        'a: 'v,
    {
        let mut seen: HashSet<&'v str> = HashSet::new();
        let mut cur = node;

        while let Some(reference) = reference_of(cur) {
            if !seen.insert(reference) {
                return Err(OpenApiToolsError::InvalidReference {
                    reference: reference.to_string(),
                    message: "cyclic reference".to_string(),
                });
            }
            let pointer = parse_ref(reference)?;
            cur = self
                .root
                .pointer(pointer)
                .ok_or_else(|| OpenApiToolsError::InvalidReference {
                    reference: reference.to_string(),
                    message: format!("missing pointer '{pointer}'"),
                })?;
        }

        Ok(cur)
    }
}

fn reference_of(value: &Value) -> Option<&str> {
    value.get("$ref").and_then(Value::as_str)
}

fn parse_ref(reference: &str) -> Result<&str> {
    let invalid = |message: &str| OpenApiToolsError::InvalidReference {
        reference: reference.to_string(),
        message: message.to_string(),
    };
    let Some(fragment) = reference.strip_prefix('#') else {
        return Err(invalid("only local references are supported"));
    };
    if fragment.is_empty() || fragment.starts_with('/') {
        Ok(fragment)
    } else {
        Err(invalid("expected a JSON pointer starting with '/'"))
    }
}
