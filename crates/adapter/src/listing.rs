//! `--list-tools` output.

use crate::cli::DOCS_URL;
use std::fmt::Write as _;
use warpmetrics_openapi_tools::translate::{Catalog, ToolDescriptor};

const UNTAGGED: &str = "Other";
const RULE_WIDTH: usize = 40;

/// Tools grouped by first tag, groups in first-seen order.
#[must_use]
pub fn render_listing(catalog: &Catalog) -> String {
    let mut groups: Vec<(&str, Vec<&ToolDescriptor>)> = Vec::new();
    for tool in catalog.tools() {
        let tag = tool.tag.as_deref().unwrap_or(UNTAGGED);
        match groups.iter_mut().find(|(name, _)| *name == tag) {
            Some((_, tools)) => tools.push(tool),
            None => groups.push((tag, vec![tool])),
        }
    }

    let mut out = String::from("\nWarpmetrics MCP Tools\n\n");
    for (tag, tools) in groups {
        let _ = writeln!(out, "{tag}");
        let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH));
        for tool in tools {
            let _ = writeln!(out, "  {}", tool.name);
            if let Some(summary) = &tool.summary {
                let _ = writeln!(out, "    {summary}");
            }
        }
        out.push('\n');
    }
    let _ = writeln!(out, "Full documentation: {DOCS_URL}");
    out
}
