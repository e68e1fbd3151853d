//! Response rendering: API envelope → indented, human-readable text.
//!
//! Rendering is schema-agnostic and total. Unknown shapes degrade to their literal values.
//!
//! - `data` missing or `null` renders as [`NO_DATA`].
//! - Arrays render as bullet lists, one line per item. Object items collapse to a one-line
//!   `• <id> — k: v | k: v` summary that only keeps scalar fields.
//! - Objects render as `key: value` lines, recursing into nested arrays/objects one indent deeper.
//! - Numbers are formatted by field name through an ordered rule table (see [`Renderer::new`]).

use crate::value::{format_number, group_thousands, is_truthy, to_display_string, to_fixed};
use regex::Regex;
use serde_json::{Map, Value};

/// Keys that are never rendered by default.
pub const DEFAULT_SKIP_PATTERN: &str = "^(projectId)$";
pub const NO_DATA: &str = "No data.";
pub const NO_RESULTS: &str = "No results.";

const ID_KEY: &str = "id";
const INDENT: &str = "  ";
const BULLET: &str = "\u{2022}";
const DASH: &str = "\u{2014}";
/// Numbers above this (with no matching rule) get thousands separators.
const GROUPING_THRESHOLD: f64 = 9999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberStyle {
    /// `$2.5000`
    Currency,
    /// `124ms`
    Millis,
    /// `12.5%`
    Percent,
}

impl NumberStyle {
    fn apply(self, n: &serde_json::Number, f: f64) -> String {
        match self {
            Self::Currency => format!("${}", to_fixed(f, 4)),
            Self::Millis => format!("{}ms", to_fixed(f, 0)),
            Self::Percent => format!("{}%", format_number(n)),
        }
    }
}

#[derive(Debug, Clone)]
struct FieldRule {
    pattern: Regex,
    style: NumberStyle,
}

/// Structural view of a JSON value.
enum Node<'a> {
    Null,
    Scalar(&'a Value),
    Sequence(&'a [Value]),
    Mapping(&'a Map<String, Value>),
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Array(items) => Node::Sequence(items),
            Value::Object(map) => Node::Mapping(map),
            scalar => Node::Scalar(scalar),
        }
    }
}

/// Renders API envelopes as text.
///
/// Immutable after construction and safe to share across calls.
#[derive(Debug, Clone)]
pub struct Renderer {
    skip: Regex,
    rules: Vec<FieldRule>,
}

impl Renderer {
    /// Build a renderer that omits keys matching `skip_pattern`.
    ///
    /// Number formatting rules, first match wins (field names matched case-insensitively):
    ///
    /// | pattern               | example    |
    /// |-----------------------|------------|
    /// | `cost\|price\|amount` | `$2.5000`  |
    /// | `latency\|duration`   | `124ms`    |
    /// | `rate`                | `12.5%`    |
    ///
    /// # Errors
    ///
    /// Returns an error if `skip_pattern` is not a valid regular expression.
    pub fn new(skip_pattern: &str) -> Result<Self, regex::Error> {
        let rules = [
            ("(?i)cost|price|amount", NumberStyle::Currency),
            ("(?i)latency|duration", NumberStyle::Millis),
            ("(?i)rate", NumberStyle::Percent),
        ]
        .into_iter()
        .map(|(pattern, style)| {
            Ok(FieldRule {
                pattern: Regex::new(pattern)?,
                style,
            })
        })
        .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            skip: Regex::new(skip_pattern)?,
            rules,
        })
    }

    /// Render the `data` member of an API envelope.
    #[must_use]
    pub fn render(&self, envelope: &Value) -> String {
        let data = envelope.get("data").unwrap_or(&Value::Null);
        match Node::from(data) {
            Node::Null => NO_DATA.to_string(),
            Node::Sequence(items) => self.list_lines(items).join("\n"),
            Node::Mapping(map) => {
                let mut lines = Vec::new();
                self.mapping_lines(map, 0, &mut lines);
                lines.join("\n")
            }
            Node::Scalar(v) => to_display_string(v),
        }
    }

    fn list_lines(&self, items: &[Value]) -> Vec<String> {
        if items.is_empty() {
            return vec![NO_RESULTS.to_string()];
        }
        items.iter().map(|item| self.item_line(item)).collect()
    }

    fn item_line(&self, item: &Value) -> String {
        match Node::from(item) {
            Node::Mapping(map) => self.summary_line(map),
            Node::Sequence(_) => format!("{BULLET} {item}"),
            Node::Null | Node::Scalar(_) => format!("{BULLET} {}", to_display_string(item)),
        }
    }

    // Nested arrays/objects are dropped here: summaries stay one level deep.
    fn summary_line(&self, map: &Map<String, Value>) -> String {
        let headline = map
            .get(ID_KEY)
            .filter(|id| is_truthy(id))
            .map(to_display_string);

        let detail = map
            .iter()
            .filter(|(key, _)| key.as_str() != ID_KEY && !self.skip.is_match(key))
            .filter_map(|(key, value)| match Node::from(value) {
                Node::Scalar(Value::String(s)) if s.is_empty() => None,
                Node::Scalar(v) => Some(format!("{key}: {}", self.format_field(key, v))),
                Node::Null | Node::Sequence(_) | Node::Mapping(_) => None,
            })
            .collect::<Vec<_>>()
            .join(" | ");

        match headline {
            Some(id) if detail.is_empty() => format!("{BULLET} {id}"),
            Some(id) => format!("{BULLET} {id} {DASH} {detail}"),
            None => format!("{BULLET} {detail}"),
        }
    }

    fn mapping_lines(&self, map: &Map<String, Value>, depth: usize, out: &mut Vec<String>) {
        let prefix = INDENT.repeat(depth);
        for (key, value) in map {
            if self.skip.is_match(key) {
                continue;
            }
            match Node::from(value) {
                Node::Null => {}
                Node::Sequence(items) => {
                    if items.is_empty() {
                        continue;
                    }
                    out.push(format!("{prefix}{key}:"));
                    for line in self.list_lines(items) {
                        out.push(format!("{prefix}{INDENT}{line}"));
                    }
                }
                Node::Mapping(nested) => {
                    out.push(format!("{prefix}{key}:"));
                    let before = out.len();
                    self.mapping_lines(nested, depth + 1, out);
                    // A nested object with nothing to show still closes its header line.
                    if out.len() == before {
                        out.push(String::new());
                    }
                }
                Node::Scalar(v) => {
                    out.push(format!("{prefix}{key}: {}", self.format_field(key, v)));
                }
            }
        }
    }

    fn format_field(&self, key: &str, value: &Value) -> String {
        let Value::Number(n) = value else {
            return to_display_string(value);
        };
        let Some(f) = n.as_f64() else {
            return format_number(n);
        };

        if let Some(rule) = self.rules.iter().find(|r| r.pattern.is_match(key)) {
            return rule.style.apply(n, f);
        }
        if f > GROUPING_THRESHOLD {
            return group_thousands(f);
        }
        format_number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer() -> Renderer {
        Renderer::new(DEFAULT_SKIP_PATTERN).unwrap()
    }

    #[test]
    fn missing_or_null_data_renders_sentinel() {
        let r = renderer();
        assert_eq!(r.render(&json!({ "success": true })), "No data.");
        assert_eq!(r.render(&json!({ "success": true, "data": null })), "No data.");
    }

    #[test]
    fn list_item_with_id_and_cost() {
        let out = renderer().render(&json!({
            "success": true,
            "data": [{ "id": "x1", "cost": 2.5, "note": null }]
        }));
        assert_eq!(out, "\u{2022} x1 \u{2014} cost: $2.5000");
    }

    #[test]
    fn empty_list_renders_no_results() {
        assert_eq!(
            renderer().render(&json!({ "success": true, "data": [] })),
            "No results."
        );
    }

    #[test]
    fn primitive_list_items_are_bulleted() {
        let out = renderer().render(&json!({ "data": ["a", 2, true] }));
        assert_eq!(out, "\u{2022} a\n\u{2022} 2\n\u{2022} true");
    }

    #[test]
    fn summary_skips_nested_empty_and_skip_pattern_fields() {
        let out = renderer().render(&json!({
            "data": [{
                "id": "r1",
                "projectId": "p1",
                "model": "gpt-4o",
                "label": "",
                "tags": ["a"],
                "meta": { "k": 1 },
                "latencyMs": 123.6,
                "errorRate": 12.5
            }]
        }));
        assert_eq!(
            out,
            "\u{2022} r1 \u{2014} model: gpt-4o | latencyMs: 124ms | errorRate: 12.5%"
        );
    }

    #[test]
    fn summary_without_id_omits_headline() {
        let out = renderer().render(&json!({ "data": [{ "name": "a", "count": 3 }] }));
        assert_eq!(out, "\u{2022} name: a | count: 3");
    }

    #[test]
    fn falsy_id_is_not_used_as_headline() {
        let out = renderer().render(&json!({ "data": [{ "id": 0, "name": "zero" }] }));
        assert_eq!(out, "\u{2022} name: zero");
    }

    #[test]
    fn id_only_item_renders_bare_headline() {
        let out = renderer().render(&json!({ "data": [{ "id": "x1", "meta": {} }] }));
        assert_eq!(out, "\u{2022} x1");
    }

    #[test]
    fn object_renders_nested_structure_with_indentation() {
        let out = renderer().render(&json!({
            "success": true,
            "data": {
                "name": "My Project",
                "projectId": "p1",
                "archivedAt": null,
                "totalCost": 12.3456789,
                "requests": 1234567,
                "stats": {
                    "avgLatency": 250.4,
                    "successRate": 99.5,
                    "window": { "days": 7 }
                },
                "models": [
                    { "id": "gpt-4o", "calls": 10 },
                    { "id": "claude", "calls": 5 }
                ],
                "empty": []
            }
        }));

        let expected = [
            "name: My Project",
            "totalCost: $12.3457",
            "requests: 1,234,567",
            "stats:",
            "  avgLatency: 250ms",
            "  successRate: 99.5%",
            "  window:",
            "    days: 7",
            "models:",
            "  \u{2022} gpt-4o \u{2014} calls: 10",
            "  \u{2022} claude \u{2014} calls: 5",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn nested_list_inside_nested_object_indents_twice() {
        let out = renderer().render(&json!({
            "data": { "outer": { "items": ["a", "b"] } }
        }));
        assert_eq!(out, "outer:\n  items:\n    \u{2022} a\n    \u{2022} b");
    }

    #[test]
    fn large_numbers_without_rule_are_grouped() {
        let out = renderer().render(&json!({ "data": { "tokens": 12345, "small": 9999 } }));
        assert_eq!(out, "tokens: 12,345\nsmall: 9999");
    }

    #[test]
    fn rules_only_apply_to_numbers_and_match_case_insensitively() {
        let out = renderer().render(&json!({
            "data": { "COST": 1, "priceTier": "gold", "Duration": 0.4 }
        }));
        assert_eq!(out, "COST: $1.0000\npriceTier: gold\nDuration: 0ms");
    }

    #[test]
    fn currency_and_grouping_round_exact_ties_up() {
        let out = renderer().render(&json!({
            "success": true,
            "data": { "cost": 0.03125, "tokens": 10000.0625, "latencyMs": 12.5 }
        }));
        assert_eq!(out, "cost: $0.0313\ntokens: 10,000.063\nlatencyMs: 13ms");
    }

    #[test]
    fn empty_nested_object_leaves_a_blank_line() {
        let out = renderer().render(&json!({
            "success": true,
            "data": { "meta": {}, "hidden": { "projectId": "p1" }, "name": "run" }
        }));
        assert_eq!(out, "meta:\n\nhidden:\n\nname: run");
    }

    #[test]
    fn cost_rule_wins_over_grouping() {
        let out = renderer().render(&json!({ "data": { "amount": 50000 } }));
        assert_eq!(out, "amount: $50000.0000");
    }

    #[test]
    fn custom_skip_pattern_applies_at_every_level() {
        let r = Renderer::new("^(secret|internal.*)$").unwrap();
        let out = r.render(&json!({
            "data": {
                "name": "a",
                "secret": "s",
                "projectId": "kept",
                "nested": { "internalNote": "x", "ok": true }
            }
        }));
        assert_eq!(out, "name: a\nprojectId: kept\nnested:\n  ok: true");
    }

    #[test]
    fn invalid_skip_pattern_is_rejected() {
        assert!(Renderer::new("(").is_err());
    }

    #[test]
    fn rendering_is_deterministic() {
        let r = renderer();
        let envelope = json!({
            "data": { "b": 1, "a": [{ "id": "z", "cost": 0.1 }], "c": { "d": 100000.25 } }
        });
        assert_eq!(r.render(&envelope), r.render(&envelope));
    }

    #[test]
    fn key_order_follows_the_document() {
        let envelope: Value = serde_json::from_str(r#"{"data":{"zeta":1,"alpha":2}}"#).unwrap();
        assert_eq!(renderer().render(&envelope), "zeta: 1\nalpha: 2");
    }

    #[test]
    fn scalar_data_renders_literally() {
        assert_eq!(renderer().render(&json!({ "data": "ok" })), "ok");
    }
}
