//! `OpenAPI` -> MCP tool translation.
//!
//! Every `GET` operation with an `operationId` becomes one tool whose input schema has one
//! property per declared parameter. Other verbs are never exposed. The result is an immutable
//! [`Catalog`] pairing the advertised tools with the metadata needed to call them.

use crate::document::{InterfaceDescription, Operation, Parameter, ParameterSchema};
use crate::resolver::LocalResolver;
use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use warpmetrics_http_tools::config::{CallMetadata, HttpParam, HttpParamLocation};
use warpmetrics_http_tools::semantics::read_only_annotations;

const EXPOSED_METHOD: &str = "get";

/// One advertised tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: JsonObject,
    /// The operation summary, shown in listings.
    pub summary: Option<String>,
    /// First operation tag, used to group listings.
    pub tag: Option<String>,
}

impl ToolDescriptor {
    /// The MCP tool definition, annotated read-only.
    #[must_use]
    pub fn to_tool(&self) -> Tool {
        let mut tool = Tool::new(
            self.name.clone(),
            self.description.clone(),
            Arc::new(self.input_schema.clone()),
        );
        tool.annotations = Some(read_only_annotations(self.summary.clone()));
        tool
    }
}

/// Tools in document order plus the call metadata for each tool name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tools: Vec<ToolDescriptor>,
    calls: HashMap<String, CallMetadata>,
}

impl Catalog {
    #[must_use]
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    #[must_use]
    pub fn call(&self, name: &str) -> Option<&CallMetadata> {
        self.calls.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool definitions ready for `tools/list`.
    #[must_use]
    pub fn to_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDescriptor::to_tool).collect()
    }
}

#[derive(Default)]
struct CatalogBuilder {
    tools: Vec<ToolDescriptor>,
    calls: HashMap<String, CallMetadata>,
    names: HashSet<String>,
}

impl CatalogBuilder {
    fn push(&mut self, operation_id: &str, descriptor: ToolDescriptor, call: CallMetadata) {
        let name = reserve_unique_tool_name(&mut self.names, operation_id);
        if name != operation_id {
            tracing::warn!("Duplicate operationId '{operation_id}', exposing it as '{name}'");
        }
        self.calls.insert(name.clone(), call);
        self.tools.push(ToolDescriptor { name, ..descriptor });
    }

    fn build(self) -> Catalog {
        Catalog {
            tools: self.tools,
            calls: self.calls,
        }
    }
}

/// Build the tool catalog for `doc`.
///
/// Never fails: operations and parameters that cannot be understood are skipped with a
/// warning so the rest of the API stays usable.
#[must_use]
pub fn translate(doc: &InterfaceDescription) -> Catalog {
    let resolver = doc.resolver();
    let mut builder = CatalogBuilder::default();

    for (path, method, raw) in doc.operations() {
        if method != EXPOSED_METHOD {
            tracing::debug!(
                "Skipping {} {path}: only GET operations are exposed",
                method.to_uppercase()
            );
            continue;
        }

        let op = match resolver.resolve(raw).and_then(Operation::from_value) {
            Ok(op) => op,
            Err(e) => {
                tracing::warn!("Skipping GET {path}: {e}");
                continue;
            }
        };

        let Some(operation_id) = op.operation_id.as_deref().filter(|id| !id.is_empty()) else {
            tracing::debug!("Skipping GET {path}: no operationId");
            continue;
        };

        let params = merge_parameters(
            &resolver,
            path,
            doc.path_parameters(path),
            &op.parameters,
        );
        let (input_schema, bindings) = build_input(&resolver, path, &params);

        let descriptor = ToolDescriptor {
            name: operation_id.to_string(),
            description: describe(&op),
            input_schema,
            summary: op.summary.clone(),
            tag: op.primary_tag().map(str::to_string),
        };
        let call = CallMetadata {
            path: path.to_string(),
            parameters: bindings,
        };
        builder.push(operation_id, descriptor, call);
    }

    builder.build()
}

/// `"{summary}. {description}"`, trimmed. Without a summary the description stands alone.
fn describe(op: &Operation) -> String {
    match (op.summary.as_deref(), op.description.as_deref()) {
        (Some(summary), description) => format!("{summary}. {}", description.unwrap_or_default())
            .trim()
            .to_string(),
        (None, Some(description)) => description.trim().to_string(),
        (None, None) => String::new(),
    }
}

/// Path-item parameters overridden by operation parameters with the same `(in, name)`.
fn merge_parameters(
    resolver: &LocalResolver<'_>,
    path: &str,
    path_item_params: &[Value],
    operation_params: &[Value],
) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for raw in path_item_params.iter().chain(operation_params) {
        let param = match resolver.resolve(raw).and_then(Parameter::from_value) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Skipping parameter of GET {path}: {e}");
                continue;
            }
        };
        let key = (param.location.clone(), param.name.clone());
        if let Some(&i) = index.get(&key) {
            merged[i] = param;
        } else {
            index.insert(key, merged.len());
            merged.push(param);
        }
    }

    merged
}

fn build_input(
    resolver: &LocalResolver<'_>,
    path: &str,
    params: &[Parameter],
) -> (JsonObject, Vec<HttpParam>) {
    let mut properties = JsonObject::new();
    let mut required: Vec<Value> = Vec::new();
    let mut bindings = Vec::with_capacity(params.len());

    for param in params {
        let Some(location) = HttpParamLocation::parse(&param.location) else {
            tracing::warn!(
                "Skipping parameter '{}' of GET {path}: unsupported location '{}'",
                param.name,
                param.location
            );
            continue;
        };

        let schema = match param.schema.as_ref() {
            None => ParameterSchema::default(),
            Some(raw) => match resolver.resolve(raw).and_then(ParameterSchema::from_value) {
                Ok(schema) => schema,
                Err(e) => {
                    tracing::warn!("Skipping parameter '{}' of GET {path}: {e}", param.name);
                    continue;
                }
            },
        };

        properties.insert(
            param.name.clone(),
            Value::Object(property_schema(param, schema)),
        );
        if param.required && !required.iter().any(|r| r == param.name.as_str()) {
            required.push(Value::String(param.name.clone()));
        }
        bindings.push(HttpParam {
            name: param.name.clone(),
            location,
        });
    }

    let mut input = JsonObject::new();
    input.insert("type".to_string(), json!("object"));
    input.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        input.insert("required".to_string(), Value::Array(required));
    }
    (input, bindings)
}

/// `{type, description?, enum?, default?}`; `type` falls back to `"string"`.
fn property_schema(param: &Parameter, schema: ParameterSchema) -> JsonObject {
    let mut prop = JsonObject::new();
    let ty = schema
        .ty
        .filter(|t| !matches!(t, Value::String(s) if s.is_empty()))
        .unwrap_or_else(|| json!("string"));
    prop.insert("type".to_string(), ty);
    if let Some(description) = &param.description {
        prop.insert(
            "description".to_string(),
            Value::String(description.clone()),
        );
    }
    if let Some(values) = schema.enum_values {
        prop.insert("enum".to_string(), values);
    }
    if let Some(default) = schema.default {
        prop.insert("default".to_string(), default);
    }
    prop
}

fn reserve_unique_tool_name(tool_names: &mut HashSet<String>, base: &str) -> String {
    let base = base.to_string();
    if tool_names.insert(base.clone()) {
        return base;
    }

    let mut counter = 1;
    loop {
        let candidate = format!("{base}_{counter}");
        if tool_names.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}
