//! A lenient view over an `OpenAPI` interface description.
//!
//! The document is kept as a raw JSON tree (key order preserved) and only the parts the
//! translator needs are deserialized, one operation at a time. A single malformed operation
//! therefore costs one tool, not the whole catalog. Both 3.0 and 3.1 documents are accepted.

use crate::error::{OpenApiToolsError, Result};
use crate::resolver::LocalResolver;
use serde::Deserialize;
use serde_json::{Map, Value};

/// The verbs a path item may carry, in the order they are visited.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Parsed interface description. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct InterfaceDescription {
    root: Value,
}

impl InterfaceDescription {
    /// Wrap a parsed document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not an object or `paths` is present but not an
    /// object.
    pub fn from_value(root: Value) -> Result<Self> {
        if !root.is_object() {
            return Err(OpenApiToolsError::SpecParse {
                location: "document".to_string(),
                message: "expected an object at the document root".to_string(),
            });
        }
        match root.get("paths") {
            None | Some(Value::Object(_)) => Ok(Self { root }),
            Some(_) => Err(OpenApiToolsError::SpecParse {
                location: "paths".to_string(),
                message: "expected an object".to_string(),
            }),
        }
    }

    #[must_use]
    pub fn resolver(&self) -> LocalResolver<'_> {
        LocalResolver::new(&self.root)
    }

    /// Path items in document order. Items that are not objects are skipped.
    pub fn path_items(&self) -> impl Iterator<Item = (&str, &Map<String, Value>)> {
        self.root
            .get("paths")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|paths| paths.iter())
            .filter_map(|(path, item)| item.as_object().map(|item| (path.as_str(), item)))
    }

    /// Raw path-level parameter entries for `path` (each may be a `$ref`).
    #[must_use]
    pub fn path_parameters(&self, path: &str) -> &[Value] {
        self.root
            .get("paths")
            .and_then(|paths| paths.get(path))
            .and_then(|item| item.get("parameters"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every `(path, method, raw operation)` triple in document order.
    ///
    /// Methods are yielded in the order their keys appear in the path item.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.path_items().flat_map(|(path, item)| {
            item.iter()
                .filter(|(method, _)| HTTP_METHODS.contains(&method.as_str()))
                .map(move |(method, op)| (path, method.as_str(), op))
        })
    }
}

/// The fields of an operation the translator reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Raw entries; each may be a `$ref`.
    #[serde(default)]
    pub parameters: Vec<Value>,
}

impl Operation {
    /// # Errors
    ///
    /// Returns an error if the value does not have the shape of an operation object.
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| OpenApiToolsError::SpecParse {
            location: "operation".to_string(),
            message: e.to_string(),
        })
    }

    /// First tag, used to group tools in listings.
    #[must_use]
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }
}

/// A declared parameter after `$ref` resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Option<Value>,
}

impl Parameter {
    /// # Errors
    ///
    /// Returns an error if the value lacks `name` or `in`.
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| OpenApiToolsError::SpecParse {
            location: "parameter".to_string(),
            message: e.to_string(),
        })
    }
}

/// The parameter-schema keywords copied into tool input schemas.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterSchema {
    /// Either a type name or (3.1) a list of them; copied verbatim.
    #[serde(rename = "type", default)]
    pub ty: Option<Value>,
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Value>,
    #[serde(default)]
    pub default: Option<Value>,
}

impl ParameterSchema {
    /// # Errors
    ///
    /// Returns an error if the value is not a schema object.
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| OpenApiToolsError::SpecParse {
            location: "schema".to_string(),
            message: e.to_string(),
        })
    }
}
