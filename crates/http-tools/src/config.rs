use serde::{Deserialize, Serialize};
use std::fmt;

/// Default Warpmetrics API origin.
pub const DEFAULT_API_URL: &str = "https://api.warpmetrics.com";

/// Connection settings for the remote API.
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// API origin; request paths are appended to it verbatim.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Credential sent as `Authorization: Bearer <api_key>`.
    pub api_key: String,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

// Never print the credential.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

/// Where a tool argument is placed in the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpParamLocation {
    Path,
    Query,
    Header,
    /// Advertised to callers but never sent.
    Cookie,
}

impl HttpParamLocation {
    /// Parse an `OpenAPI` `in` value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }
}

/// A named request parameter bound from the tool arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpParam {
    pub name: String,
    #[serde(rename = "in")]
    pub location: HttpParamLocation,
}

/// Everything needed to turn a tool call into a request: the path template (e.g.
/// `/v1/items/{id}`) and the parameters in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CallMetadata {
    pub path: String,
    pub parameters: Vec<HttpParam>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let cfg = ApiConfig::new("https://example.com", "wm_live_secret");
        let dbg = format!("{cfg:?}");
        assert!(dbg.contains("https://example.com"));
        assert!(!dbg.contains("wm_live_secret"));
    }

    #[test]
    fn base_url_defaults_when_missing() {
        let cfg: ApiConfig = serde_json::from_str(r#"{"apiKey":"k"}"#).unwrap();
        assert_eq!(cfg.base_url, DEFAULT_API_URL);
        assert_eq!(cfg.api_key, "k");
    }

    #[test]
    fn param_location_parses_openapi_values() {
        assert_eq!(HttpParamLocation::parse("path"), Some(HttpParamLocation::Path));
        assert_eq!(HttpParamLocation::parse("query"), Some(HttpParamLocation::Query));
        assert_eq!(HttpParamLocation::parse("body"), None);
    }
}
