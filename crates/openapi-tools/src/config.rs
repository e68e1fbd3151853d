use serde::{Deserialize, Serialize};

/// Where the interface description lives, relative to the API base URL.
pub const DEFAULT_SPEC_PATH: &str = "/v1/docs/openapi.json";

/// Where to load the interface description from and how to pin it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpecConfig {
    /// `OpenAPI` spec location (URL or file path).
    pub spec: String,

    /// Optional `sha256:<hex>` digest of the raw document.
    #[serde(default)]
    pub spec_hash: Option<String>,

    /// Hash policy: warn, fail, or ignore.
    #[serde(default)]
    pub spec_hash_policy: HashPolicy,
}

impl SpecConfig {
    /// Spec served by the API itself at `<base_url>/v1/docs/openapi.json`.
    #[must_use]
    pub fn for_api(base_url: &str) -> Self {
        Self {
            spec: default_spec_location(base_url),
            spec_hash: None,
            spec_hash_policy: HashPolicy::default(),
        }
    }
}

#[must_use]
pub fn default_spec_location(base_url: &str) -> String {
    format!("{}{DEFAULT_SPEC_PATH}", base_url.trim_end_matches('/'))
}

/// Hash verification policy.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HashPolicy {
    /// Log warning if hash doesn't match.
    #[default]
    Warn,
    /// Fail startup if hash doesn't match.
    Fail,
    /// Ignore hash verification.
    Ignore,
}
