use crate::error::{AdapterError, Result};
use clap::{Parser, ValueEnum};
use warpmetrics_http_tools::config::{ApiConfig, DEFAULT_API_URL};
use warpmetrics_http_tools::render::DEFAULT_SKIP_PATTERN;
use warpmetrics_openapi_tools::config::{HashPolicy, SpecConfig, default_spec_location};

pub const DOCS_URL: &str = "https://warpmetrics.com/docs/mcp";

#[derive(Parser, Debug)]
#[command(name = "warpmetrics-mcp", version)]
#[command(about = "Warpmetrics MCP Server: the Warpmetrics API as read-only MCP tools over stdio")]
#[command(after_help = "For more info: https://warpmetrics.com/docs/mcp")]
pub struct Cli {
    /// List all available tools and exit
    #[arg(short = 'l', long)]
    pub list_tools: bool,

    /// Your Warpmetrics API key (required to serve)
    #[arg(long, env = "WARPMETRICS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, env = "WARPMETRICS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Interface description location (URL or file); defaults to the API's own
    #[arg(long, env = "WARPMETRICS_SPEC")]
    pub spec: Option<String>,

    /// Expected `sha256:<hex>` digest of the interface description
    #[arg(long, env = "WARPMETRICS_SPEC_HASH", value_parser = parse_spec_hash)]
    pub spec_hash: Option<String>,

    /// What to do when the digest does not match
    #[arg(long, value_enum, default_value_t = HashPolicyArg::Warn)]
    pub spec_hash_policy: HashPolicyArg,

    /// Regex of response field names to leave out of rendered output
    #[arg(long, env = "WARPMETRICS_SKIP_FIELDS", default_value = DEFAULT_SKIP_PATTERN)]
    pub skip_fields: String,

    /// Log filter (e.g. info, debug, warpmetrics_http_tools=trace)
    #[arg(long, env = "WARPMETRICS_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format (logs always go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HashPolicyArg {
    Warn,
    Fail,
    Ignore,
}

impl From<HashPolicyArg> for HashPolicy {
    fn from(value: HashPolicyArg) -> Self {
        match value {
            HashPolicyArg::Warn => HashPolicy::Warn,
            HashPolicyArg::Fail => HashPolicy::Fail,
            HashPolicyArg::Ignore => HashPolicy::Ignore,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    #[must_use]
    pub fn spec_config(&self) -> SpecConfig {
        SpecConfig {
            spec: self
                .spec
                .clone()
                .unwrap_or_else(|| default_spec_location(&self.api_url)),
            spec_hash: self.spec_hash.clone(),
            spec_hash_policy: self.spec_hash_policy.into(),
        }
    }

    /// # Errors
    ///
    /// Returns [`AdapterError::MissingApiKey`] when no non-empty key was given.
    pub fn api_config(&self) -> Result<ApiConfig> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(ApiConfig::new(&self.api_url, key)),
            _ => Err(AdapterError::MissingApiKey),
        }
    }
}

fn parse_spec_hash(s: &str) -> std::result::Result<String, String> {
    let hex = s
        .strip_prefix("sha256:")
        .ok_or_else(|| "expected sha256:<hex>".to_string())?;
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("expected 64 hex digits after sha256:".to_string());
    }
    Ok(format!("sha256:{}", hex.to_ascii_lowercase()))
}
