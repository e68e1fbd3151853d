//! Fetching, pinning and parsing the interface description.

use crate::config::{HashPolicy, SpecConfig};
use crate::document::InterfaceDescription;
use crate::error::{OpenApiToolsError, Result};
use reqwest::Client;
use serde_json::Value;
use sha2::{Digest, Sha256};
use url::Url;
use warpmetrics_http_tools::runtime::{redact_url, sanitize_reqwest_error};

/// Load the description named by `config`: fetch (URL) or read (file), check the pinned hash,
/// then parse as JSON or YAML.
///
/// # Errors
///
/// Returns an error if the document cannot be fetched or read, the server answers with a
/// non-success status, the hash check fails under [`HashPolicy::Fail`], or the content is
/// neither JSON nor YAML.
pub async fn load_description(
    client: &Client,
    config: &SpecConfig,
) -> Result<InterfaceDescription> {
    let content = read_spec(client, &config.spec).await?;
    verify_hash(&content, config)?;
    parse_description(&config.spec, &content)
}

async fn read_spec(client: &Client, location: &str) -> Result<String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let url = Url::parse(location).map_err(|e| {
            OpenApiToolsError::Config(format!("Invalid spec URL '{location}': {e}"))
        })?;
        tracing::info!("Fetching OpenAPI spec from {}", redact_url(&url));

        let resp = client
            .get(url)
            .send()
            .await
            .map_err(|e| OpenApiToolsError::SpecFetch {
                url: location.to_string(),
                message: sanitize_reqwest_error(&e),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(OpenApiToolsError::SpecStatus {
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(|e| OpenApiToolsError::SpecFetch {
            url: location.to_string(),
            message: sanitize_reqwest_error(&e),
        })
    } else {
        tracing::info!("Loading OpenAPI spec from {location}");
        read_spec_file(location)
    }
}

fn read_spec_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| OpenApiToolsError::SpecReadFile {
        path: path.to_string(),
        source: e,
    })
}

/// `sha256:<hex>` digest of the raw document text.
#[must_use]
pub fn spec_digest(content: &str) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(content.as_bytes())))
}

fn verify_hash(content: &str, config: &SpecConfig) -> Result<()> {
    let Some(expected) = &config.spec_hash else {
        return Ok(());
    };
    if config.spec_hash_policy == HashPolicy::Ignore {
        return Ok(());
    }

    let actual = spec_digest(content);
    if actual.eq_ignore_ascii_case(expected) {
        return Ok(());
    }
    match config.spec_hash_policy {
        HashPolicy::Fail => Err(OpenApiToolsError::SpecHashMismatch {
            expected: expected.clone(),
            actual,
        }),
        HashPolicy::Warn => {
            tracing::warn!(
                "Spec hash mismatch for '{}'. Expected: {}, Got: {}",
                config.spec,
                expected,
                actual
            );
            Ok(())
        }
        HashPolicy::Ignore => Ok(()),
    }
}

/// Parse document text as JSON, falling back to YAML.
///
/// # Errors
///
/// Returns an error if the text is neither, or is not an object.
pub fn parse_description(location: &str, content: &str) -> Result<InterfaceDescription> {
    let root: Value = serde_json::from_str(content)
        .or_else(|_| serde_yaml::from_str(content))
        .map_err(|e| OpenApiToolsError::SpecParse {
            location: location.to_string(),
            message: e.to_string(),
        })?;
    InterfaceDescription::from_value(root)
}
