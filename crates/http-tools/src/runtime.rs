//! Call execution: turn a tool call into an authenticated GET and unwrap the API envelope.
//!
//! The remote API answers every request with `{ success, data?, error?: { message } }`. A body
//! that is not JSON and an envelope with a falsy `success` are both failures; anything else is
//! handed back untouched for rendering.

use crate::config::{ApiConfig, CallMetadata, HttpParamLocation};
use crate::value::{is_truthy, to_display_string};
use reqwest::Client;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("{0}")]
    Transport(String),
    /// A response arrived but its body was not JSON.
    #[error("HTTP {status}: {status_text}")]
    UnparsableBody { status: u16, status_text: String },
    /// The envelope reported `success: false` (or omitted it).
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, ExecutionError>;

impl From<reqwest::Error> for ExecutionError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(sanitize_reqwest_error(&value))
    }
}

/// Owned by the configured credential; a same-named header parameter is never sent.
const AUTHORIZATION: &str = "authorization";

#[derive(Debug, Default)]
struct RequestParts {
    path: String,
    query_params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

/// Authenticated client for the remote API.
///
/// Cheap to clone; every call is independent and holds no shared mutable state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    /// Build the request URL for `call` from `arguments`.
    ///
    /// Arguments that are missing (or `null`) are skipped; required-ness is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidUrl`] if the base URL plus path does not parse.
    pub fn build_url(&self, call: &CallMetadata, arguments: &Map<String, Value>) -> Result<Url> {
        let parts = build_request_parts(call, arguments);
        self.url_for(&parts)
    }

    fn url_for(&self, parts: &RequestParts) -> Result<Url> {
        let raw = format!("{}{}", self.config.base_url.trim_end_matches('/'), parts.path);
        let mut url =
            Url::parse(&raw).map_err(|e| ExecutionError::InvalidUrl(format!("{raw}: {e}")))?;

        if !parts.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(
                parts
                    .query_params
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }

        Ok(url)
    }

    /// Issue the GET for `call` and return the parsed envelope.
    ///
    /// # Errors
    ///
    /// - [`ExecutionError::Transport`] if no response was received
    /// - [`ExecutionError::UnparsableBody`] if the body is not JSON
    /// - [`ExecutionError::Rejected`] if the envelope's `success` flag is falsy
    pub async fn execute(
        &self,
        call: &CallMetadata,
        arguments: &Map<String, Value>,
    ) -> Result<Value> {
        let parts = build_request_parts(call, arguments);
        let url = self.url_for(&parts)?;

        tracing::debug!(url = %redact_url(&url), "calling API");

        let mut request = self.client.get(url).bearer_auth(&self.config.api_key);
        for (name, value) in &parts.headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();

        let envelope: Value = match response.text().await {
            Ok(body) => serde_json::from_str(&body).ok(),
            Err(_) => None,
        }
        .ok_or_else(|| ExecutionError::UnparsableBody {
            status: status.as_u16(),
            status_text,
        })?;

        if !envelope.get("success").is_some_and(is_truthy) {
            let message = envelope
                .pointer("/error/message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map_or_else(
                    || format!("Request failed ({})", status.as_u16()),
                    str::to_string,
                );
            return Err(ExecutionError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(envelope)
    }
}

fn build_request_parts(call: &CallMetadata, arguments: &Map<String, Value>) -> RequestParts {
    let mut parts = RequestParts {
        path: call.path.clone(),
        ..RequestParts::default()
    };

    for param in &call.parameters {
        let value = match arguments.get(&param.name) {
            None | Some(Value::Null) => continue,
            Some(v) => to_display_string(v),
        };

        match param.location {
            HttpParamLocation::Path => {
                parts.path = parts
                    .path
                    .replace(&format!("{{{}}}", param.name), &encode_uri_component(&value));
            }
            HttpParamLocation::Query => parts.query_params.push((param.name.clone(), value)),
            HttpParamLocation::Header if param.name.eq_ignore_ascii_case(AUTHORIZATION) => {
                tracing::warn!(
                    param = %param.name,
                    "header parameter ignored, the configured credential is sent instead"
                );
            }
            HttpParamLocation::Header => parts.headers.push((param.name.clone(), value)),
            HttpParamLocation::Cookie => {
                tracing::debug!(param = %param.name, "cookie parameter not sent");
            }
        }
    }

    if !parts.path.starts_with('/') {
        parts.path = format!("/{}", parts.path);
    }

    parts
}

/// Percent-encode a path segment value, keeping only `A-Z a-z 0-9 - _ . ! ~ * ' ( )` literal.
fn encode_uri_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_component_safe(b) {
            out.push(char::from(b));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(b >> 4)]));
            out.push(char::from(HEX[usize::from(b & 0x0F)]));
        }
    }
    out
}

fn is_component_safe(b: u8) -> bool {
    matches!(
        b,
        b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')'
    )
}

#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    // Best-effort: drop credentials + query + fragment.
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}
