//! `OpenAPI` tool source runtime.
//!
//! Glues the catalog, the call executor and the renderer together: `tools/list` reads the
//! catalog, `tools/call` looks up call metadata, performs the request and renders the envelope.
//! Tool failures never escape as protocol errors; they come back as `isError` results.

use crate::config::SpecConfig;
use crate::error::{OpenApiToolsError, Result};
use crate::loader::load_description;
use crate::translate::{Catalog, translate};
use reqwest::Client;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use std::sync::Arc;
use warpmetrics_http_tools::config::ApiConfig;
use warpmetrics_http_tools::render::Renderer;
use warpmetrics_http_tools::runtime::ApiClient;

/// Exposes the Warpmetrics API as MCP tools.
///
/// Cheap to clone: the catalog and renderer are shared and never mutated after startup.
#[derive(Debug, Clone)]
pub struct OpenApiToolSource {
    catalog: Arc<Catalog>,
    client: ApiClient,
    renderer: Arc<Renderer>,
}

impl OpenApiToolSource {
    #[must_use]
    pub fn new(catalog: Catalog, client: ApiClient, renderer: Renderer) -> Self {
        Self {
            catalog: Arc::new(catalog),
            client,
            renderer: Arc::new(renderer),
        }
    }

    /// Load the interface description, translate it, and bind the result to `api`.
    ///
    /// `http` is used both for the spec fetch and for every tool call.
    ///
    /// # Errors
    ///
    /// Returns an error if the description cannot be loaded (see
    /// [`load_description`](crate::loader::load_description)). No partial catalog is built.
    pub async fn build(
        http: Client,
        spec: &SpecConfig,
        api: ApiConfig,
        renderer: Renderer,
    ) -> Result<Self> {
        let doc = load_description(&http, spec).await?;
        let catalog = translate(&doc);
        tracing::debug!("Translated {} tools from '{}'", catalog.len(), spec.spec);
        Ok(Self::new(
            catalog,
            ApiClient::with_client(http, api),
            renderer,
        ))
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.catalog.to_tools()
    }

    /// Execute a tool call and return its rendered result.
    ///
    /// Unknown tools, transport failures and API rejections all produce an `isError` result
    /// with the text `Error: <message>`.
    pub async fn call_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let arguments = arguments.unwrap_or_default();
        match self.render_call(name, &arguments).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                tracing::warn!(tool = %name, "Tool call failed: {e}");
                CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
            }
        }
    }

    async fn render_call(&self, name: &str, arguments: &JsonObject) -> Result<String> {
        let call = self
            .catalog
            .call(name)
            .ok_or_else(|| OpenApiToolsError::UnknownTool(name.to_string()))?;
        let envelope = self.client.execute(call, arguments).await?;
        Ok(self.renderer.render(&envelope))
    }
}
