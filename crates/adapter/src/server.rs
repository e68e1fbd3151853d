//! MCP server over stdio.

use crate::error::{AdapterError, Result};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use std::future::Future;
use warpmetrics_openapi_tools::runtime::OpenApiToolSource;

const INSTRUCTIONS: &str = "Read-only access to the Warpmetrics API. Every tool maps to one GET \
                            endpoint and returns a plain-text summary of the response.";

/// Serves the catalog built at startup. The tool set never changes while running.
#[derive(Debug, Clone)]
pub struct WarpmetricsServer {
    source: OpenApiToolSource,
}

impl WarpmetricsServer {
    #[must_use]
    pub fn new(source: OpenApiToolSource) -> Self {
        Self { source }
    }

    /// Serve MCP over stdin/stdout until the client disconnects.
    ///
    /// # Errors
    ///
    /// Returns an error if the MCP handshake or the transport fails.
    pub async fn serve_stdio(self) -> Result<()> {
        let service = ServiceExt::<RoleServer>::serve(self, rmcp::transport::stdio())
            .await
            .map_err(|e| AdapterError::Serve(format!("failed to start stdio server: {e}")))?;
        tracing::info!("Warpmetrics MCP server running");
        service
            .waiting()
            .await
            .map_err(|e| AdapterError::Serve(format!("stdio server error: {e}")))?;
        Ok(())
    }
}

impl ServerHandler for WarpmetricsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<ListToolsResult, ErrorData>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: self.source.list_tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            tracing::debug!(tool = %request.name, "tools/call");
            Ok(self
                .source
                .call_tool(&request.name, request.arguments)
                .await)
        }
    }
}
