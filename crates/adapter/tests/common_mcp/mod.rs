#![allow(dead_code, unused_imports)]

use crate::common::{API_KEY, KillOnDrop, adapter_command};
use anyhow::Context as _;
use serde_json::{Value, json};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader, Lines};
use tokio::process::{ChildStdin, ChildStdout};

const TIMEOUT: Duration = Duration::from_secs(20);

/// Minimal MCP client speaking newline-delimited JSON-RPC to the adapter's stdio transport.
///
/// It exists only for integration tests and deliberately shares no code with the server.
pub struct McpStdioSession {
    _child: KillOnDrop,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl McpStdioSession {
    /// Spawn the adapter against `api_base_url` and complete the MCP handshake.
    pub async fn connect(api_base_url: &str, extra_args: &[&str]) -> anyhow::Result<Self> {
        let mut cmd = adapter_command();
        cmd.env("WARPMETRICS_API_KEY", API_KEY)
            .env("WARPMETRICS_API_URL", api_base_url)
            .args(extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = cmd.spawn().context("spawn adapter")?;
        let stdin = child.stdin.take().context("adapter stdin")?;
        let stdout = child.stdout.take().context("adapter stdout")?;

        let mut session = Self {
            _child: KillOnDrop(child),
            stdin,
            stdout: BufReader::new(stdout).lines(),
        };

        let init = session
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "warpmetrics-mcp-integration-tests", "version": "0" }
                }),
            )
            .await?;
        anyhow::ensure!(init.get("result").is_some(), "initialize failed: {init}");

        session
            .send(&json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
            .await?;

        Ok(session)
    }

    /// Send a request and wait for the response carrying the same id.
    pub async fn request(
        &mut self,
        id: u64,
        method: &str,
        params: Value,
    ) -> anyhow::Result<Value> {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .await?;

        tokio::time::timeout(TIMEOUT, self.read_response(id))
            .await
            .with_context(|| format!("timeout waiting for {method} response"))?
    }

    pub async fn call_tool(
        &mut self,
        id: u64,
        name: &str,
        arguments: Value,
    ) -> anyhow::Result<Value> {
        self.request(
            id,
            "tools/call",
            json!({ "name": name, "arguments": arguments }),
        )
        .await
    }

    async fn send(&mut self, msg: &Value) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(msg)?;
        line.push('\n');
        self.stdin
            .write_all(line.as_bytes())
            .await
            .context("write stdin")?;
        self.stdin.flush().await.context("flush stdin")?;
        Ok(())
    }

    async fn read_response(&mut self, id: u64) -> anyhow::Result<Value> {
        while let Some(line) = self.stdout.next_line().await.context("read stdout")? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let msg: Value = serde_json::from_str(line)
                .with_context(|| format!("stdout line is not JSON: {line}"))?;
            // Server-initiated notifications carry no id.
            if msg.get("id") == Some(&json!(id)) {
                return Ok(msg);
            }
        }
        anyhow::bail!("adapter closed stdout before answering request {id}")
    }
}

/// Text of the first content block of a `tools/call` response.
pub fn tool_text(msg: &Value) -> anyhow::Result<&str> {
    msg.pointer("/result/content/0/text")
        .and_then(Value::as_str)
        .with_context(|| format!("tools/call missing result.content[0].text: {msg}"))
}

/// Whether a `tools/call` response is flagged as a tool error.
pub fn is_tool_error(msg: &Value) -> bool {
    msg.pointer("/result/isError")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
