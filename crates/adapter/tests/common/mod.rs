#![allow(dead_code, unused_imports)]

use anyhow::Context as _;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

pub use warpmetrics_test_support::{KillOnDrop, MockApi, closed_local_url};

pub const API_KEY: &str = "wm_test_key";

/// Command for the built binary with every `WARPMETRICS_*` variable cleared.
pub fn adapter_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_warpmetrics-mcp"));
    for var in [
        "WARPMETRICS_API_KEY",
        "WARPMETRICS_API_URL",
        "WARPMETRICS_SPEC",
        "WARPMETRICS_SPEC_HASH",
        "WARPMETRICS_SKIP_FIELDS",
        "WARPMETRICS_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.kill_on_drop(true);
    cmd
}

/// Run the binary to completion (for flags that exit on their own).
pub async fn run_adapter(args: &[&str], envs: &[(&str, &str)]) -> anyhow::Result<Output> {
    let mut cmd = adapter_command();
    cmd.args(args);
    for (k, v) in envs {
        cmd.env(k, v);
    }
    tokio::time::timeout(Duration::from_secs(20), cmd.output())
        .await
        .context("timeout waiting for adapter to exit")?
        .context("run adapter")
}

pub fn spec_doc() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": { "title": "Warpmetrics", "version": "1" },
        "paths": {
            "/v1/runs": {
                "get": {
                    "operationId": "listRuns",
                    "summary": "List runs",
                    "description": "Most recent first.",
                    "tags": ["Runs"],
                    "parameters": [
                        { "name": "limit", "in": "query", "description": "Max results",
                          "schema": { "type": "integer", "default": 20 } },
                        { "name": "status", "in": "query",
                          "schema": { "type": "string", "enum": ["ok", "error"] } }
                    ]
                },
                "post": { "operationId": "createRun", "summary": "Create run", "tags": ["Runs"] }
            },
            "/v1/runs/{id}": {
                "get": {
                    "operationId": "getRun",
                    "summary": "Get run",
                    "tags": ["Runs"],
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }
                    ]
                },
                "delete": { "operationId": "deleteRun", "tags": ["Runs"] }
            },
            "/v1/quota": {
                "get": { "operationId": "getQuota", "summary": "Current quota" }
            },
            "/v1/internal": {
                "get": { "summary": "No identifier, never exposed" }
            }
        }
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {API_KEY}"))
}

fn unauthorized() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "error": { "message": "Invalid API key" } })),
    )
        .into_response()
}

/// The Warpmetrics API surface the integration tests talk to.
pub fn mock_api_app() -> Router {
    Router::new()
        .route("/v1/docs/openapi.json", get(|| async { Json(spec_doc()) }))
        .route(
            "/v1/runs",
            get(
                |headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    if !authorized(&headers) {
                        return unauthorized();
                    }
                    let status = q.get("status").cloned().unwrap_or_else(|| "ok".to_string());
                    Json(json!({
                        "success": true,
                        "data": [
                            { "id": "run_1", "projectId": "p1", "status": status,
                              "cost": 2.5, "latency": 1234.4, "note": null },
                            { "id": "run_2", "status": status, "tokens": 123456 }
                        ]
                    }))
                    .into_response()
                },
            ),
        )
        .route(
            "/v1/runs/{id}",
            get(|headers: HeaderMap, Path(id): Path<String>| async move {
                if !authorized(&headers) {
                    return unauthorized();
                }
                Json(json!({
                    "success": true,
                    "data": {
                        "id": id,
                        "projectId": "p1",
                        "errorRate": 12.5,
                        "usage": { "calls": 42, "totalCost": 0.1234 },
                        "tags": ["a", "b"],
                        "labels": []
                    }
                }))
                .into_response()
            }),
        )
        .route(
            "/v1/quota",
            get(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({ "success": false, "error": { "message": "quota exceeded" } })),
                )
            }),
        )
}
