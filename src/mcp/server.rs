//! The stdio protocol session: line loop, routing, lifecycle.

use anyhow::Result;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::mcp::protocol::{RpcRequest, RpcResponse, INTERNAL_ERROR, METHOD_NOT_FOUND};
use crate::mcp::tools;
use crate::sources::PaperAssembler;

/// Name reported in the `initialize` capability descriptor.
pub const SERVER_NAME: &str = "abstract-search";

/// MCP protocol revision this session speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// A stdio JSON-RPC session.
///
/// Each input line holds one request; each handled request produces exactly
/// one output line, except notifications which produce none. A request is
/// awaited to completion, including all nested registry calls, before the
/// next line is read — slow searches delay everything behind them.
pub struct McpServer {
    assembler: PaperAssembler,
    initialized: bool,
}

impl McpServer {
    /// Create a session over the given assembler
    pub fn new(assembler: PaperAssembler) -> Self {
        Self {
            assembler,
            initialized: false,
        }
    }

    /// Runs the session over stdin/stdout until the input stream closes or a
    /// shutdown signal arrives. A read error on stdin is returned to the
    /// caller and terminates the process with a non-zero status.
    pub async fn run(self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
            tokio::select! {
                result = self.serve(stdin, stdout) => result,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupt received, shutting down");
                    Ok(())
                }
                _ = sigterm.recv() => {
                    tracing::info!("terminate received, shutting down");
                    Ok(())
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                result = self.serve(stdin, stdout) => result,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupt received, shutting down");
                    Ok(())
                }
            }
        }
    }

    /// Drives the session over arbitrary streams. Split out from [`run`] so
    /// tests can feed scripted input and capture the exact output lines.
    pub async fn serve<R, W>(mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Some(response) = self.handle_line(&line).await {
                        writer.write_all(response.to_line().as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;
                    }
                }
                Ok(None) => {
                    tracing::info!("input stream closed, shutting down");
                    return Ok(());
                }
                Err(err) => {
                    tracing::error!(%err, "failed to read from input stream");
                    return Err(err.into());
                }
            }
        }
    }

    async fn handle_line(&mut self, line: &str) -> Option<RpcResponse> {
        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(%err, "malformed request line");
                return Some(RpcResponse::error(
                    Value::Null,
                    INTERNAL_ERROR,
                    format!("Internal error: {}", err),
                ));
            }
        };

        self.dispatch(request).await
    }

    async fn dispatch(&mut self, request: RpcRequest) -> Option<RpcResponse> {
        tracing::debug!(method = %request.method, "dispatching request");

        match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(request.id)),
            "tools/list" => Some(RpcResponse::success(
                request.id,
                json!({ "tools": tools::descriptors() }),
            )),
            "tools/call" => Some(self.handle_call(request).await),
            "notifications/initialized" => {
                tracing::debug!("client reported initialized");
                None
            }
            other => Some(RpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }

    fn handle_initialize(&mut self, id: Value) -> RpcResponse {
        self.initialized = true;
        tracing::info!("session initialized");

        RpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    async fn handle_call(&self, request: RpcRequest) -> RpcResponse {
        let name = request
            .params
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("");
        let arguments = request
            .params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        if !self.initialized {
            tracing::debug!(tool = name, "tool call before initialize");
        }
        tracing::info!(tool = name, "tool call");

        let content = tools::call(&self.assembler, name, &arguments).await;
        RpcResponse::success(request.id, json!({ "content": content }))
    }
}
