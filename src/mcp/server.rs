use crate::app::App;
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::mcp::catalog::tool_catalog;
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::services::logger::Logger;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

const PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_NAME: &str = "latentsense-server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct McpServer {
    app: Arc<App>,
    logger: Logger,
}

impl McpServer {
    pub fn new(app: App) -> Self {
        let logger = app.logger.child("server");
        Self {
            app: Arc::new(app),
            logger,
        }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": tool_catalog() })
    }

    async fn handle_tools_call(&self, params: &Value) -> Result<Value, McpError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| McpError::new(ErrorCode::InvalidParams, "Missing tool name"))?;
        let args = params.get("arguments").cloned().unwrap_or(Value::Null);
        let output = self.app.tool_executor.call(name, args).await;
        Ok(output.into_call_result())
    }

    /// Answers one request. Notifications get no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return request.id.map(|id| {
                JsonRpcResponse::failure(
                    id,
                    ErrorCode::InvalidRequest.as_i32(),
                    "Invalid request: jsonrpc must be \"2.0\"".to_string(),
                )
            });
        }
        let id = request.id?;
        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tools_call(&request.params).await,
            method if method.starts_with("notifications/") => Ok(serde_json::json!({})),
            method => Err(McpError::method_not_found(method)),
        };
        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::failure(id, err.code.as_i32(), err.message),
        })
    }

    fn parse_line(line: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
        let parsed: Value = serde_json::from_str(line).map_err(|_| {
            JsonRpcResponse::failure(
                Value::Null,
                ErrorCode::ParseError.as_i32(),
                "Parse error".to_string(),
            )
        })?;
        let id = parsed.get("id").cloned().unwrap_or(Value::Null);
        serde_json::from_value(parsed).map_err(|_| {
            JsonRpcResponse::failure(
                id,
                ErrorCode::InvalidRequest.as_i32(),
                "Invalid request".to_string(),
            )
        })
    }

    /// Serves newline-delimited JSON-RPC until `reader` hits EOF. Tool calls
    /// run on their own tasks, so responses can come back out of order.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> Result<(), ToolError>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let writer_task = tokio::spawn(async move {
            let mut writer = BufWriter::new(writer);
            while let Some(line) = rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        let mut in_flight = JoinSet::new();
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let request = match Self::parse_line(trimmed) {
                Ok(request) => request,
                Err(response) => {
                    let _ = tx.send(response.to_line());
                    continue;
                }
            };

            if request.method == "tools/call" {
                let server = self.clone();
                let tx = tx.clone();
                in_flight.spawn(async move {
                    if let Some(response) = server.handle_request(request).await {
                        let _ = tx.send(response.to_line());
                    }
                });
            } else if let Some(response) = self.handle_request(request).await {
                let _ = tx.send(response.to_line());
            }

            while let Some(joined) = in_flight.try_join_next() {
                if let Err(err) = joined {
                    self.logger.error(&format!("tool task failed: {}", err), None);
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(err) = joined {
                self.logger.error(&format!("tool task failed: {}", err), None);
            }
        }
        drop(tx);
        writer_task
            .await
            .map_err(|err| ToolError::internal(format!("stdout writer stopped: {}", err)))??;
        Ok(())
    }
}

pub async fn run_stdio() -> Result<(), ToolError> {
    let app = App::initialize()?;
    let logger = app.logger.clone();
    let server = Arc::new(McpServer::new(app));
    logger.info("serving MCP over stdio", None);
    let result = server.serve(tokio::io::stdin(), tokio::io::stdout()).await;
    logger.info("stdin closed, shutting down", None);
    result
}
