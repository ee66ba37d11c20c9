//! stdio transport for MCP JSON-RPC
//!
//! One JSON message per line. State notifications share the writer with
//! responses, so every write goes through the same lock.

use crate::ScratchCraftServer;
use crate::SERVER_NAME;
use crate::mcp::{
    InitializeParams, InitializeResult, Notification, PROTOCOL_VERSION, Request, RequestId,
    ResourcesCapability, Response, ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::surface::ControlSurface;
use crate::tools::{handle_tool_call, list_tools};
use scratchcraft_core::catalog::Catalog;
use scratchcraft_core::{BridgeError, Result, StateSnapshot, error_codes};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, error, info, warn};

const STATE_URI: &str = "scratchcraft://state";
const CATALOG_URI: &str = "scratchcraft://catalog";

/// Run the MCP server on stdio
pub async fn run<S: ControlSurface>(server: ScratchCraftServer<S>) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    serve(server, stdin, tokio::io::stdout()).await
}

/// Serve requests read from `reader` until EOF, then shut the surface down
pub async fn serve<S, R, W>(server: ScratchCraftServer<S>, mut reader: R, writer: W) -> Result<()>
where
    S: ControlSurface,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let writer = Arc::new(Mutex::new(writer));
    let mut line = String::new();

    info!("ScratchCraft MCP server starting on stdio");

    // Forward state changes if the surface publishes them
    let state_rx = {
        let surface = server.surface.read().await;
        surface.subscribe_state()
    };
    let forwarder = state_rx.map(|rx| tokio::spawn(forward_state(rx, writer.clone())));

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| BridgeError::Protocol(format!("Failed to read stdin: {}", e)))?;

        if bytes_read == 0 {
            info!("Client disconnected (EOF)");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!("Received: {}", trimmed);

        let response = match serde_json::from_str::<Request>(trimmed) {
            Ok(request) => {
                let Some(id) = request.id.clone() else {
                    debug!("Notification {}", request.method);
                    continue;
                };
                handle_request(id, &request, &server).await
            }
            Err(e) => {
                error!("Failed to parse request: {}", e);
                Response::error(
                    RequestId::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                )
            }
        };
        let response_json = serde_json::to_string(&response)?;

        debug!("Sending: {}", response_json);
        write_line(&writer, &response_json)
            .await
            .map_err(|e| BridgeError::Protocol(format!("Failed to write stdout: {}", e)))?;
    }

    if let Some(task) = forwarder {
        task.abort();
    }

    let mut surface = server.surface.write().await;
    if let Err(e) = surface.shutdown().await {
        warn!("Shutdown failed: {}", e);
    }

    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &Mutex<W>, json: &str) -> std::io::Result<()> {
    let mut out = writer.lock().await;
    out.write_all(json.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

async fn forward_state<W: AsyncWrite + Unpin>(
    mut rx: broadcast::Receiver<StateSnapshot>,
    writer: Arc<Mutex<W>>,
) {
    loop {
        match rx.recv().await {
            Ok(snapshot) => {
                let notification = Notification::state(&snapshot);
                match serde_json::to_string(&notification) {
                    Ok(json) => {
                        if let Err(e) = write_line(&writer, &json).await {
                            error!("Failed to write state notification: {}", e);
                            break;
                        }
                    }
                    Err(e) => warn!("Failed to serialize notification: {}", e),
                }
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("State channel closed");
                break;
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("State forwarder lagged, skipped {} snapshots", n);
            }
        }
    }
}

async fn handle_request<S: ControlSurface>(
    id: RequestId,
    request: &Request,
    server: &ScratchCraftServer<S>,
) -> Response {
    match request.method.as_str() {
        "initialize" => handle_initialize(id, request, server).await,
        "ping" => Response::success(id, serde_json::json!({})),
        "tools/list" => Response::success(id, serde_json::json!({ "tools": list_tools() })),
        "tools/call" => handle_tools_call(id, request, server).await,
        "resources/list" => handle_resources_list(id),
        "resources/read" => handle_resources_read(id, request, server).await,
        _ => Response::error(
            id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}

async fn handle_initialize<S: ControlSurface>(
    id: RequestId,
    request: &Request,
    server: &ScratchCraftServer<S>,
) -> Response {
    let params: InitializeParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Invalid initialize params: {}", e),
            );
        }
    };
    info!(
        "Client {} v{} connected",
        params.client_info.name, params.client_info.version
    );

    let game_server = server.surface.read().await.base_address().to_string();
    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
            resources: ResourcesCapability {
                subscribe: true,
                list_changed: false,
            },
            logging: serde_json::json!({}),
        },
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            game_server,
        },
    };

    match serde_json::to_value(result) {
        Ok(value) => Response::success(id, value),
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
    }
}

async fn handle_tools_call<S: ControlSurface>(
    id: RequestId,
    request: &Request,
    server: &ScratchCraftServer<S>,
) -> Response {
    #[derive(serde::Deserialize)]
    struct ToolCallParams {
        name: String,
        #[serde(default)]
        arguments: serde_json::Value,
    }

    let params: ToolCallParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Invalid tool call params: {}", e),
            );
        }
    };

    handle_tool_call(&params.name, params.arguments, id, &server.surface).await
}

fn handle_resources_list(id: RequestId) -> Response {
    let resources = vec![
        serde_json::json!({
            "uri": STATE_URI,
            "name": "Game State",
            "description": "Last polled block, event and position values",
            "mimeType": "application/json"
        }),
        serde_json::json!({
            "uri": CATALOG_URI,
            "name": "Menu Catalog",
            "description": "Menu values offered by the block palette",
            "mimeType": "application/json"
        }),
    ];

    Response::success(id, serde_json::json!({ "resources": resources }))
}

async fn handle_resources_read<S: ControlSurface>(
    id: RequestId,
    request: &Request,
    server: &ScratchCraftServer<S>,
) -> Response {
    #[derive(serde::Deserialize)]
    struct ReadParams {
        uri: String,
    }

    let params: ReadParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Invalid read params: {}", e),
            );
        }
    };

    let content = match params.uri.as_str() {
        STATE_URI => serde_json::to_value(server.surface.read().await.snapshot()),
        CATALOG_URI => serde_json::to_value(Catalog::new()),
        _ => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Unknown resource: {}", params.uri),
            );
        }
    };

    let content = match content {
        Ok(value) => value,
        Err(e) => return Response::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
    };

    Response::success(
        id,
        serde_json::json!({
            "contents": [{
                "uri": params.uri,
                "mimeType": "application/json",
                "text": content.to_string()
            }]
        }),
    )
}
