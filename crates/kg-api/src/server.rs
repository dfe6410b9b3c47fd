//! Axum server and routes.

use crate::tools::{call_tool, tool_definitions, ToolDefinition, ToolError};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use kg_manager::KnowledgeGraphManager;
use kg_store::GraphStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub struct AppState<S> {
    pub manager: KnowledgeGraphManager<S>,
    /// Held for the whole of each tool call: operations load, mutate and save the full store.
    pub call_lock: tokio::sync::Mutex<()>,
}

impl<S: GraphStore> AppState<S> {
    pub fn new(manager: KnowledgeGraphManager<S>) -> Self {
        Self {
            manager,
            call_lock: tokio::sync::Mutex::new(()),
        }
    }
}

pub fn router<S: GraphStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/call", post(handle_call_tool::<S>))
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ListToolsResponse {
    pub tools: Vec<ToolDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResponse {
    pub content: Vec<TextContent>,
    pub is_error: bool,
}

impl CallToolResponse {
    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                text,
            }],
            is_error,
        }
    }
}

async fn handle_list_tools() -> Json<ListToolsResponse> {
    Json(ListToolsResponse {
        tools: tool_definitions(),
    })
}

async fn handle_call_tool<S: GraphStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CallToolRequest>,
) -> Json<CallToolResponse> {
    let _guard = state.call_lock.lock().await;
    match call_tool(&state.manager, &req.name, req.arguments).await {
        Ok(text) => {
            tracing::info!(tool = %req.name, "tool call ok");
            Json(CallToolResponse::text(text, false))
        }
        Err(e) => {
            match &e {
                ToolError::Operation(kg_types::KgError::Store(_)) => {
                    tracing::error!(tool = %req.name, error = %e, "tool call failed")
                }
                _ => tracing::warn!(tool = %req.name, error = %e, "tool call rejected"),
            }
            Json(CallToolResponse::text(e.to_string(), true))
        }
    }
}

async fn handle_health() -> &'static str {
    "ok"
}
