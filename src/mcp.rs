use crate::types::*;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

pub const SEARCH_TOOL: &str = "web_search";

const SEARCH_TOOL_DESCRIPTION: &str = "Search the web through DuckDuckGo, Google or Bing. \
Returns a normalized list of results with titles, snippets and URLs, plus a start index for the next page when the provider has one.";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchToolArgs {
    /// The search query to execute
    pub query: String,
    /// One of "duckduckgo" (default), "google" or "bing"
    #[serde(default)]
    pub provider: Option<String>,
    /// 1-based index of the first result, for providers that paginate
    #[serde(default)]
    pub start: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpTool {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpToolsResponse {
    pub tools: Vec<McpTool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallResponse {
    pub content: Vec<McpContent>,
    pub is_error: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl McpCallResponse {
    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![McpContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error,
        }
    }
}

pub fn search_tool_description() -> &'static str {
    SEARCH_TOOL_DESCRIPTION
}

pub fn search_tool_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(SearchToolArgs))
        .unwrap_or_else(|_| serde_json::json!({"type": "object"}))
}

/// Outcome of one tool invocation, independent of the transport carrying it.
pub struct ToolOutcome {
    pub text: String,
    pub is_error: bool,
}

/// Runs the search tool. Search failures are reported in-band as error text.
pub async fn run_search_tool(state: &AppState, args: SearchToolArgs) -> ToolOutcome {
    let start = args.start.map(|s| s.to_string());
    let result = state
        .search
        .search(
            Some(args.query.as_str()),
            args.provider.as_deref(),
            start.as_deref(),
        )
        .await;

    match result {
        Ok(response) => ToolOutcome {
            text: render_results(&args.query, &response),
            is_error: false,
        },
        Err(e) => {
            error!("Search tool error: {}", e);
            ToolOutcome {
                text: format!("Search failed: {}", e.public_message()),
                is_error: true,
            }
        }
    }
}

pub fn render_results(query: &str, response: &SearchResponse) -> String {
    if response.items.is_empty() {
        return format!(
            "No {} results found for query: {}",
            response.provider, query
        );
    }

    let mut text = format!(
        "Found {} {} results for '{}':\n\n",
        response.items.len(),
        response.provider,
        query
    );
    for (i, item) in response.items.iter().enumerate() {
        text.push_str(&format!(
            "{}. **{}**\n   URL: {}\n",
            i + 1,
            item.title,
            item.url
        ));
        if !item.snippet.is_empty() {
            text.push_str(&format!(
                "   Snippet: {}\n",
                item.snippet.chars().take(200).collect::<String>()
            ));
        }
        text.push('\n');
    }
    if let Some(next) = response.next_start {
        text.push_str(&format!("More results: start={}\n", next));
    }
    text
}

pub async fn list_tools() -> Json<McpToolsResponse> {
    let tools = vec![McpTool {
        name: SEARCH_TOOL.to_string(),
        description: SEARCH_TOOL_DESCRIPTION.to_string(),
        input_schema: search_tool_schema(),
    }];

    Json(McpToolsResponse { tools })
}

pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    body: Result<Json<McpCallRequest>, JsonRejection>,
) -> Result<Json<McpCallResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = body.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!(
                "Invalid request: {}",
                rejection.body_text()
            ))),
        )
    })?;
    info!("MCP tool call: {} with args: {:?}", request.name, request.arguments);

    match request.name.as_str() {
        SEARCH_TOOL => {
            let args: SearchToolArgs =
                serde_json::from_value(request.arguments).map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse::new(format!("Invalid arguments: {}", e))),
                    )
                })?;
            let outcome = run_search_tool(&state, args).await;
            Ok(Json(McpCallResponse::text(outcome.text, outcome.is_error)))
        }
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Unknown tool: {}", request.name))),
        )),
    }
}
