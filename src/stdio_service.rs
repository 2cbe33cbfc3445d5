use rmcp::{model::*, ServiceExt};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;
use crate::mcp::{self, SearchToolArgs};
use crate::AppState;

#[derive(Clone, Debug)]
pub struct McpService {
    pub state: Arc<AppState>,
}

impl McpService {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let state = Arc::new(AppState::new(config)?);
        Ok(Self { state })
    }
}

impl rmcp::ServerHandler for McpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "Web search normalized across DuckDuckGo, Google and Bing. Google and Bing require server-side API keys."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _page: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let input_schema = match mcp::search_tool_schema() {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };
        let tools = vec![Tool {
            name: Cow::Borrowed(mcp::SEARCH_TOOL),
            description: Some(Cow::Borrowed(mcp::search_tool_description())),
            input_schema,
            output_schema: None,
            annotations: None,
        }];

        Ok(ListToolsResult {
            tools,
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        info!("MCP tool call: {} with args: {:?}", request.name, request.arguments);

        match request.name.as_ref() {
            mcp::SEARCH_TOOL => {
                let args = request.arguments.ok_or_else(|| {
                    ErrorData::new(
                        ErrorCode::INVALID_PARAMS,
                        "Missing required arguments object",
                        None,
                    )
                })?;
                let args: SearchToolArgs = serde_json::from_value(serde_json::Value::Object(args))
                    .map_err(|e| {
                        ErrorData::new(
                            ErrorCode::INVALID_PARAMS,
                            format!("Invalid arguments: {}", e),
                            None,
                        )
                    })?;

                let outcome = mcp::run_search_tool(&self.state, args).await;
                if outcome.is_error {
                    Ok(CallToolResult::error(vec![Content::text(outcome.text)]))
                } else {
                    Ok(CallToolResult::success(vec![Content::text(outcome.text)]))
                }
            }
            _ => Err(ErrorData::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("Unknown tool: {}", request.name),
                None,
            )),
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::from_env();
    info!("Starting MCP stdio service");
    config.providers.log_status();

    let service = McpService::new(&config)?;
    let server = service.serve(rmcp::transport::stdio()).await?;
    info!("MCP stdio server running");
    let _quit_reason = server.waiting().await?;
    Ok(())
}
