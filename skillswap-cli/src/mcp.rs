//! MCP Server implementation for SkillSwap.

use rmcp::{
    ServerHandler, tool, tool_handler, tool_router,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    ErrorData as McpError,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use skillswap::{ChatBot, ListingFilter, SkillSwapClient, StatusFilter};

use crate::config::{self, Backend};
use crate::handlers::{bot, chat, listing, rating};

/// MCP Server for SkillSwap operations.
#[derive(Clone)]
pub struct SkillSwapMCPServer {
    backend: Backend,
    tool_router: ToolRouter<Self>,
}

impl SkillSwapMCPServer {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            tool_router: Self::tool_router(),
        }
    }

    fn build_client(&self) -> Result<SkillSwapClient, McpError> {
        config::build_client(&self.backend)
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    fn build_authed_client(&self) -> Result<SkillSwapClient, McpError> {
        config::build_authed_client(&self.backend)
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
        serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    fn ok(text: String) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

fn tool_error(e: anyhow::Error) -> McpError {
    McpError::internal_error(e.to_string(), None)
}

// Parameter structs
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct FilterParams {
    /// "Teach", "Learn" or "All" (default: All)
    #[serde(default)]
    pub status: Option<String>,
    /// Exact skill name, case-insensitive
    #[serde(default)]
    pub skill: Option<String>,
    /// Author name prefix, case-insensitive
    #[serde(default)]
    pub author: Option<String>,
}

impl FilterParams {
    fn to_filter(&self) -> Result<ListingFilter, McpError> {
        let mut filter = ListingFilter::new();
        if let Some(status) = &self.status {
            let status: StatusFilter = status
                .parse()
                .map_err(|e: skillswap::Error| McpError::invalid_params(e.to_string(), None))?;
            filter = filter.status(status);
        }
        if let Some(skill) = &self.skill {
            filter = filter.skill(skill);
        }
        if let Some(author) = &self.author {
            filter = filter.author(author);
        }
        Ok(filter)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListingIdParam {
    /// Listing ID
    pub listing_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TeacherParam {
    /// Teacher user ID
    pub teacher_uid: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RatingSubmitParams {
    /// Teacher user ID
    pub teacher_uid: String,
    /// Stars from 1 to 5
    pub score: i32,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PeerParam {
    /// Peer user ID
    pub peer_uid: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ChatSendParams {
    /// Peer user ID
    pub peer_uid: String,
    /// Message text
    pub text: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BotParams {
    /// Question for the assistant
    pub message: String,
}

#[tool_router]
impl SkillSwapMCPServer {
    #[tool(description = "Browse skill listings, best-rated teachers first, with optional status/skill/author filters")]
    async fn listing_browse(&self, params: Parameters<FilterParams>) -> Result<CallToolResult, McpError> {
        let filter = params.0.to_filter()?;
        let client = self.build_client()?;
        let result = listing::browse(&client, &filter).await.map_err(tool_error)?;
        Self::ok(Self::to_json(&result)?)
    }

    #[tool(description = "Listings complementing your own: same skill, opposite Teach/Learn status (requires authentication)")]
    async fn listing_matches(&self, params: Parameters<FilterParams>) -> Result<CallToolResult, McpError> {
        let filter = params.0.to_filter()?;
        let client = self.build_authed_client()?;
        let result = listing::browse(&client, &filter).await.map_err(tool_error)?;
        Self::ok(Self::to_json(&result.matches)?)
    }

    #[tool(description = "Top rated teachers")]
    async fn listing_leaderboard(&self) -> Result<CallToolResult, McpError> {
        let client = self.build_client()?;
        let entries = listing::leaderboard(&client, &ListingFilter::new())
            .await
            .map_err(tool_error)?;
        Self::ok(Self::to_json(&entries)?)
    }

    #[tool(description = "Get one listing with its owner's rating")]
    async fn listing_get(&self, params: Parameters<ListingIdParam>) -> Result<CallToolResult, McpError> {
        let client = self.build_client()?;
        let detail = listing::show(&client, &params.0.listing_id)
            .await
            .map_err(tool_error)?;
        Self::ok(Self::to_json(&detail)?)
    }

    #[tool(description = "Get a teacher's average rating")]
    async fn rating_get(&self, params: Parameters<TeacherParam>) -> Result<CallToolResult, McpError> {
        let client = self.build_client()?;
        let info = rating::show(&client, &params.0.teacher_uid)
            .await
            .map_err(tool_error)?;
        Self::ok(Self::to_json(&info)?)
    }

    #[tool(description = "Rate a teacher from 1 to 5; replaces your earlier rating (requires authentication)")]
    async fn rating_submit(&self, params: Parameters<RatingSubmitParams>) -> Result<CallToolResult, McpError> {
        if !(1..=5).contains(&params.0.score) {
            return Err(McpError::invalid_params("score must be between 1 and 5", None));
        }
        let client = self.build_authed_client()?;
        let info = rating::give(&client, &params.0.teacher_uid, params.0.score)
            .await
            .map_err(tool_error)?;
        Self::ok(Self::to_json(&info)?)
    }

    #[tool(description = "Messages exchanged with a user (requires authentication)")]
    async fn chat_history(&self, params: Parameters<PeerParam>) -> Result<CallToolResult, McpError> {
        let client = self.build_authed_client()?;
        let result = chat::history(&client, &params.0.peer_uid)
            .await
            .map_err(tool_error)?;
        Self::ok(Self::to_json(&result)?)
    }

    #[tool(description = "Send a direct message (requires authentication)")]
    async fn chat_send(&self, params: Parameters<ChatSendParams>) -> Result<CallToolResult, McpError> {
        let client = self.build_authed_client()?;
        let result = chat::send(&client, &params.0.peer_uid, &params.0.text)
            .await
            .map_err(tool_error)?;
        match result.message_id {
            Some(id) => Self::ok(format!("Message sent (message ID: {})", id)),
            None => Self::ok("Nothing sent: message is empty".to_string()),
        }
    }

    #[tool(description = "Ask the SkillBot FAQ assistant")]
    async fn bot_reply(&self, params: Parameters<BotParams>) -> Result<CallToolResult, McpError> {
        let mut session = ChatBot::default();
        match bot::reply(&mut session, &params.0.message) {
            Some(reply) => Self::ok(reply.reply),
            None => Err(McpError::invalid_params("message is empty", None)),
        }
    }
}

#[tool_handler]
impl ServerHandler for SkillSwapMCPServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: None }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "skillswap-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            ..Default::default()
        }
    }
}

/// Run the MCP Server.
pub async fn run_server(backend: Backend) -> anyhow::Result<()> {
    use rmcp::transport::io::stdio;

    tracing::info!("Starting SkillSwap MCP server");

    let server = SkillSwapMCPServer::new(backend);
    let service = rmcp::serve_server(server, stdio()).await?;

    tracing::info!("SkillSwap MCP server ready");
    service.waiting().await?;

    Ok(())
}
