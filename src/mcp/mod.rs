use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::Config;
use crate::doctor;
use crate::engine::recommend::RecommendOptions;
use crate::models::recommendation::{Matching, Strategy};
use crate::service::{AnalyzeParams, AppService};

// ---------------------------------------------------------------------------
// Tool parameter structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PairMatrixParams {
    /// Git repository directory (default: ".")
    #[serde(default = "default_dir")]
    pub dir: String,
    /// Time window: <N>d, <N>w, <N>m, <N>y or YYYY-MM-DD..YYYY-MM-DD
    #[serde(default)]
    pub window: Option<String>,
    /// Team file path (default: <dir>/.team when present)
    #[serde(default)]
    pub team: Option<String>,
    /// Team sections to include
    #[serde(default)]
    pub sections: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PairRecommendParams {
    #[serde(flatten)]
    pub analyze: PairMatrixParams,
    /// "least-paired" or "least-recent"
    #[serde(default)]
    pub strategy: Option<Strategy>,
    /// "greedy" or "optimal" (least-paired only)
    #[serde(default)]
    pub matching: Option<Matching>,
    /// Skip recommendations above this many developers (max 20)
    #[serde(default)]
    pub max_developers: Option<usize>,
}

fn default_dir() -> String {
    ".".to_string()
}

// ---------------------------------------------------------------------------
// MCP Server
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PairSightServer {
    tool_router: ToolRouter<Self>,
    service: Arc<AppService>,
    defaults: Arc<Config>,
}

#[tool_router]
impl PairSightServer {
    pub fn new(config: Config) -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        let service = AppService::sandboxed(cwd).unwrap_or_else(|_| AppService::new());
        Self {
            tool_router: Self::tool_router(),
            service: Arc::new(service),
            defaults: Arc::new(config),
        }
    }

    fn analyze_params<'a>(&'a self, p: &'a PairMatrixParams) -> AnalyzeParams<'a> {
        AnalyzeParams {
            dir: &p.dir,
            window: p.window.as_deref().unwrap_or(&self.defaults.window),
            team: p.team.as_deref(),
            sections: &p.sections,
        }
    }

    #[tool(
        name = "pair_matrix",
        description = "Count the distinct days each pair of developers co-authored commits, with the last day they paired"
    )]
    async fn pair_matrix(
        &self,
        params: Parameters<PairMatrixParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        Self::to_tool_result(self.service.pair_matrix(&self.analyze_params(&p)))
    }

    #[tool(
        name = "pair_recommend",
        description = "Suggest disjoint developer pairs, favouring those who paired least or least recently"
    )]
    async fn pair_recommend(
        &self,
        params: Parameters<PairRecommendParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let options = RecommendOptions::new(p.strategy.unwrap_or(self.defaults.strategy))
            .with_matching(p.matching.unwrap_or(self.defaults.matching))
            .with_max_developers(p.max_developers.unwrap_or(self.defaults.max_developers));
        Self::to_tool_result(
            self.service
                .recommend(&self.analyze_params(&p.analyze), &options),
        )
    }

    #[tool(name = "doctor", description = "Check git availability")]
    async fn doctor_tool(&self) -> Result<CallToolResult, McpError> {
        Self::to_tool_result(Ok(doctor::run_doctor()))
    }
}

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

impl PairSightServer {
    fn to_tool_result<T: serde::Serialize>(
        result: anyhow::Result<T>,
    ) -> Result<CallToolResult, McpError> {
        match result {
            Ok(value) => {
                let json = serde_json::to_string(&value)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(json)]))
            }
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerHandler implementation
// ---------------------------------------------------------------------------

#[tool_handler]
impl ServerHandler for PairSightServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::new(
                "pair-sight",
                env!("CARGO_PKG_VERSION"),
            ))
            .with_instructions(
                "Analyze git co-author history to see who pairs with whom and suggest next pairings.",
            )
    }
}
