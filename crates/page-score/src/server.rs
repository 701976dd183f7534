/// MCP server implementation for wiki page quality scoring.
///
/// Exposes three tools:
/// - `get_page_score`: Score a page (cached unless refresh is requested)
/// - `rescore_page`: Queue a background recompute for a page
/// - `get_usage_stats`: Per-factor chat-service call counters
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::info;

use score_common::api::{
    FactorScoreEntry, GetPageScoreParams, RescorePageParams, RescoreQueuedResponse,
    ScoreReportResponse,
};
use score_common::chat::ChatClient;
use score_common::usage::{UsageStats, UsageTracker};

use crate::cache::ReportCache;
use crate::content::ContentSource;
use crate::error::AppError;
use crate::jobs::RescoreQueue;
use crate::model::ScoreReport;
use crate::scorer::PageScorer;

#[derive(Clone)]
pub struct PageScoreServer {
    content: Arc<ContentSource>,
    scorer: Arc<PageScorer<ChatClient>>,
    cache: Arc<ReportCache>,
    queue: RescoreQueue,
    usage: UsageTracker,
    tool_router: ToolRouter<PageScoreServer>,
}

impl PageScoreServer {
    pub fn new(
        content: Arc<ContentSource>,
        scorer: Arc<PageScorer<ChatClient>>,
        cache: Arc<ReportCache>,
        queue: RescoreQueue,
        usage: UsageTracker,
    ) -> Self {
        Self {
            content,
            scorer,
            cache,
            queue,
            usage,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl PageScoreServer {
    #[tool(description = "Score a wiki page's content quality across bias, AI-generation likelihood, language, grammar and conciseness. Serves the cached report unless refresh is true.")]
    async fn get_page_score(
        &self,
        Parameters(params): Parameters<GetPageScoreParams>,
    ) -> Result<Json<ScoreReportResponse>, String> {
        let title = params.page.trim().to_string();
        if title.is_empty() {
            return Err("page must not be empty".to_string());
        }
        let refresh = params.refresh.unwrap_or(false);

        let page = self
            .content
            .fetch_page(&title)
            .await
            .map_err(|e| format!("content fetch failed: {e}"))?
            .ok_or_else(|| format!("page not found: {title}"))?;

        // Refresh bypasses the cached report entirely and always recomputes.
        if !refresh {
            if let Some(report) = self.cache.get_report(page.page_id).await {
                return Ok(Json(to_api_report(&report, true)));
            }
        }

        // A page with no body is a generation failure at this boundary; factor
        // query failures never surface here (they degrade to default scores).
        let report = self
            .scorer
            .score(&page)
            .await
            .map_err(|e| match e {
                AppError::NoContent(title) => {
                    AppError::GenerationFailed(format!("no scorable content for {title}"))
                }
                other => other,
            })
            .map_err(|e| e.to_string())?;
        self.cache.set_report(&report).await;

        Ok(Json(to_api_report(&report, false)))
    }

    #[tool(description = "Queue a background rescore of a wiki page. Returns immediately; the new report replaces the cached one when the recompute finishes.")]
    async fn rescore_page(
        &self,
        Parameters(params): Parameters<RescorePageParams>,
    ) -> Result<Json<RescoreQueuedResponse>, String> {
        let title = params.page.trim().to_string();
        if title.is_empty() {
            return Err("page must not be empty".to_string());
        }

        // Validate existence before queueing so callers get an immediate miss.
        self.content
            .fetch_page(&title)
            .await
            .map_err(|e| format!("content fetch failed: {e}"))?
            .ok_or_else(|| format!("page not found: {title}"))?;

        if !self.queue.enqueue(&title) {
            return Err("rescore worker is not running".to_string());
        }
        info!(page = %title, "rescore queued");

        Ok(Json(RescoreQueuedResponse { queued: true }))
    }

    #[tool(description = "Get chat-service usage aggregated per scoring factor (requests and failures).")]
    async fn get_usage_stats(&self) -> Result<Json<UsageStats>, String> {
        let stats = self.usage.get_usage_stats().await;
        Ok(Json(stats))
    }
}

fn to_api_report(report: &ScoreReport, cached: bool) -> ScoreReportResponse {
    ScoreReportResponse {
        page_id: report.page_id,
        page_title: report.page_title.clone(),
        overall_score: report.overall_score,
        factors: report
            .factors
            .iter()
            .map(|(factor, result)| FactorScoreEntry {
                factor: factor.name().to_string(),
                score: result.score,
                details: result.details.clone(),
            })
            .collect(),
        timestamp: report.timestamp,
        cached,
    }
}

#[tool_handler]
impl ServerHandler for PageScoreServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "page-score".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Wiki page quality scoring MCP server. Use get_page_score to fetch a page's \
quality report (bias, AI-generation likelihood, language, grammar, conciseness, plus a \
weighted overall score); pass refresh=true to bypass the cached report. Use rescore_page \
to recompute in the background, and get_usage_stats for chat-service call counters."
                    .to_string(),
            ),
        }
    }
}
