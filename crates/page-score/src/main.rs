mod cache;
mod config;
mod content;
mod error;
mod format;
mod jobs;
mod model;
mod parser;
mod scorer;
mod server;

use std::sync::Arc;
use std::time::Duration;

use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

use score_common::chat::{ChatClient, ChatClientConfig};
use score_common::redis::RedisStore;
use score_common::usage::UsageTracker;

use cache::ReportCache;
use config::Config;
use content::ContentSource;
use jobs::RescoreQueue;
use model::ScoringProfile;
use scorer::PageScorer;
use server::PageScoreServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting page-score MCP server");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        wiki_api_url = %config.wiki_api_url,
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    // 2. Chat completion client
    let chat_config = ChatClientConfig::from_env();
    info!(
        base_url = %chat_config.base_url,
        timeout_ms = chat_config.default_timeout.as_millis(),
        max_retries = chat_config.max_retries,
        "chat client configured"
    );
    let chat = Arc::new(ChatClient::new(chat_config)?);

    // 3. Redis (optional — graceful degradation if unavailable)
    let redis = RedisStore::new(config.redis_url.as_deref());
    if redis.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without cached reports");
    }
    let cache = Arc::new(ReportCache::new(redis));
    let usage = UsageTracker::new(RedisStore::new(config.redis_url.as_deref()));

    // 4. Wiki content source
    let content = Arc::new(ContentSource::new(
        &config.wiki_api_url,
        Duration::from_secs(config.content_timeout_secs),
    )?);

    // 5. Scorer and background rescore worker
    let scorer = Arc::new(PageScorer::new(
        chat,
        ScoringProfile::default(),
        usage.clone(),
    ));
    let (queue, _worker) = RescoreQueue::start(
        Arc::clone(&content),
        Arc::clone(&scorer),
        Arc::clone(&cache),
    );

    // 6. Build MCP server and serve on stdio
    let server = PageScoreServer::new(content, scorer, cache, queue, usage);

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}
