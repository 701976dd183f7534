/// Background rescore queue.
///
/// Tool handlers enqueue a page title and return immediately; a single worker
/// task fetches the page, recomputes its score with the cache bypassed, and
/// upserts the new report. One page's failure is logged and never kills the
/// worker loop.
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::ReportCache;
use crate::content::ContentSource;
use crate::error::AppError;
use crate::model::ScoreReport;
use crate::scorer::{FactorChat, PageScorer};

#[derive(Clone)]
pub struct RescoreQueue {
    tx: mpsc::UnboundedSender<String>,
}

impl RescoreQueue {
    /// Spawn the worker task and return the queue handle alongside it.
    pub fn start<C>(
        content: Arc<ContentSource>,
        scorer: Arc<PageScorer<C>>,
        cache: Arc<ReportCache>,
    ) -> (Self, JoinHandle<()>)
    where
        C: FactorChat + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let handle = tokio::spawn(async move {
            while let Some(title) = rx.recv().await {
                match rescore_one(&content, &scorer, &cache, &title).await {
                    Ok(report) => {
                        info!(page = %title, overall_score = report.overall_score, "page rescored")
                    }
                    Err(e) => warn!(page = %title, error = %e, "rescore failed"),
                }
            }
        });
        (Self { tx }, handle)
    }

    /// Enqueue a rescore. Never blocks; returns `false` if the worker has shut down.
    pub fn enqueue(&self, title: &str) -> bool {
        self.tx.send(title.to_string()).is_ok()
    }
}

async fn rescore_one<C: FactorChat>(
    content: &ContentSource,
    scorer: &PageScorer<C>,
    cache: &ReportCache,
    title: &str,
) -> Result<ScoreReport, AppError> {
    let page = content
        .fetch_page(title)
        .await?
        .ok_or_else(|| AppError::PageNotFound(title.to_string()))?;
    let report = scorer.score(&page).await?;
    cache.set_report(&report).await;
    Ok(report)
}
