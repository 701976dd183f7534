/// Redis persistence for score reports.
///
/// Key schema: `pgs:v1:report:{page_id}` — JSON-serialized ScoreReport, no TTL.
/// Staleness is the caller's decision (explicit refresh recomputes); the cache
/// itself never expires entries. Writes are unconditional SETs, so concurrent
/// scoring of the same page converges to last-write-wins. A corrupt stored
/// entry reads as a miss, never as an error.
use tracing::warn;

use score_common::redis::RedisStore;

use crate::model::ScoreReport;

const KEY_PREFIX: &str = "pgs:v1:";

pub struct ReportCache {
    redis: RedisStore,
}

impl ReportCache {
    pub fn new(redis: RedisStore) -> Self {
        Self { redis }
    }

    /// Most recently stored report for the page, or `None` on miss, corrupt
    /// data, or unavailable Redis.
    pub async fn get_report(&self, page_id: u64) -> Option<ScoreReport> {
        let key = report_key(page_id);
        let json = self.redis.get(&key).await?;
        serde_json::from_str(&json)
            .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed, treating as miss"))
            .ok()
    }

    /// Upsert: exactly one stored report per page id.
    pub async fn set_report(&self, report: &ScoreReport) {
        let key = report_key(report.page_id);
        if let Ok(json) = serde_json::to_string(report) {
            self.redis.set(&key, &json).await;
        }
    }
}

fn report_key(page_id: u64) -> String {
    format!("{KEY_PREFIX}report:{page_id}")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::model::{Factor, ScoreFactor};

    use super::*;

    fn report(page_id: u64, overall: u8) -> ScoreReport {
        let factors: BTreeMap<Factor, ScoreFactor> = Factor::ALL
            .iter()
            .map(|f| {
                (
                    *f,
                    ScoreFactor {
                        score: overall,
                        details: "<p>ok</p>".to_string(),
                    },
                )
            })
            .collect();
        ScoreReport {
            overall_score: overall,
            factors,
            timestamp: 1_700_000_000,
            page_id,
            page_title: "Cached Page".to_string(),
        }
    }

    #[test]
    fn test_report_key_schema() {
        assert_eq!(report_key(42), "pgs:v1:report:42");
    }

    #[tokio::test]
    async fn test_missing_redis_reads_as_miss() {
        let cache = ReportCache::new(RedisStore::new(None));
        assert!(cache.get_report(1).await.is_none());
        // Writes silently no-op.
        cache.set_report(&report(1, 80)).await;
        assert!(cache.get_report(1).await.is_none());
    }

    #[test]
    fn test_corrupt_entry_is_unparseable() {
        // What get_report would read back from a corrupt row.
        let parsed: Result<ScoreReport, _> = serde_json::from_str("{\"overall_score\": ");
        assert!(parsed.is_err());
    }

    /// Integration test against a live Redis; skipped when REDIS_URL is unset.
    #[tokio::test]
    async fn test_put_get_round_trip_and_last_write_wins() {
        let Ok(url) = std::env::var("REDIS_URL") else {
            eprintln!("skipping test_put_get_round_trip_and_last_write_wins: REDIS_URL not set");
            return;
        };
        let cache = ReportCache::new(RedisStore::new(Some(&url)));

        let first = report(990_001, 64);
        cache.set_report(&first).await;
        assert_eq!(cache.get_report(990_001).await, Some(first));

        // Second put on the same page id replaces, never accumulates.
        let second = report(990_001, 91);
        cache.set_report(&second).await;
        assert_eq!(cache.get_report(990_001).await, Some(second));
    }
}
