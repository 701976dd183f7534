/// Redis-backed counters for chat-service usage, aggregated per scoring factor.
///
/// Purely observational: every factor query increments a request counter, failed
/// queries additionally increment a failure counter. When Redis is absent the
/// counters silently no-op and stats read back empty.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::redis::RedisStore;

const USAGE_KEY: &str = "pgs:v1:usage";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UsageStats {
    pub factors: Vec<FactorUsageStats>,
    pub redis_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FactorUsageStats {
    pub factor: String,
    pub requests: u64,
    pub failures: u64,
}

#[derive(Clone)]
pub struct UsageTracker {
    redis: RedisStore,
}

impl UsageTracker {
    pub fn new(redis: RedisStore) -> Self {
        Self { redis }
    }

    pub async fn record(&self, factor: &str, ok: bool) {
        let _ = self
            .redis
            .hincr_by(USAGE_KEY, &format!("requests:{factor}"), 1)
            .await;
        if !ok {
            let _ = self
                .redis
                .hincr_by(USAGE_KEY, &format!("failures:{factor}"), 1)
                .await;
        }
    }

    pub async fn get_usage_stats(&self) -> UsageStats {
        let redis_available = self.redis.is_available().await;
        let Some(entries) = self.redis.hgetall(USAGE_KEY).await else {
            return UsageStats {
                factors: vec![],
                redis_available,
            };
        };

        let mut by_factor: std::collections::HashMap<String, FactorUsageStats> =
            std::collections::HashMap::new();

        for (field, value) in entries {
            let Some((kind, factor)) = field.split_once(':') else {
                continue;
            };
            let stat = by_factor
                .entry(factor.to_string())
                .or_insert(FactorUsageStats {
                    factor: factor.to_string(),
                    requests: 0,
                    failures: 0,
                });

            let parsed = value.parse::<u64>().unwrap_or(0);
            match kind {
                "requests" => stat.requests = parsed,
                "failures" => stat.failures = parsed,
                _ => {}
            }
        }

        let mut factors: Vec<FactorUsageStats> = by_factor.into_values().collect();
        factors.sort_by(|a, b| a.factor.cmp(&b.factor));
        UsageStats {
            factors,
            redis_available,
        }
    }
}
