/// Redis store wrapper with graceful degradation.
///
/// All operations return `Option<T>` or `bool` — on any Redis error, the operation
/// logs a warning and degrades. Callers fall through to compute from source or skip
/// the write. The service is fully functional without Redis; it just recomputes
/// every report.
use redis::AsyncCommands;
use tracing::warn;

#[derive(Clone)]
pub struct RedisStore {
    client: Option<redis::Client>,
}

impl RedisStore {
    /// Attempt to create a client. If the URL is `None` or invalid, returns a
    /// `RedisStore` that always degrades gracefully (no-ops).
    pub fn new(url: Option<&str>) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "failed to create redis client, store disabled"))
                .ok()
        });
        Self { client }
    }

    /// Test the connection by sending a PING. Returns `true` if Redis is reachable.
    pub async fn is_available(&self) -> bool {
        let Some(client) = &self.client else {
            return false;
        };
        match client.get_multiplexed_async_connection().await {
            Ok(mut conn) => {
                let result: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
                result.is_ok()
            }
            Err(_) => false,
        }
    }

    /// Get a value. Returns `None` if Redis is unavailable or the key doesn't exist.
    pub async fn get(&self, key: &str) -> Option<String> {
        let client = self.client.as_ref()?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()?;
        let value: Option<String> = conn
            .get(key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis GET failed"))
            .ok()?;
        value
    }

    /// Set a value with no expiry. An unconditional SET, so the last writer wins.
    /// Returns `true` if successful.
    pub async fn set(&self, key: &str, value: &str) -> bool {
        let Some(client) = &self.client else {
            return false;
        };
        let Ok(mut conn) = client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
        else {
            return false;
        };
        conn.set::<_, _, ()>(key, value)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis SET failed"))
            .is_ok()
    }

    /// Increment a hash field by `delta`. Returns `true` if successful.
    pub async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> bool {
        let Some(client) = &self.client else {
            return false;
        };
        let Ok(mut conn) = client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
        else {
            return false;
        };
        conn.hincr::<_, _, _, i64>(key, field, delta)
            .await
            .inspect_err(|e| warn!(error = %e, key, field, "redis HINCRBY failed"))
            .is_ok()
    }

    /// Read all fields of a hash. Returns `None` if Redis is unavailable.
    pub async fn hgetall(&self, key: &str) -> Option<std::collections::HashMap<String, String>> {
        let client = self.client.as_ref()?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()?;
        conn.hgetall(key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis HGETALL failed"))
            .ok()
    }
}
