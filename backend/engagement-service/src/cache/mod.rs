/// Redis caching for engagement reads
///
/// Cache-aside for single posts plus short-TTL trending lists. The cache is
/// optional at runtime: every caller treats a cache failure as a miss and
/// falls through to the database, so losing Redis degrades latency, not
/// correctness.
use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::metrics::engagement::CACHE_EVENTS;
use crate::models::{PostView, TrendingPost};

/// Engagement cache manager using Redis
#[derive(Clone)]
pub struct EngagementCache {
    redis: ConnectionManager,
    post_ttl: Duration,
    trending_ttl: Duration,
}

impl EngagementCache {
    pub fn new(redis: ConnectionManager, post_ttl_secs: u64, trending_ttl_secs: u64) -> Self {
        Self {
            redis,
            post_ttl: Duration::from_secs(post_ttl_secs),
            trending_ttl: Duration::from_secs(trending_ttl_secs),
        }
    }

    fn post_key(post_id: Uuid) -> String {
        format!("post:v1:{}", post_id)
    }

    fn trending_key(strategy: &str) -> String {
        format!("trending:v1:{}", strategy)
    }

    /// Spread expirations so cached entries written together do not all
    /// expire in the same instant.
    fn jittered(ttl: Duration) -> u64 {
        let jitter = (rand::random::<u32>() % 10) as f64 / 100.0;
        let jitter_secs = (ttl.as_secs_f64() * jitter).round() as u64;
        ttl.as_secs() + jitter_secs
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<PostView>> {
        let key = Self::post_key(post_id);
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(data)) => {
                CACHE_EVENTS.with_label_values(&["hit"]).inc();
                serde_json::from_str::<PostView>(&data).map(Some).map_err(|e| {
                    error!("Failed to deserialize cached post: {}", e);
                    CACHE_EVENTS.with_label_values(&["error"]).inc();
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })
            }
            Ok(None) => {
                CACHE_EVENTS.with_label_values(&["miss"]).inc();
                Ok(None)
            }
            Err(e) => {
                warn!("Redis read error for post cache: {}", e);
                CACHE_EVENTS.with_label_values(&["error"]).inc();
                Err(AppError::CacheError(e.to_string()))
            }
        }
    }

    pub async fn cache_post(&self, post: &PostView) -> Result<()> {
        let key = Self::post_key(post.id);
        let data = serde_json::to_string(post)?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(&key, data, Self::jittered(self.post_ttl))
            .await
            .map_err(|e| {
                warn!("Failed to write post cache: {}", e);
                CACHE_EVENTS.with_label_values(&["error"]).inc();
                AppError::CacheError(e.to_string())
            })?;

        debug!(post_id = %post.id, "post cache WRITE");
        Ok(())
    }

    /// Drop a cached post after its counters change or the post is deleted.
    pub async fn invalidate_post(&self, post_id: Uuid) -> Result<()> {
        let key = Self::post_key(post_id);
        let mut conn = self.redis.clone();

        conn.del::<_, ()>(&key).await.map_err(|e| {
            warn!("Failed to invalidate post cache: {}", e);
            CACHE_EVENTS.with_label_values(&["error"]).inc();
            AppError::CacheError(e.to_string())
        })?;

        debug!(%post_id, "post cache INVALIDATE");
        Ok(())
    }

    pub async fn read_trending(&self, strategy: &str) -> Result<Option<Vec<TrendingPost>>> {
        let key = Self::trending_key(strategy);
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(data)) => {
                CACHE_EVENTS.with_label_values(&["hit"]).inc();
                serde_json::from_str::<Vec<TrendingPost>>(&data)
                    .map(Some)
                    .map_err(|e| {
                        error!("Failed to deserialize cached trending list: {}", e);
                        CACHE_EVENTS.with_label_values(&["error"]).inc();
                        AppError::Internal(format!("Cache deserialization error: {}", e))
                    })
            }
            Ok(None) => {
                CACHE_EVENTS.with_label_values(&["miss"]).inc();
                Ok(None)
            }
            Err(e) => {
                warn!("Redis read error for trending cache: {}", e);
                CACHE_EVENTS.with_label_values(&["error"]).inc();
                Err(AppError::CacheError(e.to_string()))
            }
        }
    }

    pub async fn write_trending(&self, strategy: &str, posts: &[TrendingPost]) -> Result<()> {
        let key = Self::trending_key(strategy);
        let data = serde_json::to_string(posts)?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(&key, data, Self::jittered(self.trending_ttl))
            .await
            .map_err(|e| {
                warn!("Failed to write trending cache: {}", e);
                CACHE_EVENTS.with_label_values(&["error"]).inc();
                AppError::CacheError(e.to_string())
            })?;

        debug!(%strategy, count = posts.len(), "trending cache WRITE");
        Ok(())
    }
}
