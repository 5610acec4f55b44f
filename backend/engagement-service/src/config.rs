/// Configuration management for Engagement Service
///
/// This module handles loading and managing configuration from environment
/// variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Cache (Redis) configuration
    pub cache: CacheConfig,
    /// Feed pagination configuration
    pub feed: FeedConfig,
    /// Trending ranking configuration
    pub trending: TrendingConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
    /// Min idle connections kept in pool
    pub min_connections: u32,
    /// Timeout for acquiring a connection from the pool, in seconds
    pub acquire_timeout_secs: u64,
}

/// Cache (Redis) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis URL
    pub url: String,
    /// TTL for cached posts, in seconds
    pub post_ttl_secs: u64,
    /// TTL for cached trending lists, in seconds
    pub trending_ttl_secs: u64,
}

/// Feed pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Page size used when the caller does not pass `limit`
    pub default_page_size: i64,
}

/// Trending ranking configuration (weights, candidate limits)
///
/// The like/comment weights and the `(hours + 1)` decay are compatibility
/// constants; keep the defaults unless the ranking is being redesigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingConfig {
    pub like_weight: f64,
    pub comment_weight: f64,
    /// Newest-N candidate window scored per engagement request
    pub max_candidates: i64,
    /// Ranked results returned per strategy
    pub result_limit: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("ENGAGEMENT_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("ENGAGEMENT_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8084),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/chirp".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
                min_connections: std::env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(2),
                acquire_timeout_secs: std::env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            cache: CacheConfig {
                url: std::env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
                post_ttl_secs: std::env::var("CACHE_POST_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(120),
                trending_ttl_secs: std::env::var("CACHE_TRENDING_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            },
            feed: FeedConfig {
                default_page_size: std::env::var("FEED_DEFAULT_PAGE_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(15),
            },
            trending: TrendingConfig {
                like_weight: parse_env_or_default("TRENDING_LIKE_WEIGHT", 0.6)?,
                comment_weight: parse_env_or_default("TRENDING_COMMENT_WEIGHT", 0.4)?,
                max_candidates: std::env::var("TRENDING_MAX_CANDIDATES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1_000),
                result_limit: std::env::var("TRENDING_RESULT_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            },
        })
    }
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            like_weight: 0.6,
            comment_weight: 0.4,
            max_candidates: 1_000,
            result_limit: 10,
        }
    }
}

fn parse_env_or_default(key: &str, default: f64) -> Result<f64, String> {
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trending_defaults_preserve_ranking_constants() {
        let cfg = TrendingConfig::default();
        assert_eq!(cfg.like_weight, 0.6);
        assert_eq!(cfg.comment_weight, 0.4);
        assert_eq!(cfg.result_limit, 10);
    }

    #[test]
    fn parse_env_or_default_rejects_garbage() {
        std::env::set_var("ENGAGEMENT_TEST_WEIGHT_GARBAGE", "not-a-float");
        assert!(parse_env_or_default("ENGAGEMENT_TEST_WEIGHT_GARBAGE", 0.5).is_err());
        std::env::remove_var("ENGAGEMENT_TEST_WEIGHT_GARBAGE");

        assert_eq!(
            parse_env_or_default("ENGAGEMENT_TEST_WEIGHT_UNSET", 0.5),
            Ok(0.5)
        );
    }
}
