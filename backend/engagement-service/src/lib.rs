/// Engagement Service Library
///
/// Handles posts, likes, comments, feed pagination, and trending ranking for
/// the Chirp micro-posting platform. Counter consistency under concurrent
/// interactions is the core concern: the reaction ledger and comment store
/// write through to the post counters atomically, and the trending views are
/// read-only over the post store.
///
/// # Modules
///
/// - `handlers`: Engagement-related HTTP request handlers
/// - `models`: Data structures for posts, reactions, comments
/// - `services`: Business logic layer
/// - `db`: Database access layer and repositories
/// - `cache`: Read caching and invalidation
/// - `middleware`: HTTP middleware for authentication and request metrics
/// - `auth`: JWT validation against the identity provider's public key
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
