/// Trending handlers - the three ranked views
use crate::config::Config;
use crate::error::Result;
use crate::handlers::posts::SharedCache;
use crate::services::TrendingService;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

fn trending_service(pool: &PgPool, cache: &SharedCache, config: &Config) -> TrendingService {
    match cache {
        Some(cache) => {
            TrendingService::with_cache(pool.clone(), cache.clone(), config.trending.clone())
        }
        None => TrendingService::new(pool.clone(), config.trending.clone()),
    }
}

/// Response for a trending listing
#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub posts: Vec<crate::models::TrendingPost>,
}

/// Most-liked posts
/// GET /api/v1/trending/likes
pub async fn trending_likes(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedCache>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let service = trending_service(&pool, &cache, &config);
    let posts = service.top_by_likes().await?;

    Ok(HttpResponse::Ok().json(TrendingResponse { posts }))
}

/// Most-discussed posts
/// GET /api/v1/trending/comments
pub async fn trending_comments(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedCache>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let service = trending_service(&pool, &cache, &config);
    let posts = service.top_by_comments().await?;

    Ok(HttpResponse::Ok().json(TrendingResponse { posts }))
}

/// Top posts by time-decayed engagement score
/// GET /api/v1/trending/engagement
pub async fn trending_engagement(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedCache>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let service = trending_service(&pool, &cache, &config);
    let posts = service.top_by_engagement().await?;

    Ok(HttpResponse::Ok().json(TrendingResponse { posts }))
}
