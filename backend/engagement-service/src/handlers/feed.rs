/// Feed handler - the paginated global feed
use crate::config::Config;
use crate::error::Result;
use crate::services::FeedService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Fetch one feed page, newest first
/// GET /api/v1/posts?page&limit
pub async fn get_feed(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone(), config.feed.default_page_size);
    let page = service.fetch_page(query.page, query.limit).await?;

    Ok(HttpResponse::Ok().json(page))
}
