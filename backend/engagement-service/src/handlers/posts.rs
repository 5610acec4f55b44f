/// Post handlers - HTTP endpoints for post operations
use crate::cache::EngagementCache;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::services::{DeletionService, PostService};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Cache handle registered at startup; `None` when Redis is unavailable.
pub type SharedCache = Option<Arc<EngagementCache>>;

fn post_service(pool: &PgPool, cache: &SharedCache) -> PostService {
    match cache {
        Some(cache) => PostService::with_cache(pool.clone(), cache.clone()),
        None => PostService::new(pool.clone()),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 280, message = "post text must be 1-280 characters"))]
    pub text: String,
}

/// Create a new post
pub async fn create_post(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedCache>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    // Trim inputs and validate with validator crate
    let req = CreatePostRequest {
        text: req.text.trim().to_string(),
    };
    if let Err(e) = req.validate() {
        return Err(AppError::ValidationError(e.to_string()));
    }

    let service = post_service(&pool, &cache);
    let post = service.create_post(user_id.0, &req.text).await?;

    Ok(HttpResponse::Created().json(post))
}

/// Get a post by ID
pub async fn get_post(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedCache>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = post_service(&pool, &cache);
    match service.get_post(*post_id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound("post not found".to_string())),
    }
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    15
}

/// Response for a user's post listing
#[derive(Debug, Serialize)]
pub struct UserPostsResponse {
    pub posts: Vec<crate::models::PostView>,
    pub total_count: i64,
    pub has_more: bool,
}

/// Get posts authored by a user
/// GET /api/v1/posts/user/{user_id}
pub async fn get_user_posts(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedCache>,
    path: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let service = post_service(&pool, &cache);

    let (posts, total) = service
        .get_user_posts(user_id, query.page, query.limit)
        .await?;

    let has_more = query.page * query.limit < total;

    Ok(HttpResponse::Ok().json(UserPostsResponse {
        posts,
        total_count: total,
        has_more,
    }))
}

/// Delete a post together with its comments and reactions
pub async fn delete_post(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedCache>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = match cache.get_ref() {
        Some(cache) => DeletionService::with_cache((**pool).clone(), cache.clone()),
        None => DeletionService::new((**pool).clone()),
    };

    service.delete_post(user_id.0, *post_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
