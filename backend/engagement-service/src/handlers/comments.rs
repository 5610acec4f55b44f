/// Comment handlers - HTTP endpoints for comment operations
use crate::error::{AppError, Result};
use crate::handlers::posts::SharedCache;
use crate::middleware::UserId;
use crate::services::CommentService;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

fn comment_service(pool: &PgPool, cache: &SharedCache) -> CommentService {
    match cache {
        Some(cache) => CommentService::with_cache(pool.clone(), cache.clone()),
        None => CommentService::new(pool.clone()),
    }
}

/// Request body for creating a comment
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    #[validate(length(min = 1, max = 500, message = "comment text must be 1-500 characters"))]
    pub content: String,
}

/// Create a new comment
/// POST /api/v1/comments
pub async fn create_comment(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedCache>,
    user_id: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    // Trim inputs and validate with validator crate
    let req = CreateCommentRequest {
        post_id: req.post_id,
        content: req.content.trim().to_string(),
    };
    if let Err(e) = req.validate() {
        return Err(AppError::ValidationError(e.to_string()));
    }

    let service = comment_service(&pool, &cache);
    let comment = service
        .add_comment(user_id.0, req.post_id, &req.content)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub post_id: Uuid,
}

/// Response for a post's comment listing
#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<crate::models::CommentView>,
}

/// Get all comments for a post, newest first
/// GET /api/v1/comments?post_id=
pub async fn list_comments(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedCache>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let service = comment_service(&pool, &cache);
    let comments = service.list_comments(query.post_id).await?;

    Ok(HttpResponse::Ok().json(CommentListResponse { comments }))
}
