/// Reaction handlers - like toggle and like-status endpoints
use crate::error::Result;
use crate::handlers::posts::SharedCache;
use crate::middleware::UserId;
use crate::services::ReactionService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

fn reaction_service(pool: &PgPool, cache: &SharedCache) -> ReactionService {
    match cache {
        Some(cache) => ReactionService::with_cache(pool.clone(), cache.clone()),
        None => ReactionService::new(pool.clone()),
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub post_id: Uuid,
}

/// Toggle the caller's like on a post
/// POST /api/v1/reactions/toggle
pub async fn toggle_like(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedCache>,
    user_id: UserId,
    req: web::Json<ToggleRequest>,
) -> Result<HttpResponse> {
    let service = reaction_service(&pool, &cache);
    let result = service.toggle_like(user_id.0, req.post_id).await?;

    Ok(HttpResponse::Ok().json(result))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub post_id: Uuid,
}

/// Read the caller's like state for a post
/// GET /api/v1/reactions/status?post_id=
pub async fn like_status(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedCache>,
    user_id: UserId,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse> {
    let service = reaction_service(&pool, &cache);
    let status = service.get_like_status(user_id.0, query.post_id).await?;

    Ok(HttpResponse::Ok().json(status))
}
