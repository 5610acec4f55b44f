/// Deletion service - cascading post removal
///
/// Comments, reactions, and the post itself are removed as one transaction;
/// a failure at any step rolls the whole cascade back so no orphaned
/// dependents (or dangling counters) are ever observable.
use crate::cache::EngagementCache;
use crate::db::post_repo;
use crate::error::{AppError, Result};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub struct DeletionService {
    pool: PgPool,
    cache: Option<Arc<EngagementCache>>,
}

impl DeletionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, cache: None }
    }

    pub fn with_cache(pool: PgPool, cache: Arc<EngagementCache>) -> Self {
        Self {
            pool,
            cache: Some(cache),
        }
    }

    /// Delete a post and everything referencing it. Only the author may
    /// delete a post.
    pub async fn delete_post(&self, requesting_user_id: Uuid, post_id: Uuid) -> Result<()> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        if post.user_id != requesting_user_id {
            return Err(AppError::Forbidden(
                "only the author may delete a post".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM reactions WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(requesting_user_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            // Post vanished mid-flight; the dropped transaction rolls the
            // dependent deletes back.
            return Err(AppError::NotFound("post not found".to_string()));
        }

        tx.commit().await?;

        tracing::info!(%post_id, user_id = %requesting_user_id, "post deleted with dependents");

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.invalidate_post(post_id).await {
                tracing::debug!(%post_id, "post cache invalidation failed: {}", err);
            }
        }

        Ok(())
    }
}
