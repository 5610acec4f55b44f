/// Reaction service - the like toggle and like-status reads
///
/// The reaction ledger is the source of truth for per-user like state; the
/// post row's `like_count` is the denormalized aggregate. Both are written in
/// one transaction so no observable state has them disagree.
use crate::cache::EngagementCache;
use crate::db::{post_repo, reaction_repo, user_repo};
use crate::error::{AppError, Result};
use crate::metrics::engagement::TOGGLE_TOTAL;
use crate::models::{LikeStatus, ToggleResult};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub struct ReactionService {
    pool: PgPool,
    cache: Option<Arc<EngagementCache>>,
}

impl ReactionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, cache: None }
    }

    pub fn with_cache(pool: PgPool, cache: Arc<EngagementCache>) -> Self {
        Self {
            pool,
            cache: Some(cache),
        }
    }

    /// Toggle the caller's like on a post.
    ///
    /// First toggle creates the reaction row with `liked = true`; every later
    /// toggle flips it in place. The upsert takes a row lock on the pair, so
    /// concurrent toggles from the same user serialize and each applies
    /// exactly one counter delta. The counter update is a single-statement
    /// in-database increment, never a read-modify-write.
    pub async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> Result<ToggleResult> {
        user_repo::find_user_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        let mut tx = self.pool.begin().await?;

        let liked: bool = sqlx::query_scalar(
            r#"
            INSERT INTO reactions (user_id, post_id, liked)
            VALUES ($1, $2, TRUE)
            ON CONFLICT ON CONSTRAINT reactions_user_post_key
            DO UPDATE SET liked = NOT reactions.liked, updated_at = NOW()
            RETURNING liked
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await?;

        let delta: i64 = if liked { 1 } else { -1 };

        let like_count: i64 = sqlx::query_scalar(
            r#"
            UPDATE posts
            SET like_count = GREATEST(like_count + $2, 0)
            WHERE id = $1
            RETURNING like_count
            "#,
        )
        .bind(post_id)
        .bind(delta)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        tx.commit().await?;

        let outcome = if liked { "liked" } else { "unliked" };
        TOGGLE_TOTAL.with_label_values(&[outcome]).inc();
        tracing::info!(%user_id, %post_id, liked, like_count, "like toggled");

        // Invalidate after commit (fire-and-forget, not transactional)
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.invalidate_post(post_id).await {
                tracing::debug!(%post_id, "post cache invalidation failed: {}", err);
            }
        }

        Ok(ToggleResult { liked, like_count })
    }

    /// Read-only like state for the caller on a post.
    ///
    /// `like_count` comes from the post row's authoritative counter; the
    /// ledger is never scanned on the read path.
    pub async fn get_like_status(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeStatus> {
        user_repo::find_user_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        let reaction = reaction_repo::find_reaction(&self.pool, user_id, post_id).await?;

        Ok(LikeStatus {
            is_liked: reaction.map(|r| r.liked).unwrap_or(false),
            like_count: post.like_count,
        })
    }
}
