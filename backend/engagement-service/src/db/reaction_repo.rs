use crate::models::Reaction;
use sqlx::PgPool;
use uuid::Uuid;

/// Find the reaction for a (user, post) pair, if one was ever created
pub async fn find_reaction(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<Option<Reaction>, sqlx::Error> {
    let reaction = sqlx::query_as::<_, Reaction>(
        r#"
        SELECT id, user_id, post_id, liked, created_at, updated_at
        FROM reactions
        WHERE user_id = $1 AND post_id = $2
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(reaction)
}
