use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

/// Find a user by ID. Users are provisioned by the identity provider; this
/// service never writes them.
pub async fn find_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
