use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{NewUserRecord, UserRecord};

/// Insert the user, or refresh their profile fields if the identity id is already known.
pub async fn upsert_user(user: NewUserRecord, conn: &mut SqliteConnection) -> Result<UserRecord, sqlx::Error> {
    let record = sqlx::query_as(
        r#"
            INSERT INTO users (discord_id, username, avatar, global_name, discriminator)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (discord_id) DO UPDATE SET
                username = excluded.username,
                avatar = excluded.avatar,
                global_name = excluded.global_name,
                discriminator = excluded.discriminator,
                updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(user.discord_id)
    .bind(user.username)
    .bind(user.avatar)
    .bind(user.global_name)
    .bind(user.discriminator)
    .fetch_one(conn)
    .await?;
    trace!("📝️ User record refreshed");
    Ok(record)
}

pub async fn fetch_user(discord_id: &str, conn: &mut SqliteConnection) -> Result<Option<UserRecord>, sqlx::Error> {
    let user =
        sqlx::query_as("SELECT * FROM users WHERE discord_id = $1").bind(discord_id).fetch_optional(conn).await?;
    Ok(user)
}
