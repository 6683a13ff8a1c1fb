use uuid::Uuid;

use crate::{models::SpotifyAuthInfo, PGPool};

pub async fn find_by_user(
    user_id: Uuid,
    pool: &PGPool,
) -> Result<Option<SpotifyAuthInfo>, sqlx::Error> {
    sqlx::query_as::<_, SpotifyAuthInfo>("SELECT * FROM spotify_auth_info WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_all(pool: &PGPool) -> Result<Vec<SpotifyAuthInfo>, sqlx::Error> {
    sqlx::query_as::<_, SpotifyAuthInfo>("SELECT * FROM spotify_auth_info")
        .fetch_all(pool)
        .await
}

pub async fn create(info: &SpotifyAuthInfo, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO spotify_auth_info (access_token, token_type, scope, expires_in, \
         expires_timestamp, refresh_token, user_id) VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&info.access_token)
    .bind(&info.token_type)
    .bind(&info.scope)
    .bind(info.expires_in)
    .bind(info.expires_timestamp)
    .bind(&info.refresh_token)
    .bind(info.user_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

pub async fn update_access_token(
    user_id: Uuid,
    access_token: &str,
    expires_timestamp: i64,
    pool: &PGPool,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "UPDATE spotify_auth_info SET access_token = $2, expires_timestamp = $3 WHERE user_id = $1",
    )
    .bind(user_id)
    .bind(access_token)
    .bind(expires_timestamp)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

pub async fn delete_by_user(user_id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM spotify_auth_info WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
