use sqlx::postgres::PgQueryResult;
use uuid::Uuid;

use crate::{dto::UpdateUserRequest, models::User, PGPool};

pub async fn create(user: &User, pool: &PGPool) -> Result<PgQueryResult, sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, firstname, lastname, email, date_of_birth, created_at, username, \
         bio, gender, city, state, password_hash, genre_preferences, image, top_track_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
    )
    .bind(user.id)
    .bind(&user.firstname)
    .bind(&user.lastname)
    .bind(&user.email)
    .bind(user.date_of_birth)
    .bind(user.created_at)
    .bind(&user.username)
    .bind(&user.bio)
    .bind(&user.gender)
    .bind(&user.city)
    .bind(&user.state)
    .bind(&user.password_hash)
    .bind(&user.genre_preferences)
    .bind(&user.image)
    .bind(&user.top_track_id)
    .execute(pool)
    .await
}

pub async fn find_by_id(id: Uuid, pool: &PGPool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(email: &str, pool: &PGPool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn username_exists(username: &str, pool: &PGPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(pool)
        .await
}

pub async fn get_all(pool: &PGPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
        .fetch_all(pool)
        .await
}

/// Full replacement of the mutable profile fields; absent request fields
/// become NULL.
pub async fn update(
    id: Uuid,
    fields: &UpdateUserRequest,
    pool: &PGPool,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET firstname = $2, lastname = $3, city = $4, state = $5, email = $6, \
         gender = $7, username = $8, bio = $9, password_hash = $10, genre_preferences = $11, \
         top_track_id = $12 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&fields.firstname)
    .bind(&fields.lastname)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.email)
    .bind(&fields.gender)
    .bind(&fields.username)
    .bind(&fields.bio)
    .bind(&fields.password_hash)
    .bind(&fields.genre_preferences)
    .bind(&fields.top_track_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn set_image(id: Uuid, filename: &str, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE users SET image = $2 WHERE id = $1")
        .bind(id)
        .bind(filename)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
