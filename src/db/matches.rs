use uuid::Uuid;

use crate::{models::Match, PGPool};

/// Lookup of the exact directional pair; mutuality always takes two of these.
pub async fn find(
    user_a: Uuid,
    user_b: Uuid,
    pool: &PGPool,
) -> Result<Option<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE user_a = $1 AND user_b = $2")
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(pool)
        .await
}

pub async fn find_all(
    user_a: Uuid,
    user_b: Uuid,
    pool: &PGPool,
) -> Result<Vec<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE user_a = $1 AND user_b = $2")
        .bind(user_a)
        .bind(user_b)
        .fetch_all(pool)
        .await
}

pub async fn create(m: &Match, pool: &PGPool) -> Result<Match, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        "INSERT INTO matches (user_a, user_b, result, match_date) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(m.user_a)
    .bind(m.user_b)
    .bind(m.result)
    .bind(m.match_date)
    .fetch_one(pool)
    .await
}

pub async fn delete(
    user_a: Uuid,
    user_b: Uuid,
    pool: &PGPool,
) -> Result<Option<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        "DELETE FROM matches WHERE user_a = $1 AND user_b = $2 RETURNING *",
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_optional(pool)
    .await
}

pub async fn of_user(user_a: Uuid, pool: &PGPool) -> Result<Vec<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE user_a = $1")
        .bind(user_a)
        .fetch_all(pool)
        .await
}
