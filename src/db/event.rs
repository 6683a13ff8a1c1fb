use sqlx::postgres::PgQueryResult;
use uuid::Uuid;

use crate::{
    dto::UpdateEventRequest,
    models::{Event, EventParticipant},
    PGPool,
};

pub async fn create(event: &Event, pool: &PGPool) -> Result<PgQueryResult, sqlx::Error> {
    sqlx::query(
        "INSERT INTO events (id, creator, event_name, event_type, start_date, end_date, \
         location, description, is_private) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(event.id)
    .bind(event.creator)
    .bind(&event.event_name)
    .bind(event.event_type)
    .bind(event.start_date)
    .bind(event.end_date)
    .bind(&event.location)
    .bind(&event.description)
    .bind(event.is_private)
    .execute(pool)
    .await
}

pub async fn find_by_id(id: Uuid, pool: &PGPool) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn public_events(pool: &PGPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE is_private = false")
        .fetch_all(pool)
        .await
}

pub async fn created_by(user_id: Uuid, pool: &PGPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE creator = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn participated_by(user_id: Uuid, pool: &PGPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        "SELECT * FROM events WHERE id IN \
         (SELECT event_id FROM event_participants WHERE user_id = $1)",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn update(
    id: Uuid,
    fields: &UpdateEventRequest,
    pool: &PGPool,
) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        "UPDATE events SET creator = $2, event_name = $3, event_type = $4, start_date = $5, \
         end_date = $6, location = $7, description = $8, is_private = $9 \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(fields.creator)
    .bind(&fields.event_name)
    .bind(fields.event_type)
    .bind(fields.start_date)
    .bind(fields.end_date)
    .bind(&fields.location)
    .bind(&fields.description)
    .bind(fields.is_private)
    .fetch_optional(pool)
    .await
}

/// Removes the participant rows and the event inside one transaction, so a
/// crash cannot leave orphaned participants behind.
pub async fn delete_with_participants(
    id: Uuid,
    pool: &PGPool,
) -> Result<Option<Event>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM event_participants WHERE event_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query_as::<_, Event>("DELETE FROM events WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(deleted)
}

pub async fn participants_of(
    event_id: Uuid,
    pool: &PGPool,
) -> Result<Vec<EventParticipant>, sqlx::Error> {
    sqlx::query_as::<_, EventParticipant>(
        "SELECT * FROM event_participants WHERE event_id = $1",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}

pub async fn participants_of_events(
    event_ids: &[Uuid],
    pool: &PGPool,
) -> Result<Vec<EventParticipant>, sqlx::Error> {
    sqlx::query_as::<_, EventParticipant>(
        "SELECT * FROM event_participants WHERE event_id = ANY($1)",
    )
    .bind(event_ids)
    .fetch_all(pool)
    .await
}

pub async fn is_participant(
    event_id: Uuid,
    user_id: Uuid,
    pool: &PGPool,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM event_participants WHERE event_id = $1 AND user_id = $2)",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn add_participant(
    event_id: Uuid,
    user_id: Uuid,
    pool: &PGPool,
) -> Result<EventParticipant, sqlx::Error> {
    sqlx::query("INSERT INTO event_participants (user_id, event_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(EventParticipant { user_id, event_id })
}

pub async fn remove_participant(
    event_id: Uuid,
    user_id: Uuid,
    pool: &PGPool,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM event_participants WHERE event_id = $1 AND user_id = $2")
        .bind(event_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
