use crate::{
    models::{Message, MessageWithSender},
    PGPool,
};

pub async fn create(message: &Message, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO messages (id, composed_id, text, sender_id, created_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(message.id)
    .bind(&message.composed_id)
    .bind(&message.text)
    .bind(message.sender_id)
    .bind(message.created_at)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

/// Full history for a conversation, oldest first, with the sender's username
/// joined onto every row.
pub async fn history(
    composed_id: &str,
    pool: &PGPool,
) -> Result<Vec<MessageWithSender>, sqlx::Error> {
    sqlx::query_as::<_, MessageWithSender>(
        "SELECT m.id, m.composed_id, m.text, m.sender_id, m.created_at, \
         u.username AS sender_username \
         FROM messages m JOIN users u ON u.id = m.sender_id \
         WHERE m.composed_id = $1 ORDER BY m.created_at ASC",
    )
    .bind(composed_id)
    .fetch_all(pool)
    .await
}
