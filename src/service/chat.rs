use chrono::Utc;
use uuid::Uuid;

use crate::{
    db,
    dto::{NewGroupMessageRequest, NewMessageRequest},
    errors::ApiError,
    models::{Message, MessageWithSender},
    PGPool,
};

/// Conversation id for a direct chat: both participant ids as strings, sorted,
/// joined with a comma. Computable from either side without a lookup table.
pub fn composed_id(a: &Uuid, b: &Uuid) -> String {
    let mut pair = [a.to_string(), b.to_string()];
    pair.sort();
    pair.join(",")
}

pub async fn send_direct(dto: NewMessageRequest, pool: &PGPool) -> Result<Message, ApiError> {
    let message = Message {
        id: Uuid::new_v4(),
        composed_id: composed_id(&dto.sender_id, &dto.receiver_id),
        text: dto.text,
        sender_id: dto.sender_id,
        created_at: Utc::now(),
    };
    db::message::create(&message, pool).await?;
    Ok(message)
}

pub async fn direct_history(
    a: Uuid,
    b: Uuid,
    pool: &PGPool,
) -> Result<Vec<MessageWithSender>, ApiError> {
    Ok(db::message::history(&composed_id(&a, &b), pool).await?)
}

/// Group chats reuse the group id as the composed id in the same table.
pub async fn send_group(
    dto: NewGroupMessageRequest,
    pool: &PGPool,
) -> Result<Message, ApiError> {
    let message = Message {
        id: Uuid::new_v4(),
        composed_id: dto.composed_id,
        text: dto.text,
        sender_id: dto.sender_id,
        created_at: Utc::now(),
    };
    db::message::create(&message, pool).await?;
    Ok(message)
}

pub async fn group_history(
    group_id: Uuid,
    pool: &PGPool,
) -> Result<Vec<MessageWithSender>, ApiError> {
    Ok(db::message::history(&group_id.to_string(), pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composed_id_is_order_independent() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        assert_eq!(composed_id(&x, &y), composed_id(&y, &x));
    }

    #[test]
    fn composed_id_sorts_and_joins_with_a_comma() {
        let a: Uuid = "11111111-1111-1111-1111-111111111111".parse().unwrap();
        let b: Uuid = "22222222-2222-2222-2222-222222222222".parse().unwrap();
        let id = composed_id(&b, &a);
        assert_eq!(
            id,
            "11111111-1111-1111-1111-111111111111,22222222-2222-2222-2222-222222222222"
        );
    }

    #[test]
    fn chatting_with_yourself_still_yields_a_stable_id() {
        let x = Uuid::new_v4();
        assert_eq!(composed_id(&x, &x), format!("{},{}", x, x));
    }
}
