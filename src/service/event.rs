use uuid::Uuid;

use crate::{
    db,
    dto::{CreateEventRequest, EventWithParticipants, PublicEvents, UpdateEventRequest},
    errors::ApiError,
    models::Event,
    service::auth::AuthenticatedUser,
    PGPool,
};

pub async fn public_listing(pool: &PGPool) -> Result<PublicEvents, ApiError> {
    let events = db::event::public_events(pool).await?;
    if events.is_empty() {
        return Err(ApiError::NotFound("No public events found".to_string()));
    }
    let event_ids: Vec<Uuid> = events.iter().map(|event| event.id).collect();
    let participants = db::event::participants_of_events(&event_ids, pool).await?;
    Ok(PublicEvents {
        events,
        participants,
    })
}

pub async fn get(id: Uuid, pool: &PGPool) -> Result<EventWithParticipants, ApiError> {
    let event = db::event::find_by_id(id, pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;
    let participants = db::event::participants_of(id, pool).await?;
    Ok(EventWithParticipants {
        event,
        participants,
    })
}

/// Union of events the user created and events they participate in,
/// de-duplicated by id.
pub async fn list_for_user(user_id: Uuid, pool: &PGPool) -> Result<Vec<Event>, ApiError> {
    let created = db::event::created_by(user_id, pool).await?;
    let participated = db::event::participated_by(user_id, pool).await?;

    let mut all = created;
    for event in participated {
        if !all.iter().any(|existing| existing.id == event.id) {
            all.push(event);
        }
    }
    if all.is_empty() {
        return Err(ApiError::NotFound("Events not found".to_string()));
    }
    Ok(all)
}

pub async fn create(dto: CreateEventRequest, pool: &PGPool) -> Result<Event, ApiError> {
    let event = Event {
        id: Uuid::new_v4(),
        creator: dto.creator,
        event_name: dto.event_name,
        event_type: dto.event_type,
        start_date: dto.start_date,
        end_date: dto.end_date,
        location: dto.location,
        description: dto.description,
        is_private: dto.is_private,
    };
    db::event::create(&event, pool).await?;
    Ok(event)
}

pub async fn update(
    id: Uuid,
    dto: UpdateEventRequest,
    pool: &PGPool,
) -> Result<Event, ApiError> {
    if db::event::find_by_id(id, pool).await?.is_none() {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }
    db::event::update(id, &dto, pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))
}

pub async fn delete(id: Uuid, pool: &PGPool) -> Result<Event, ApiError> {
    db::event::delete_with_participants(id, pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))
}

/// Private events only admit users who already hold a participant row (the
/// invite); joining twice stays a no-op.
pub async fn join(
    event_id: Uuid,
    user: &AuthenticatedUser,
    pool: &PGPool,
) -> Result<&'static str, ApiError> {
    let event = db::event::find_by_id(event_id, pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let already_participant = db::event::is_participant(event_id, user.id, pool).await?;
    if event.is_private && !already_participant {
        return Err(ApiError::Forbidden(
            "You need an invitation to join this private event".to_string(),
        ));
    }
    if already_participant {
        return Ok("Already joined the event");
    }
    db::event::add_participant(event_id, user.id, pool).await?;
    Ok("Successfully joined the event")
}

/// An invite is simply a pre-created participant row; only the event creator
/// may write it.
pub async fn invite(
    event_id: Uuid,
    invited_user_id: Uuid,
    caller: &AuthenticatedUser,
    pool: &PGPool,
) -> Result<&'static str, ApiError> {
    let event = db::event::find_by_id(event_id, pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;
    if event.creator != caller.id {
        return Err(ApiError::Forbidden(
            "You are not the creator of the event".to_string(),
        ));
    }
    if db::event::is_participant(event_id, invited_user_id, pool).await? {
        return Ok("User already invited to the event");
    }
    db::event::add_participant(event_id, invited_user_id, pool).await?;
    Ok("User successfully invited to the event")
}

pub async fn leave(
    event_id: Uuid,
    user: &AuthenticatedUser,
    pool: &PGPool,
) -> Result<&'static str, ApiError> {
    if db::event::find_by_id(event_id, pool).await?.is_none() {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }
    if !db::event::is_participant(event_id, user.id, pool).await? {
        return Err(ApiError::NotFound(
            "You are not a participant of this event".to_string(),
        ));
    }
    db::event::remove_participant(event_id, user.id, pool).await?;
    Ok("You have successfully left the event")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;
    use chrono::{TimeZone, Utc};

    fn event(id: Uuid) -> Event {
        Event {
            id,
            creator: Uuid::new_v4(),
            event_name: "Test Event".to_string(),
            event_type: EventType::Party,
            start_date: Utc.with_ymd_and_hms(2022, 12, 12, 12, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2022, 12, 12, 14, 0, 0).unwrap(),
            location: Some("Berlin".to_string()),
            description: None,
            is_private: false,
        }
    }

    #[test]
    fn union_dedup_keeps_one_row_per_event_id() {
        let shared = Uuid::new_v4();
        let created = vec![event(shared), event(Uuid::new_v4())];
        let participated = vec![event(shared), event(Uuid::new_v4())];

        // same merge the service applies
        let mut all = created;
        for e in participated {
            if !all.iter().any(|existing| existing.id == e.id) {
                all.push(e);
            }
        }
        assert_eq!(all.len(), 3);
        assert_eq!(all.iter().filter(|e| e.id == shared).count(), 1);
    }
}
