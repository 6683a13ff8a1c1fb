use chrono::Utc;
use uuid::Uuid;

use crate::{
    db,
    dto::{CheckMatchResponse, MatchPair},
    errors::ApiError,
    models::Match,
    PGPool,
};

/// Idempotence is by exact direction only: (A,B) conflicts with an existing
/// (A,B), never with (B,A).
pub async fn create(dto: MatchPair, pool: &PGPool) -> Result<Match, ApiError> {
    if db::matches::find(dto.user_a, dto.user_b, pool).await?.is_some() {
        return Err(ApiError::Conflict("Match already exists".to_string()));
    }
    let m = Match {
        user_a: dto.user_a,
        user_b: dto.user_b,
        result: None,
        match_date: Some(Utc::now()),
    };
    Ok(db::matches::create(&m, pool).await?)
}

/// Both directional lookups; either side may be empty. Mutuality is the
/// caller's conclusion, never stored.
pub async fn check(
    user_a: Uuid,
    user_b: Uuid,
    pool: &PGPool,
) -> Result<CheckMatchResponse, ApiError> {
    let a_has_matched_b = db::matches::find_all(user_a, user_b, pool).await?;
    let b_has_matched_a = db::matches::find_all(user_b, user_a, pool).await?;
    Ok(CheckMatchResponse {
        a_has_matched_b,
        b_has_matched_a,
    })
}

/// The strict variant: 404 unless both directions exist.
pub async fn mutual(
    user_a: Uuid,
    user_b: Uuid,
    pool: &PGPool,
) -> Result<CheckMatchResponse, ApiError> {
    let a_has_matched_b = db::matches::find_all(user_a, user_b, pool).await?;
    if a_has_matched_b.is_empty() {
        return Err(ApiError::NotFound("Match not found".to_string()));
    }
    let b_has_matched_a = db::matches::find_all(user_b, user_a, pool).await?;
    if b_has_matched_a.is_empty() {
        return Err(ApiError::NotFound("Match not found".to_string()));
    }
    Ok(CheckMatchResponse {
        a_has_matched_b,
        b_has_matched_a,
    })
}

/// Undo removes the single directional row.
pub async fn delete(dto: MatchPair, pool: &PGPool) -> Result<Match, ApiError> {
    if db::matches::find(dto.user_a, dto.user_b, pool).await?.is_none() {
        return Err(ApiError::NotFound("Match not found".to_string()));
    }
    db::matches::delete(dto.user_a, dto.user_b, pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))
}

pub async fn of_user(user_id: Uuid, pool: &PGPool) -> Result<Vec<Match>, ApiError> {
    Ok(db::matches::of_user(user_id, pool).await?)
}
