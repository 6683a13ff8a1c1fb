use chrono::Utc;
use uuid::Uuid;

use crate::{
    db,
    dto::{CreateGroupRequest, GroupInviteRequest, UpdateGroupRequest},
    errors::ApiError,
    models::{Group, GroupMember, User},
    service::auth::AuthenticatedUser,
    PGPool,
};

pub async fn get(id: Uuid, pool: &PGPool) -> Result<Group, ApiError> {
    db::group::find_by_id(id, pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))
}

pub async fn list(pool: &PGPool) -> Result<Vec<Group>, ApiError> {
    let groups = db::group::get_all(pool).await?;
    if groups.is_empty() {
        return Err(ApiError::NotFound("Groups not found".to_string()));
    }
    Ok(groups)
}

pub async fn create(dto: CreateGroupRequest, pool: &PGPool) -> Result<Group, ApiError> {
    let group = Group {
        id: Uuid::new_v4(),
        creator: Some(dto.creator),
        created_at: Utc::now(),
        name: dto.name,
    };
    db::group::create(&group, pool).await?;
    Ok(group)
}

pub async fn update(
    id: Uuid,
    dto: UpdateGroupRequest,
    pool: &PGPool,
) -> Result<Group, ApiError> {
    if db::group::find_by_id(id, pool).await?.is_none() {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }
    db::group::update(id, dto.creator, &dto.name, pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))
}

pub async fn delete(id: Uuid, pool: &PGPool) -> Result<(), ApiError> {
    if db::group::find_by_id(id, pool).await?.is_none() {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }
    db::group::delete(id, pool).await?;
    Ok(())
}

pub async fn created_by(user_id: Uuid, pool: &PGPool) -> Result<Vec<Group>, ApiError> {
    let groups = db::group::created_by(user_id, pool).await?;
    if groups.is_empty() {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }
    Ok(groups)
}

/// Idempotent at the API level: an existing membership reports a 400 instead
/// of inserting a duplicate row.
pub async fn invite(dto: GroupInviteRequest, pool: &PGPool) -> Result<GroupMember, ApiError> {
    if db::group::is_member(dto.user_id, dto.group_id, pool).await? {
        return Err(ApiError::Validation(vec![
            "User is already a member of the group".to_string(),
        ]));
    }
    Ok(db::group::add_member(dto.user_id, dto.group_id, pool).await?)
}

pub async fn owned_without_member(
    owner_id: Uuid,
    target_id: Uuid,
    pool: &PGPool,
) -> Result<Vec<Group>, ApiError> {
    if db::user::find_by_id(owner_id, pool).await?.is_none() {
        return Err(ApiError::NotFound("Owner of Group not found".to_string()));
    }
    if db::user::find_by_id(target_id, pool).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    Ok(db::group::owned_groups_without_member(owner_id, target_id, pool).await?)
}

pub async fn groups_of(user_id: Uuid, pool: &PGPool) -> Result<Vec<Group>, ApiError> {
    let groups = db::group::groups_of_user(user_id, pool).await?;
    if groups.is_empty() {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }
    Ok(groups)
}

pub async fn members_of(group_id: Uuid, pool: &PGPool) -> Result<Vec<User>, ApiError> {
    let members = db::group::members_of_group(group_id, pool).await?;
    if members.is_empty() {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }
    Ok(members)
}

/// Only the group creator may remove a member.
pub async fn kick(
    group_id: Uuid,
    user_id: Uuid,
    caller: &AuthenticatedUser,
    pool: &PGPool,
) -> Result<(), ApiError> {
    let group = db::group::find_by_id(group_id, pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;
    if db::user::find_by_id(user_id, pool).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    if group.creator != Some(caller.id) {
        return Err(ApiError::Forbidden(
            "You are not the creator of the group".to_string(),
        ));
    }
    if !db::group::is_member(user_id, group_id, pool).await? {
        return Err(ApiError::NotFound("User is not in the group".to_string()));
    }
    db::group::remove_member(user_id, group_id, pool).await?;
    Ok(())
}
