use uuid::Uuid;

use crate::{
    models::{Group, GroupMember, User},
    PGPool,
};

pub async fn create(group: &Group, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO groups (id, creator, created_at, name) VALUES ($1, $2, $3, $4)",
    )
    .bind(group.id)
    .bind(group.creator)
    .bind(group.created_at)
    .bind(&group.name)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

pub async fn find_by_id(id: Uuid, pool: &PGPool) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_all(pool: &PGPool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT * FROM groups ORDER BY created_at")
        .fetch_all(pool)
        .await
}

pub async fn update(
    id: Uuid,
    creator: Option<Uuid>,
    name: &str,
    pool: &PGPool,
) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        "UPDATE groups SET creator = $2, name = $3 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(creator)
    .bind(name)
    .fetch_optional(pool)
    .await
}

pub async fn delete(id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM groups WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn created_by(user_id: Uuid, pool: &PGPool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE creator = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn is_member(user_id: Uuid, group_id: Uuid, pool: &PGPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM group_members WHERE user_id = $1 AND group_id = $2)",
    )
    .bind(user_id)
    .bind(group_id)
    .fetch_one(pool)
    .await
}

pub async fn add_member(
    user_id: Uuid,
    group_id: Uuid,
    pool: &PGPool,
) -> Result<GroupMember, sqlx::Error> {
    sqlx::query("INSERT INTO group_members (user_id, group_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(group_id)
        .execute(pool)
        .await?;
    Ok(GroupMember { user_id, group_id })
}

pub async fn remove_member(
    user_id: Uuid,
    group_id: Uuid,
    pool: &PGPool,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM group_members WHERE user_id = $1 AND group_id = $2")
        .bind(user_id)
        .bind(group_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn groups_of_user(user_id: Uuid, pool: &PGPool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        "SELECT g.* FROM groups g JOIN group_members gm ON g.id = gm.group_id \
         WHERE gm.user_id = $1 ORDER BY g.created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn members_of_group(group_id: Uuid, pool: &PGPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT u.* FROM users u JOIN group_members gm ON u.id = gm.user_id \
         WHERE gm.group_id = $1 ORDER BY u.username",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await
}

/// Groups created by `owner_id` that `target_id` has not joined yet; feeds the
/// "invite to group" picker.
pub async fn owned_groups_without_member(
    owner_id: Uuid,
    target_id: Uuid,
    pool: &PGPool,
) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        "SELECT g.* FROM groups g \
         LEFT JOIN group_members gm ON g.id = gm.group_id AND gm.user_id = $2 \
         WHERE g.creator = $1 AND gm.user_id IS NULL",
    )
    .bind(owner_id)
    .bind(target_id)
    .fetch_all(pool)
    .await
}
