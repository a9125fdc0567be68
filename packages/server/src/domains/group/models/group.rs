use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Named sub-group of members
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberGroup {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Membership of a uid in a group
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembership {
    pub id: i64,
    pub group_id: i64,
    pub uid: String,
    pub created_at: DateTime<Utc>,
}

impl MemberGroup {
    /// Returns None when the name is taken
    pub async fn create(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO member_groups (name) VALUES ($1)
             ON CONFLICT (name) DO NOTHING
             RETURNING *",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM member_groups ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM member_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Hard delete; memberships go with it (ON DELETE CASCADE)
    pub async fn delete(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("DELETE FROM member_groups WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Add uids to the group, skipping ones already in it. Returns the new rows.
    pub async fn add_members(
        group_id: i64,
        uids: &[String],
        pool: &PgPool,
    ) -> Result<Vec<GroupMembership>> {
        if uids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, GroupMembership>(
            "INSERT INTO member_group_members (group_id, uid)
             SELECT $1, uid FROM UNNEST($2::text[]) AS t(uid)
             ON CONFLICT (group_id, uid) DO NOTHING
             RETURNING *",
        )
        .bind(group_id)
        .bind(uids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Remove uids from the group. Returns the removed rows.
    pub async fn remove_members(
        group_id: i64,
        uids: &[String],
        pool: &PgPool,
    ) -> Result<Vec<GroupMembership>> {
        sqlx::query_as::<_, GroupMembership>(
            "DELETE FROM member_group_members
             WHERE group_id = $1 AND uid = ANY($2)
             RETURNING *",
        )
        .bind(group_id)
        .bind(uids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
