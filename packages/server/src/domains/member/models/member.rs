use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Member model - one registration of an account for a fiscal year
///
/// Rows are never hard-deleted. `deleted_at` marks removal or supersession by
/// a continuation registration.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: i64,
    pub uid: String,
    pub is_approved: bool,
    pub approved_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Member {
    /// Find a non-deleted member by numeric id
    pub async fn find_active_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find the non-deleted member for an account uid
    pub async fn find_active_by_uid(uid: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE uid = $1 AND deleted_at IS NULL")
            .bind(uid)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find a non-deleted, approved member updated since `since`
    pub async fn find_current_approved_by_id(
        id: i64,
        since: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM members
             WHERE id = $1
               AND is_approved = true
               AND deleted_at IS NULL
               AND updated_at >= $2",
        )
        .bind(id)
        .bind(since)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// All current members (newest first)
    pub async fn find_current(since: DateTime<Utc>, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM members
             WHERE deleted_at IS NULL AND updated_at >= $1
             ORDER BY id DESC",
        )
        .bind(since)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Approved current members (newest first)
    pub async fn find_current_approved(since: DateTime<Utc>, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM members
             WHERE is_approved = true AND deleted_at IS NULL AND updated_at >= $1
             ORDER BY id DESC",
        )
        .bind(since)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Resolve numeric ids to uids of current members, silently skipping unknown ids
    pub async fn find_current_uids_by_ids(
        ids: &[i64],
        since: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT uid FROM members
             WHERE id = ANY($1) AND deleted_at IS NULL AND updated_at >= $2",
        )
        .bind(ids)
        .bind(since)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(uid,)| uid).collect())
    }

    /// Mark a member approved. Returns None if no pending member has this id.
    pub async fn approve(id: i64, approved_by: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE members
             SET is_approved = true, approved_by = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL AND is_approved = false
             RETURNING *",
        )
        .bind(id)
        .bind(approved_by)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Soft-delete the member along with skills and officer grants
    pub async fn soft_delete(uid: &str, pool: &PgPool) -> Result<Option<Self>> {
        let mut tx = pool.begin().await?;

        let member = sqlx::query_as::<_, Self>(
            "UPDATE members SET deleted_at = NOW()
             WHERE uid = $1 AND deleted_at IS NULL
             RETURNING *",
        )
        .bind(uid)
        .fetch_optional(&mut *tx)
        .await?;

        sqlx::query("UPDATE member_skills SET deleted_at = NOW() WHERE uid = $1 AND deleted_at IS NULL")
            .bind(uid)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE officers SET deleted_at = NOW() WHERE uid = $1 AND deleted_at IS NULL")
            .bind(uid)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(member)
    }

    /// Id recorded as approver/payee/receiver for an acting admin.
    ///
    /// Approved members act under their own id. Initial admins from the
    /// allow-list may have no member row and act as `0`.
    pub async fn acting_id(uid: &str, allow_listed: bool, pool: &PgPool) -> Result<Option<i64>> {
        let member = Self::find_active_by_uid(uid, pool).await?;
        match member {
            Some(m) if m.is_approved => Ok(Some(m.id)),
            _ if allow_listed => Ok(Some(0)),
            _ => Ok(None),
        }
    }
}
