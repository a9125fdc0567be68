use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Officer grant - gives a member admin rights until revoked
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Officer {
    pub id: i64,
    pub uid: String,
    pub approved_by: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Member that can receive dues (current officers), for the payee picker
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PayeeRow {
    pub id: i64,
    pub uid: String,
}

impl Officer {
    /// An active grant counts only while the member row it belongs to is live
    pub async fn is_active(uid: &str, pool: &PgPool) -> Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM officers o
                JOIN members m ON m.uid = o.uid AND m.deleted_at IS NULL
                WHERE o.uid = $1 AND o.deleted_at IS NULL
             )",
        )
        .bind(uid)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    pub async fn find_active_uids(pool: &PgPool) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT o.uid FROM officers o
             JOIN members m ON m.uid = o.uid AND m.deleted_at IS NULL
             WHERE o.deleted_at IS NULL",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(uid,)| uid).collect())
    }

    /// Returns None when the uid already holds an active grant
    pub async fn grant(uid: &str, approved_by: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO officers (uid, approved_by) VALUES ($1, $2)
             ON CONFLICT (uid) WHERE deleted_at IS NULL DO NOTHING
             RETURNING *",
        )
        .bind(uid)
        .bind(approved_by)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Soft-delete the active grant. Returns None when there was none.
    pub async fn revoke(uid: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE officers SET deleted_at = NOW()
             WHERE uid = $1 AND deleted_at IS NULL
             RETURNING *",
        )
        .bind(uid)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Approved, live members holding an active grant
    pub async fn find_payees(pool: &PgPool) -> Result<Vec<PayeeRow>> {
        sqlx::query_as::<_, PayeeRow>(
            "SELECT m.id, m.uid FROM officers o
             JOIN members m ON m.uid = o.uid AND m.deleted_at IS NULL AND m.is_approved = true
             WHERE o.deleted_at IS NULL
             ORDER BY m.id",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
