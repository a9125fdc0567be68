use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Dues payment for one fiscal year
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub uid: String,
    pub payee_id: i64,
    pub receiver_id: Option<i64>,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payment state of a member for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    Unpaid,
    PaidUnconfirmed,
    Confirmed,
}

impl PaymentState {
    pub fn of(payment: Option<&Payment>) -> Self {
        match payment {
            None => PaymentState::Unpaid,
            Some(p) if p.is_confirmed => PaymentState::Confirmed,
            Some(_) => PaymentState::PaidUnconfirmed,
        }
    }
}

impl Payment {
    /// Latest payment created since `since` (start of the cycle)
    pub async fn find_latest_for_uid(
        uid: &str,
        since: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM payments
             WHERE uid = $1 AND created_at >= $2
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
        )
        .bind(uid)
        .bind(since)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Latest payment per uid for the cycle starting at `since`
    pub async fn find_latest_since(since: DateTime<Utc>, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT DISTINCT ON (uid) * FROM payments
             WHERE created_at >= $1
             ORDER BY uid, created_at DESC, id DESC",
        )
        .bind(since)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn state_since(uid: &str, since: DateTime<Utc>, pool: &PgPool) -> Result<PaymentState> {
        let latest = Self::find_latest_for_uid(uid, since, pool).await?;
        Ok(PaymentState::of(latest.as_ref()))
    }

    /// Record a payment handed to `payee_id`
    pub async fn record(uid: &str, payee_id: i64, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO payments (uid, payee_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(uid)
        .bind(payee_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Confirm the cycle's unconfirmed payment. Returns None if there is none.
    pub async fn confirm(
        uid: &str,
        receiver_id: i64,
        since: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE payments
             SET is_confirmed = true, receiver_id = $2, updated_at = NOW()
             WHERE id = (
                SELECT id FROM payments
                WHERE uid = $1 AND created_at >= $3
                ORDER BY created_at DESC, id DESC
                LIMIT 1
             ) AND is_confirmed = false
             RETURNING *",
        )
        .bind(uid)
        .bind(receiver_id)
        .bind(since)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Undo a confirmation. Returns None if the cycle has no confirmed payment.
    pub async fn cancel_confirm(
        uid: &str,
        since: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE payments
             SET is_confirmed = false, receiver_id = NULL, updated_at = NOW()
             WHERE id = (
                SELECT id FROM payments
                WHERE uid = $1 AND created_at >= $2
                ORDER BY created_at DESC, id DESC
                LIMIT 1
             ) AND is_confirmed = true
             RETURNING *",
        )
        .bind(uid)
        .bind(since)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
