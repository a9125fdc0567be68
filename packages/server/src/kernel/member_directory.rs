//! Member directory adapters used by the gate pipeline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::traits::BaseMemberDirectory;
use crate::common::auth::DirectoryError;
use crate::domains::member::models::member::Member;
use crate::domains::officer::models::officer::Officer;
use crate::domains::payment::models::payment::{Payment, PaymentState};

/// Postgres-backed directory
pub struct PgMemberDirectory {
    pool: PgPool,
}

impl PgMemberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseMemberDirectory for PgMemberDirectory {
    async fn find_member_by_id(&self, id: i64) -> Result<Option<Member>, DirectoryError> {
        Ok(Member::find_active_by_id(id, &self.pool).await?)
    }

    async fn find_member_by_uid(&self, uid: &str) -> Result<Option<Member>, DirectoryError> {
        Ok(Member::find_active_by_uid(uid, &self.pool).await?)
    }

    async fn has_officer_grant(&self, uid: &str) -> Result<bool, DirectoryError> {
        Ok(Officer::is_active(uid, &self.pool).await?)
    }

    async fn payment_state(
        &self,
        uid: &str,
        since: DateTime<Utc>,
    ) -> Result<PaymentState, DirectoryError> {
        Ok(Payment::state_since(uid, since, &self.pool).await?)
    }
}

/// Bounds every read of the wrapped directory by `limit`
pub struct TimedDirectory {
    inner: Arc<dyn BaseMemberDirectory>,
    limit: Duration,
}

impl TimedDirectory {
    pub fn new(inner: Arc<dyn BaseMemberDirectory>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T, F>(&self, read: F) -> Result<T, DirectoryError>
    where
        F: Future<Output = Result<T, DirectoryError>>,
    {
        tokio::time::timeout(self.limit, read)
            .await
            .map_err(|_| DirectoryError::Timeout(self.limit))?
    }
}

#[async_trait]
impl BaseMemberDirectory for TimedDirectory {
    async fn find_member_by_id(&self, id: i64) -> Result<Option<Member>, DirectoryError> {
        self.bounded(self.inner.find_member_by_id(id)).await
    }

    async fn find_member_by_uid(&self, uid: &str) -> Result<Option<Member>, DirectoryError> {
        self.bounded(self.inner.find_member_by_uid(uid)).await
    }

    async fn has_officer_grant(&self, uid: &str) -> Result<bool, DirectoryError> {
        self.bounded(self.inner.has_officer_grant(uid)).await
    }

    async fn payment_state(
        &self,
        uid: &str,
        since: DateTime<Utc>,
    ) -> Result<PaymentState, DirectoryError> {
        self.bounded(self.inner.payment_state(uid, since)).await
    }
}
