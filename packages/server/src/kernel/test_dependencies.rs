// TestDependencies - in-memory implementations for testing
//
// Provides a member directory that can be injected into GateDeps for tests.
// Every read is counted so tests can assert that a gate short-circuited
// before touching the store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::BaseMemberDirectory;
use crate::common::auth::DirectoryError;
use crate::domains::member::models::member::Member;
use crate::domains::payment::models::payment::PaymentState;

/// Build a live member row for tests
pub fn member(id: i64, uid: &str, is_approved: bool, updated_at: DateTime<Utc>) -> Member {
    Member {
        id,
        uid: uid.to_string(),
        is_approved,
        approved_by: if is_approved { Some(0) } else { None },
        created_at: updated_at,
        updated_at,
        deleted_at: None,
    }
}

// =============================================================================
// In-memory Member Directory
// =============================================================================

pub struct InMemoryDirectory {
    members: Mutex<Vec<Member>>,
    officers: Mutex<HashSet<String>>,
    payments: Mutex<HashMap<String, PaymentState>>,
    reads: AtomicUsize,
    delay: Option<Duration>,
    failing: bool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(Vec::new()),
            officers: Mutex::new(HashSet::new()),
            payments: Mutex::new(HashMap::new()),
            reads: AtomicUsize::new(0),
            delay: None,
            failing: false,
        }
    }

    pub fn with_member(self, member: Member) -> Self {
        self.members.lock().unwrap().push(member);
        self
    }

    pub fn with_officer(self, uid: &str) -> Self {
        self.officers.lock().unwrap().insert(uid.to_string());
        self
    }

    pub fn with_payment(self, uid: &str, state: PaymentState) -> Self {
        self.payments.lock().unwrap().insert(uid.to_string(), state);
        self
    }

    /// Sleep before answering each read
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every read with a query error
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn revoke_officer(&self, uid: &str) {
        self.officers.lock().unwrap().remove(uid);
    }

    /// Number of reads served so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    async fn read(&self) -> Result<(), DirectoryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(DirectoryError::Query(anyhow::anyhow!("directory offline")));
        }
        Ok(())
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMemberDirectory for InMemoryDirectory {
    async fn find_member_by_id(&self, id: i64) -> Result<Option<Member>, DirectoryError> {
        self.read().await?;
        let members = self.members.lock().unwrap();
        Ok(members
            .iter()
            .find(|m| m.id == id && m.deleted_at.is_none())
            .cloned())
    }

    async fn find_member_by_uid(&self, uid: &str) -> Result<Option<Member>, DirectoryError> {
        self.read().await?;
        let members = self.members.lock().unwrap();
        Ok(members
            .iter()
            .find(|m| m.uid == uid && m.deleted_at.is_none())
            .cloned())
    }

    async fn has_officer_grant(&self, uid: &str) -> Result<bool, DirectoryError> {
        self.read().await?;
        let has_member = self
            .members
            .lock()
            .unwrap()
            .iter()
            .any(|m| m.uid == uid && m.deleted_at.is_none());
        Ok(has_member && self.officers.lock().unwrap().contains(uid))
    }

    async fn payment_state(
        &self,
        uid: &str,
        _since: DateTime<Utc>,
    ) -> Result<PaymentState, DirectoryError> {
        self.read().await?;
        Ok(self
            .payments
            .lock()
            .unwrap()
            .get(uid)
            .copied()
            .unwrap_or(PaymentState::Unpaid))
    }
}
