// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Gate predicates and handlers decide what the answers mean.
//
// Naming convention: Base* for trait names (e.g., BaseMemberDirectory)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::auth::DirectoryError;
use crate::domains::member::models::member::Member;
use crate::domains::payment::models::payment::PaymentState;

// =============================================================================
// Member Directory Trait (read-only view used by the gate pipeline)
// =============================================================================

#[async_trait]
pub trait BaseMemberDirectory: Send + Sync {
    /// Non-deleted member with this numeric id
    async fn find_member_by_id(&self, id: i64) -> Result<Option<Member>, DirectoryError>;

    /// Non-deleted member for this account uid
    async fn find_member_by_uid(&self, uid: &str) -> Result<Option<Member>, DirectoryError>;

    /// Whether a non-deleted officer grant exists for a non-deleted member
    async fn has_officer_grant(&self, uid: &str) -> Result<bool, DirectoryError>;

    /// Payment state of the cycle that started at `since`
    async fn payment_state(
        &self,
        uid: &str,
        since: DateTime<Utc>,
    ) -> Result<PaymentState, DirectoryError>;
}
