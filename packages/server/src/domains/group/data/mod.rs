use serde::Deserialize;

use crate::common::auth::ErrorKind;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
}

impl CreateGroupRequest {
    pub fn validate(&self) -> Result<(), ErrorKind> {
        if self.name.trim().is_empty() {
            return Err(ErrorKind::ValidationFailed("must not be empty at name".into()));
        }
        Ok(())
    }
}

/// Member ids to add to or remove from a group
#[derive(Debug, Clone, Deserialize)]
pub struct GroupMembersRequest {
    pub ids: Vec<i64>,
}
