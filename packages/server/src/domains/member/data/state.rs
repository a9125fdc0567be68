use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common::fiscal_year::FiscalYear;
use crate::domains::member::models::member::Member;

/// Registration state shown to the member and admins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberState {
    Unregistered,
    Deactivated,
    Unapproved,
    Registered,
}

impl MemberState {
    pub fn of(member: Option<&Member>, fiscal_year: &FiscalYear, now: DateTime<Utc>) -> Self {
        match member {
            None => MemberState::Unregistered,
            Some(m) if !fiscal_year.is_current(m.updated_at, now) => MemberState::Deactivated,
            Some(m) if !m.is_approved => MemberState::Unapproved,
            Some(_) => MemberState::Registered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::member;
    use chrono::TimeZone;

    #[test]
    fn test_state_precedence() {
        let fy = FiscalYear::new(9).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap();
        let fresh = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let stale = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();

        assert_eq!(MemberState::of(None, &fy, now), MemberState::Unregistered);
        // stale rows report deactivated even when unapproved
        assert_eq!(
            MemberState::of(Some(&member(1, "a", false, stale)), &fy, now),
            MemberState::Deactivated
        );
        assert_eq!(
            MemberState::of(Some(&member(1, "a", false, fresh)), &fy, now),
            MemberState::Unapproved
        );
        assert_eq!(
            MemberState::of(Some(&member(1, "a", true, fresh)), &fy, now),
            MemberState::Registered
        );
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_value(MemberState::Deactivated).unwrap();
        assert_eq!(json, "deactivated");
    }
}
