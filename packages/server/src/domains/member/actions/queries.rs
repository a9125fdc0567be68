//! Member query actions
//!
//! Assemble API views from member rows, their latest profile and skills.
//! Authorization is done by the route gates before these run.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::domains::member::data::{MemberData, MemberDetailData, MemberRosterData};
use crate::domains::member::models::member::Member;
use crate::domains::member::models::profile::MemberProfile;
use crate::domains::member::models::skill::MemberSkill;
use crate::domains::officer::models::officer::Officer;
use crate::domains::payment::models::payment::Payment;

struct ProfileBundle {
    profiles: HashMap<String, MemberProfile>,
    skills: HashMap<String, Vec<String>>,
}

impl ProfileBundle {
    async fn load(members: &[Member], pool: &PgPool) -> Result<Self> {
        let uids: Vec<String> = members.iter().map(|m| m.uid.clone()).collect();

        let profiles = MemberProfile::find_latest_for_uids(&uids, pool)
            .await?
            .into_iter()
            .map(|p| (p.uid.clone(), p))
            .collect();

        let mut skills: HashMap<String, Vec<String>> = HashMap::new();
        for (uid, name) in MemberSkill::find_for_uids(&uids, pool).await? {
            skills.entry(uid).or_default().push(name);
        }

        Ok(Self { profiles, skills })
    }

    /// Members without a profile row are skipped (registration is transactional,
    /// so this only happens with hand-edited data)
    fn profile(&self, member: &Member) -> Option<(&MemberProfile, Vec<String>)> {
        match self.profiles.get(&member.uid) {
            Some(profile) => Some((
                profile,
                self.skills.get(&member.uid).cloned().unwrap_or_default(),
            )),
            None => {
                warn!(member_id = member.id, "Member has no profile");
                None
            }
        }
    }
}

/// Public view of one member
pub async fn get_member_data(member: &Member, pool: &PgPool) -> Result<Option<MemberData>> {
    let bundle = ProfileBundle::load(std::slice::from_ref(member), pool).await?;
    Ok(bundle
        .profile(member)
        .map(|(profile, skills)| MemberData::new(member, profile, skills)))
}

/// Detail view of one member
pub async fn get_member_detail(member: &Member, pool: &PgPool) -> Result<Option<MemberDetailData>> {
    let bundle = ProfileBundle::load(std::slice::from_ref(member), pool).await?;
    Ok(bundle
        .profile(member)
        .map(|(profile, skills)| MemberDetailData::new(member, profile, skills)))
}

/// Approved members of the current fiscal year
pub async fn get_approved_members(since: DateTime<Utc>, pool: &PgPool) -> Result<Vec<MemberData>> {
    info!("Listing approved members");

    let members = Member::find_current_approved(since, pool).await?;
    let bundle = ProfileBundle::load(&members, pool).await?;

    Ok(members
        .iter()
        .filter_map(|m| {
            bundle
                .profile(m)
                .map(|(profile, skills)| MemberData::new(m, profile, skills))
        })
        .collect())
}

/// Full roster for admins: every current member with approval, officer and
/// payment flags
pub async fn get_roster(since: DateTime<Utc>, pool: &PgPool) -> Result<Vec<MemberRosterData>> {
    info!("Listing member roster");

    let members = Member::find_current(since, pool).await?;
    let bundle = ProfileBundle::load(&members, pool).await?;
    let officer_uids = Officer::find_active_uids(pool).await?;
    let payments: HashMap<String, Payment> = Payment::find_latest_since(since, pool)
        .await?
        .into_iter()
        .map(|p| (p.uid.clone(), p))
        .collect();

    Ok(members
        .iter()
        .filter_map(|m| {
            let (profile, skills) = bundle.profile(m)?;
            let payment = payments.get(&m.uid);
            Some(MemberRosterData {
                detail: MemberDetailData::new(m, profile, skills),
                is_approved: m.is_approved,
                approved_by: m.approved_by,
                is_admin: officer_uids.contains(&m.uid),
                payee_id: payment.map(|p| p.payee_id),
                is_confirmed: payment.map(|p| p.is_confirmed).unwrap_or(false),
                payment_at: payment.map(|p| p.created_at),
            })
        })
        .collect())
}
