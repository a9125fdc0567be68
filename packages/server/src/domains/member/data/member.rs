use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domains::member::models::member::Member as MemberModel;
use crate::domains::member::models::profile::MemberProfile;

/// Public API representation of a member (visible to approved members)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberData {
    pub id: i64,
    /// When the current profile version was written
    pub updated_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub first_name_kana: String,
    pub last_name_kana: String,
    pub graduation_year: i32,
    pub slack_name: String,
    pub icon_url: String,
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub kind: MemberKindData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MemberKindData {
    #[serde(rename_all = "camelCase")]
    Active {
        student_number: Option<String>,
        position: Option<String>,
        grade: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Obog {
        old_student_number: Option<String>,
        old_position: Option<String>,
        employment: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    External {
        school: Option<String>,
        organization: Option<String>,
    },
}

/// Member with private information (self, admins)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetailData {
    #[serde(flatten)]
    pub member: MemberData,
    pub private_info: PrivateInfoData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateInfoData {
    pub birthdate: NaiveDate,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub current_address: AddressData,
    pub home_address: AddressData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressData {
    pub postal_code: String,
    pub address: String,
}

/// Row of the admin roster table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRosterData {
    #[serde(flatten)]
    pub detail: MemberDetailData,
    pub is_approved: bool,
    pub approved_by: Option<i64>,
    pub is_admin: bool,
    pub payee_id: Option<i64>,
    pub is_confirmed: bool,
    pub payment_at: Option<DateTime<Utc>>,
}

impl MemberData {
    pub fn new(member: &MemberModel, profile: &MemberProfile, skills: Vec<String>) -> Self {
        let kind = match profile.member_type.as_str() {
            "obog" => MemberKindData::Obog {
                old_student_number: profile.old_student_number.clone(),
                old_position: profile.old_position.clone(),
                employment: profile.employment.clone(),
            },
            "external" => MemberKindData::External {
                school: profile.school.clone(),
                organization: profile.organization.clone(),
            },
            _ => MemberKindData::Active {
                student_number: profile.student_number.clone(),
                position: profile.position.clone(),
                grade: profile.grade.clone(),
            },
        };

        Self {
            id: member.id,
            updated_at: profile.created_at,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            first_name_kana: profile.first_name_kana.clone(),
            last_name_kana: profile.last_name_kana.clone(),
            graduation_year: profile.graduation_year,
            slack_name: profile.slack_name.clone(),
            icon_url: profile.icon_url.clone(),
            skills,
            kind,
        }
    }
}

impl MemberDetailData {
    pub fn new(member: &MemberModel, profile: &MemberProfile, skills: Vec<String>) -> Self {
        Self {
            member: MemberData::new(member, profile, skills),
            private_info: PrivateInfoData {
                birthdate: profile.birthdate,
                gender: profile.gender.clone(),
                email: profile.email.clone(),
                phone_number: profile.phone_number.clone(),
                current_address: AddressData {
                    postal_code: profile.current_postal_code.clone(),
                    address: profile.current_address.clone(),
                },
                home_address: AddressData {
                    postal_code: profile.home_postal_code.clone(),
                    address: profile.home_address.clone(),
                },
            },
        }
    }
}
