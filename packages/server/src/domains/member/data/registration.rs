use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::common::auth::ErrorKind;

lazy_static! {
    // Full-width katakana plus the prolonged sound mark
    static ref KANA_REGEX: Regex = Regex::new(r"^[ァ-ンー]+$").unwrap();
    static ref STUDENT_NUMBER_REGEX: Regex = Regex::new(r"^[a-z]\d{5}$").unwrap();
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"^\d{2,4}-\d{2,4}-\d{2,4}$").unwrap();
    static ref POSTAL_CODE_REGEX: Regex = Regex::new(r"^\d{3}-\d{4}$").unwrap();
    static ref BIRTHDATE_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

pub const GRADES: &[&str] = &["B1", "B2", "B3", "B4", "M1", "M2", "D1", "D2", "other"];

/// Body of `POST /api/user`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub user: MemberInput,
    pub payee_id: i64,
}

/// Body of `PUT /api/user/:id` and `POST /api/user/:id/continue`
#[derive(Debug, Clone, Deserialize)]
pub struct MemberRequest {
    pub user: MemberInput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInput {
    pub first_name: String,
    pub last_name: String,
    pub first_name_kana: String,
    pub last_name_kana: String,
    pub skills: Vec<String>,
    pub graduation_year: i32,
    pub slack_name: String,
    pub icon_url: String,
    pub private_info: PrivateInfoInput,
    #[serde(flatten)]
    pub kind: MemberKindInput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateInfoInput {
    pub birthdate: String,
    pub gender: String,
    pub phone_number: String,
    pub email: String,
    pub current_address: AddressInput,
    pub home_address: AddressInput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub postal_code: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MemberKindInput {
    #[serde(rename_all = "camelCase")]
    Active {
        student_number: String,
        position: String,
        grade: String,
    },
    #[serde(rename_all = "camelCase")]
    Obog {
        old_position: String,
        old_student_number: String,
        employment: String,
    },
    #[serde(rename_all = "camelCase")]
    External {
        school: String,
        organization: String,
    },
}

impl MemberKindInput {
    pub fn type_name(&self) -> &'static str {
        match self {
            MemberKindInput::Active { .. } => "active",
            MemberKindInput::Obog { .. } => "obog",
            MemberKindInput::External { .. } => "external",
        }
    }
}

impl MemberInput {
    /// Check every field, reporting all problems at once as `ValidationFailed`
    pub fn validate(&self) -> Result<(), ErrorKind> {
        let mut issues: Vec<String> = Vec::new();
        let mut check = |ok: bool, message: &str, path: &str| {
            if !ok {
                issues.push(format!("{} at {}", message, path));
            }
        };

        check(
            KANA_REGEX.is_match(&self.first_name_kana),
            "must be katakana",
            "user.firstNameKana",
        );
        check(
            KANA_REGEX.is_match(&self.last_name_kana),
            "must be katakana",
            "user.lastNameKana",
        );
        check(
            (1900..=3000).contains(&self.graduation_year),
            "must be between 1900 and 3000",
            "user.graduationYear",
        );
        check(
            url::Url::parse(&self.icon_url).is_ok(),
            "must be a URL",
            "user.iconUrl",
        );

        let info = &self.private_info;
        check(
            BIRTHDATE_REGEX.is_match(&info.birthdate) && parse_birthdate(&info.birthdate).is_some(),
            "must be YYYY-MM-DD",
            "user.privateInfo.birthdate",
        );
        check(
            PHONE_REGEX.is_match(&info.phone_number),
            "must be digits separated by hyphens",
            "user.privateInfo.phoneNumber",
        );
        check(
            EMAIL_REGEX.is_match(&info.email),
            "must be an email address",
            "user.privateInfo.email",
        );
        check(
            POSTAL_CODE_REGEX.is_match(&info.current_address.postal_code),
            "must be xxx-xxxx",
            "user.privateInfo.currentAddress.postalCode",
        );
        check(
            POSTAL_CODE_REGEX.is_match(&info.home_address.postal_code),
            "must be xxx-xxxx",
            "user.privateInfo.homeAddress.postalCode",
        );

        if let MemberKindInput::Active {
            student_number,
            grade,
            ..
        } = &self.kind
        {
            check(
                STUDENT_NUMBER_REGEX.is_match(student_number),
                "must be one lowercase letter followed by 5 digits",
                "user.studentNumber",
            );
            check(
                GRADES.contains(&grade.as_str()),
                "must be one of B1-B4, M1, M2, D1, D2, other",
                "user.grade",
            );
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ErrorKind::ValidationFailed(issues.join(".\n")))
        }
    }

    /// Birthdate as a date. Only meaningful after `validate()` passed.
    pub fn birthdate(&self) -> Option<NaiveDate> {
        parse_birthdate(&self.private_info.birthdate)
    }
}

fn parse_birthdate(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
