use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::domains::member::data::registration::{MemberInput, MemberKindInput};

/// One version of a member's profile. Edits append a new row; the newest row
/// per uid is the current profile.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct MemberProfile {
    pub id: i64,
    pub uid: String,
    pub member_type: String,

    pub first_name: String,
    pub last_name: String,
    pub first_name_kana: String,
    pub last_name_kana: String,
    pub graduation_year: i32,
    pub slack_name: String,
    pub icon_url: String,

    pub birthdate: NaiveDate,
    pub gender: String,
    pub phone_number: String,
    pub email: String,
    pub current_postal_code: String,
    pub current_address: String,
    pub home_postal_code: String,
    pub home_address: String,

    pub student_number: Option<String>,
    pub position: Option<String>,
    pub grade: Option<String>,
    pub old_position: Option<String>,
    pub old_student_number: Option<String>,
    pub employment: Option<String>,
    pub school: Option<String>,
    pub organization: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl MemberProfile {
    /// Latest profile for a uid
    pub async fn find_latest_by_uid(uid: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM member_profiles
             WHERE uid = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
        )
        .bind(uid)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Latest profile for each of the given uids
    pub async fn find_latest_for_uids(uids: &[String], pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT DISTINCT ON (uid) * FROM member_profiles
             WHERE uid = ANY($1)
             ORDER BY uid, created_at DESC, id DESC",
        )
        .bind(uids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Append a profile version inside the caller's transaction
    pub async fn insert(uid: &str, input: &MemberInput, conn: &mut PgConnection) -> Result<Self> {
        let info = &input.private_info;
        let birthdate = input
            .birthdate()
            .ok_or_else(|| anyhow::anyhow!("Invalid birthdate: {}", info.birthdate))?;

        let (student_number, position, grade) = match &input.kind {
            MemberKindInput::Active {
                student_number,
                position,
                grade,
            } => (Some(student_number), Some(position), Some(grade)),
            _ => (None, None, None),
        };
        let (old_position, old_student_number, employment) = match &input.kind {
            MemberKindInput::Obog {
                old_position,
                old_student_number,
                employment,
            } => (Some(old_position), Some(old_student_number), Some(employment)),
            _ => (None, None, None),
        };
        let (school, organization) = match &input.kind {
            MemberKindInput::External {
                school,
                organization,
            } => (Some(school), Some(organization)),
            _ => (None, None),
        };

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO member_profiles (
                uid, member_type,
                first_name, last_name, first_name_kana, last_name_kana,
                graduation_year, slack_name, icon_url,
                birthdate, gender, phone_number, email,
                current_postal_code, current_address, home_postal_code, home_address,
                student_number, position, grade,
                old_position, old_student_number, employment,
                school, organization
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)
            RETURNING *
            "#,
        )
        .bind(uid)
        .bind(input.kind.type_name())
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.first_name_kana)
        .bind(&input.last_name_kana)
        .bind(input.graduation_year)
        .bind(&input.slack_name)
        .bind(&input.icon_url)
        .bind(birthdate)
        .bind(&info.gender)
        .bind(&info.phone_number)
        .bind(&info.email)
        .bind(&info.current_address.postal_code)
        .bind(&info.current_address.address)
        .bind(&info.home_address.postal_code)
        .bind(&info.home_address.address)
        .bind(student_number)
        .bind(position)
        .bind(grade)
        .bind(old_position)
        .bind(old_student_number)
        .bind(employment)
        .bind(school)
        .bind(organization)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// "Last First" display name, used for the payee list
    pub fn display_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}
