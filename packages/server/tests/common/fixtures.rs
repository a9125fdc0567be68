//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use meibo_core::domains::member::data::MemberInput;
use meibo_core::domains::member::models::member::Member;
use meibo_core::domains::member::models::registration::register_member;
use meibo_core::domains::officer::models::officer::Officer;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

/// Fresh account uid so tests sharing the database never collide
pub fn new_uid() -> String {
    format!("uid-{}", Uuid::new_v4())
}

/// Valid registration payload for an active student
pub fn member_json(first_name: &str) -> Value {
    json!({
        "type": "active",
        "firstName": first_name,
        "lastName": "Yamada",
        "firstNameKana": "タロウ",
        "lastNameKana": "ヤマダ",
        "skills": ["rust", "sql"],
        "graduationYear": 2027,
        "slackName": first_name.to_lowercase(),
        "iconUrl": "https://example.com/icon.png",
        "studentNumber": "a12345",
        "position": "member",
        "grade": "B3",
        "privateInfo": {
            "birthdate": "2004-05-06",
            "gender": "male",
            "phoneNumber": "090-1234-5678",
            "email": "taro@example.com",
            "currentAddress": { "postalCode": "123-4567", "address": "Tokyo" },
            "homeAddress": { "postalCode": "765-4321", "address": "Osaka" }
        }
    })
}

/// Register a member directly (pending approval, with an unconfirmed payment)
pub async fn create_member(pool: &PgPool, uid: &str, payee_id: i64) -> Result<Member> {
    let input: MemberInput = serde_json::from_value(member_json("Taro"))?;
    register_member(uid, &input, payee_id, pool).await
}

/// Register and approve a member
pub async fn create_approved_member(pool: &PgPool, uid: &str) -> Result<Member> {
    let member = create_member(pool, uid, 0).await?;
    Member::approve(member.id, 0, pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("approval failed"))
}

/// Register, approve and grant officer rights
pub async fn create_officer(pool: &PgPool, uid: &str) -> Result<Member> {
    let member = create_approved_member(pool, uid).await?;
    Officer::grant(uid, 0, pool).await?;
    Ok(member)
}

/// Move a member's last renewal into a previous fiscal year
pub async fn deactivate(pool: &PgPool, member_id: i64) -> Result<()> {
    sqlx::query("UPDATE members SET updated_at = NOW() - INTERVAL '2 years' WHERE id = $1")
        .bind(member_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Drop every payment of a member
pub async fn clear_payments(pool: &PgPool, uid: &str) -> Result<()> {
    sqlx::query("DELETE FROM payments WHERE uid = $1")
        .bind(uid)
        .execute(pool)
        .await?;
    Ok(())
}
