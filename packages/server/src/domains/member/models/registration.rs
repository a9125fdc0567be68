use anyhow::Result;
use sqlx::PgPool;

use super::member::Member;
use super::profile::MemberProfile;
use super::skill::MemberSkill;
use crate::domains::member::data::registration::MemberInput;

/// New registration: member row, first profile, skills and the initial dues
/// payment handed to `payee_id`, all in one transaction.
pub async fn register_member(
    uid: &str,
    input: &MemberInput,
    payee_id: i64,
    pool: &PgPool,
) -> Result<Member> {
    let mut tx = pool.begin().await?;

    let member = sqlx::query_as::<_, Member>(
        "INSERT INTO members (uid, is_approved) VALUES ($1, false) RETURNING *",
    )
    .bind(uid)
    .fetch_one(&mut *tx)
    .await?;

    MemberProfile::insert(uid, input, &mut *tx).await?;
    MemberSkill::replace(uid, &input.skills, &mut *tx).await?;

    sqlx::query("INSERT INTO payments (uid, payee_id) VALUES ($1, $2)")
        .bind(uid)
        .bind(payee_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(member)
}

/// Continuation registration for a deactivated member: the previous row is
/// soft-deleted and a fresh, unapproved row takes its place.
pub async fn continue_registration(uid: &str, input: &MemberInput, pool: &PgPool) -> Result<Member> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE members SET deleted_at = NOW() WHERE uid = $1 AND deleted_at IS NULL")
        .bind(uid)
        .execute(&mut *tx)
        .await?;

    let member = sqlx::query_as::<_, Member>(
        "INSERT INTO members (uid, is_approved) VALUES ($1, false) RETURNING *",
    )
    .bind(uid)
    .fetch_one(&mut *tx)
    .await?;

    MemberProfile::insert(uid, input, &mut *tx).await?;
    MemberSkill::replace(uid, &input.skills, &mut *tx).await?;

    tx.commit().await?;

    Ok(member)
}

/// Profile edit: append a profile version and replace skills.
///
/// The member row is left alone so an edit never renews a deactivated member.
pub async fn update_profile(member: &Member, input: &MemberInput, pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;

    MemberProfile::insert(&member.uid, input, &mut *tx).await?;
    MemberSkill::replace(&member.uid, &input.skills, &mut *tx).await?;

    tx.commit().await?;

    Ok(())
}
