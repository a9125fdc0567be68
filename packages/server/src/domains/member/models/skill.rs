use anyhow::Result;
use sqlx::{PgConnection, PgPool};

/// Skills ("stack") listed on a member profile
pub struct MemberSkill;

impl MemberSkill {
    /// Live skill names keyed by uid
    pub async fn find_for_uids(uids: &[String], pool: &PgPool) -> Result<Vec<(String, String)>> {
        sqlx::query_as::<_, (String, String)>(
            "SELECT uid, name FROM member_skills
             WHERE uid = ANY($1) AND deleted_at IS NULL
             ORDER BY id",
        )
        .bind(uids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Soft-delete the current skills and insert the new list
    pub async fn replace(uid: &str, skills: &[String], conn: &mut PgConnection) -> Result<()> {
        sqlx::query("UPDATE member_skills SET deleted_at = NOW() WHERE uid = $1 AND deleted_at IS NULL")
            .bind(uid)
            .execute(&mut *conn)
            .await?;

        if skills.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO member_skills (uid, name)
             SELECT $1, name FROM UNNEST($2::text[]) AS t(name)",
        )
        .bind(uid)
        .bind(skills)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
