// HTTP routes
pub mod groups;
pub mod health;
pub mod officers;
pub mod payments;
pub mod users;

pub use health::*;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use sqlx::PgPool;

use crate::common::auth::{parse_route_id, ErrorKind, GateMemo, Identity};
use crate::domains::member::models::member::Member;
use crate::server::app::AppState;
use crate::server::error::ApiResult;

/// Non-deleted member addressed by a raw route id
pub(crate) async fn load_route_member(raw_id: &str, pool: &PgPool) -> ApiResult<Member> {
    let id = parse_route_id(Some(raw_id))?;
    let member = Member::find_active_by_id(id, pool)
        .await?
        .ok_or(ErrorKind::UserNotFound)?;
    Ok(member)
}

/// Unwrap a JSON body, reporting malformed payloads as `ValidationFailed`
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ErrorKind> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ErrorKind::ValidationFailed(rejection.body_text()))
}

/// Admin check for handlers.
///
/// Reuses the answer a gate already recorded for this request, otherwise
/// asks [`GateDeps::is_admin`](crate::common::auth::GateDeps::is_admin).
pub(crate) async fn caller_is_admin(
    state: &AppState,
    caller: &Identity,
    memo: Option<&GateMemo>,
) -> ApiResult<bool> {
    if let Some(is_admin) = memo.and_then(GateMemo::is_admin) {
        return Ok(is_admin);
    }
    Ok(state.gate_deps.is_admin(caller).await?)
}

/// Member id recorded as approver, payee or receiver for the acting admin
pub(crate) async fn acting_id(state: &AppState, caller: &Identity) -> ApiResult<i64> {
    let allow_listed = state.gate_deps.is_allow_listed(caller);
    let id = Member::acting_id(&caller.uid, allow_listed, &state.db_pool)
        .await?
        .ok_or(ErrorKind::NotAdmin)?;
    Ok(id)
}
