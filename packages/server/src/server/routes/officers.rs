//! Officer grant routes.

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use super::{acting_id, load_route_member};
use crate::common::auth::ErrorKind;
use crate::domains::officer::models::officer::Officer;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::Caller;

/// `POST /api/user/:id/officer`
pub async fn grant_officer(
    Extension(state): Extension<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let member = load_route_member(&id, &state.db_pool).await?;
    if Officer::is_active(&member.uid, &state.db_pool).await? {
        return Err(ErrorKind::AlreadyOfficer.into());
    }

    let approver = acting_id(&state, &caller).await?;
    let officer = Officer::grant(&member.uid, approver, &state.db_pool)
        .await?
        .ok_or(ErrorKind::ApproveFailed)?;
    info!(member_id = member.id, approved_by = approver, "Officer granted");

    Ok(Json(json!({ "success": true, "officer": officer })))
}

/// `DELETE /api/user/:id/officer`
pub async fn revoke_officer(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let member = load_route_member(&id, &state.db_pool).await?;
    if !Officer::is_active(&member.uid, &state.db_pool).await? {
        return Err(ErrorKind::NotOfficer.into());
    }

    let officer = Officer::revoke(&member.uid, &state.db_pool)
        .await?
        .ok_or(ErrorKind::RevokeOfficerFailed)?;
    info!(member_id = member.id, "Officer revoked");

    Ok(Json(json!({ "success": true, "officer": officer })))
}
