//! Member registration and roster routes.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::{acting_id, caller_is_admin, json_body, load_route_member};
use crate::common::auth::{parse_route_id, ErrorKind, GateMemo};
use crate::domains::member::actions;
use crate::domains::member::data::{CreateMemberRequest, MemberRequest, MemberState};
use crate::domains::member::models::member::Member;
use crate::domains::member::models::profile::MemberProfile;
use crate::domains::member::models::registration;
use crate::domains::officer::models::officer::Officer;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::Caller;

#[derive(Serialize)]
pub struct PayeeData {
    id: i64,
    name: String,
}

/// `GET /api/user/admin` - whether the caller is an admin (false if anonymous)
pub async fn is_admin(
    Extension(state): Extension<AppState>,
    caller: Option<Caller>,
) -> ApiResult<Json<Value>> {
    let is_admin = match caller {
        Some(Caller(identity)) => caller_is_admin(&state, &identity, None).await?,
        None => false,
    };

    Ok(Json(json!({ "success": true, "isAdmin": is_admin })))
}

/// `POST /api/user` - new registration
pub async fn create_member(
    Extension(state): Extension<AppState>,
    Caller(caller): Caller,
    payload: Result<Json<CreateMemberRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = json_body(payload)?;
    request.user.validate()?;

    let member =
        registration::register_member(&caller.uid, &request.user, request.payee_id, &state.db_pool)
            .await?;
    info!(member_id = member.id, "Member registered");

    let user = actions::get_member_detail(&member, &state.db_pool).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// `GET /api/user` - caller's own detail view
pub async fn get_me(
    Extension(state): Extension<AppState>,
    Caller(caller): Caller,
) -> ApiResult<Json<Value>> {
    let member = Member::find_active_by_uid(&caller.uid, &state.db_pool)
        .await?
        .ok_or(ErrorKind::UserNotFound)?;
    let user = actions::get_member_detail(&member, &state.db_pool)
        .await?
        .ok_or(ErrorKind::UserNotFound)?;

    Ok(Json(json!({ "success": true, "user": user })))
}

/// `GET /api/user/state` - caller's registration state
pub async fn my_state(
    Extension(state): Extension<AppState>,
    Caller(caller): Caller,
) -> ApiResult<Json<Value>> {
    let member = Member::find_active_by_uid(&caller.uid, &state.db_pool).await?;
    let member_state = MemberState::of(member.as_ref(), &state.gate_deps.fiscal_year, Utc::now());

    Ok(Json(json!({ "success": true, "state": member_state })))
}

/// `GET /api/users` - approved members of the current year
pub async fn list_members(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let users = actions::get_approved_members(state.cycle_start(), &state.db_pool).await?;
    Ok(Json(json!({ "success": true, "users": users })))
}

/// `GET /api/users/detail` - admin roster
pub async fn list_roster(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let users = actions::get_roster(state.cycle_start(), &state.db_pool).await?;
    Ok(Json(json!({ "success": true, "users": users })))
}

/// `GET /api/users/payee` - officers that can receive dues
pub async fn list_payees(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let payees = Officer::find_payees(&state.db_pool).await?;
    let uids: Vec<String> = payees.iter().map(|p| p.uid.clone()).collect();
    let names: HashMap<String, String> = MemberProfile::find_latest_for_uids(&uids, &state.db_pool)
        .await?
        .into_iter()
        .map(|p| (p.uid.clone(), p.display_name()))
        .collect();

    let payee: Vec<PayeeData> = payees
        .into_iter()
        .filter_map(|p| {
            names.get(&p.uid).map(|name| PayeeData {
                id: p.id,
                name: name.clone(),
            })
        })
        .collect();

    Ok(Json(json!({ "success": true, "payee": payee })))
}

/// `GET /api/user/:id` - approved member; admins get the detail view
pub async fn get_member(
    Extension(state): Extension<AppState>,
    Caller(caller): Caller,
    memo: Option<Extension<GateMemo>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_route_id(Some(&id))?;
    let member = Member::find_current_approved_by_id(id, state.cycle_start(), &state.db_pool)
        .await?
        .ok_or(ErrorKind::UserNotFound)?;

    let memo = memo.map(|Extension(memo)| memo);
    if caller_is_admin(&state, &caller, memo.as_ref()).await? {
        let user = actions::get_member_detail(&member, &state.db_pool)
            .await?
            .ok_or(ErrorKind::UserNotFound)?;
        return Ok(Json(json!({ "success": true, "user": user, "isDetail": true })));
    }

    let user = actions::get_member_data(&member, &state.db_pool)
        .await?
        .ok_or(ErrorKind::UserNotFound)?;
    Ok(Json(json!({ "success": true, "user": user, "isDetail": false })))
}

/// `GET /api/user/:id/detail` - approved member with private info
pub async fn get_member_detail(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_route_id(Some(&id))?;
    let member = Member::find_current_approved_by_id(id, state.cycle_start(), &state.db_pool)
        .await?
        .ok_or(ErrorKind::UserNotFound)?;
    let user = actions::get_member_detail(&member, &state.db_pool)
        .await?
        .ok_or(ErrorKind::UserNotFound)?;

    Ok(Json(json!({ "success": true, "user": user })))
}

/// `PUT /api/user/:id` - profile edit
pub async fn update_member(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MemberRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let member = load_route_member(&id, &state.db_pool).await?;
    let request = json_body(payload)?;
    request.user.validate()?;

    registration::update_profile(&member, &request.user, &state.db_pool).await?;
    info!(member_id = member.id, "Member profile updated");

    let user = actions::get_member_detail(&member, &state.db_pool).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// `DELETE /api/user/:id`
pub async fn delete_member(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let member = load_route_member(&id, &state.db_pool).await?;
    let deleted = Member::soft_delete(&member.uid, &state.db_pool)
        .await?
        .ok_or(ErrorKind::UserNotFound)?;
    info!(member_id = deleted.id, "Member deleted");

    let user = actions::get_member_detail(&deleted, &state.db_pool).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// `GET /api/user/:id/state`
pub async fn member_state(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let member = load_route_member(&id, &state.db_pool).await?;
    let member_state = MemberState::of(Some(&member), &state.gate_deps.fiscal_year, Utc::now());

    Ok(Json(json!({ "success": true, "state": member_state })))
}

/// `POST /api/user/:id/approve`
pub async fn approve_member(
    Extension(state): Extension<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let member = load_route_member(&id, &state.db_pool).await?;
    if member.is_approved {
        return Err(ErrorKind::TargetAlreadyApproved.into());
    }

    let approver = acting_id(&state, &caller).await?;
    let approved = Member::approve(member.id, approver, &state.db_pool)
        .await?
        .ok_or(ErrorKind::ApproveFailed)?;
    info!(member_id = approved.id, approved_by = approver, "Member approved");

    let user = actions::get_member_detail(&approved, &state.db_pool).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// `POST /api/user/:id/continue` - continuation registration for a
/// deactivated member
pub async fn continue_member(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MemberRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let member = load_route_member(&id, &state.db_pool).await?;
    let request = json_body(payload)?;
    request.user.validate()?;

    let renewed =
        registration::continue_registration(&member.uid, &request.user, &state.db_pool).await?;
    info!(
        previous_id = member.id,
        member_id = renewed.id,
        "Continuation registration"
    );

    let user = actions::get_member_detail(&renewed, &state.db_pool).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}
