//! Member group routes.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use super::json_body;
use crate::common::auth::{parse_route_id, ErrorKind};
use crate::domains::group::data::{CreateGroupRequest, GroupMembersRequest};
use crate::domains::group::models::group::MemberGroup;
use crate::domains::member::models::member::Member;
use crate::server::app::AppState;
use crate::server::error::ApiResult;

/// `GET /api/groups`
pub async fn list_groups(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let groups = MemberGroup::find_all(&state.db_pool).await?;
    Ok(Json(json!({ "success": true, "groups": groups })))
}

/// `POST /api/groups`
pub async fn create_group(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = json_body(payload)?;
    request.validate()?;

    let group = MemberGroup::create(request.name.trim(), &state.db_pool)
        .await?
        .ok_or(ErrorKind::GroupAlreadyExists)?;
    info!(group_id = group.id, "Group created");

    Ok(Json(json!({ "success": true, "group": group })))
}

/// `DELETE /api/group/:id`
pub async fn delete_group(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_route_id(Some(&id))?;
    let group = MemberGroup::delete(id, &state.db_pool)
        .await?
        .ok_or(ErrorKind::GroupNotFound)?;
    info!(group_id = group.id, "Group deleted");

    Ok(Json(json!({ "success": true, "group": group })))
}

/// `POST /api/group/:id/members` - add members by id; unknown ids are skipped
pub async fn add_group_members(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<GroupMembersRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let group = load_group(&id, &state).await?;
    let request = json_body(payload)?;

    let uids = Member::find_current_uids_by_ids(&request.ids, state.cycle_start(), &state.db_pool)
        .await?;
    let added = MemberGroup::add_members(group.id, &uids, &state.db_pool).await?;
    info!(group_id = group.id, added = added.len(), "Group members added");

    Ok(Json(json!({ "success": true, "groups": added })))
}

/// `DELETE /api/group/:id/members`
pub async fn remove_group_members(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<GroupMembersRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let group = load_group(&id, &state).await?;
    let request = json_body(payload)?;

    let uids = Member::find_current_uids_by_ids(&request.ids, state.cycle_start(), &state.db_pool)
        .await?;
    let removed = MemberGroup::remove_members(group.id, &uids, &state.db_pool).await?;
    info!(group_id = group.id, removed = removed.len(), "Group members removed");

    Ok(Json(json!({ "success": true, "groups": removed })))
}

async fn load_group(raw_id: &str, state: &AppState) -> ApiResult<MemberGroup> {
    let id = parse_route_id(Some(raw_id))?;
    let group = MemberGroup::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ErrorKind::GroupNotFound)?;
    Ok(group)
}
