//! Dues payment routes.

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info};

use super::{acting_id, load_route_member};
use crate::common::auth::ErrorKind;
use crate::domains::payment::models::payment::Payment;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::Caller;

/// `POST /api/user/:id/payment` - record dues handed to the caller
pub async fn record_payment(
    Extension(state): Extension<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let member = load_route_member(&id, &state.db_pool).await?;
    let payee = acting_id(&state, &caller).await?;

    let payment = Payment::record(&member.uid, payee, &state.db_pool)
        .await
        .map_err(|err| {
            error!(error = %err, member_id = member.id, "Recording payment failed");
            ErrorKind::PaymentFailed
        })?;
    info!(member_id = member.id, payee_id = payee, "Payment recorded");

    Ok(Json(json!({ "success": true, "payment": payment })))
}

/// `POST /api/user/:id/payment/confirm` - caller confirms receipt
pub async fn confirm_payment(
    Extension(state): Extension<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let member = load_route_member(&id, &state.db_pool).await?;
    let receiver = acting_id(&state, &caller).await?;

    let payment = Payment::confirm(&member.uid, receiver, state.cycle_start(), &state.db_pool)
        .await
        .map_err(|err| {
            error!(error = %err, member_id = member.id, "Confirming payment failed");
            ErrorKind::ConfirmFailed
        })?
        .ok_or(ErrorKind::ConfirmFailed)?;
    info!(member_id = member.id, receiver_id = receiver, "Payment confirmed");

    Ok(Json(json!({ "success": true, "payment": payment })))
}

/// `DELETE /api/user/:id/payment/confirm`
pub async fn cancel_confirmation(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let member = load_route_member(&id, &state.db_pool).await?;

    let payment = Payment::cancel_confirm(&member.uid, state.cycle_start(), &state.db_pool)
        .await?
        .ok_or(ErrorKind::PaymentNotAvailable)?;
    info!(member_id = member.id, "Payment confirmation cancelled");

    Ok(Json(json!({ "success": true, "payment": payment })))
}
