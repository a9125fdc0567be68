use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Every rejection the API can produce.
///
/// Gate predicates and handlers return these as values; `report()` maps each
/// one to the wire tuple clients render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    // Identity
    #[error("authentication failed")]
    AuthFailed,

    // Authorization
    #[error("admin privileges required")]
    NotAdmin,
    #[error("caller is neither the member nor an admin")]
    NotSelfOrAdmin,

    // State preconditions
    #[error("member is deactivated")]
    Deactivated,
    #[error("member is not deactivated")]
    NotDeactivated,
    #[error("caller is not registered")]
    NotRegistered,
    #[error("caller is already registered")]
    AlreadyRegistered,
    #[error("caller is already approved")]
    AlreadyApproved,
    #[error("caller is not approved")]
    NotApproved,
    #[error("member has already paid")]
    AlreadyPaid,
    #[error("payment cannot be confirmed")]
    PaymentNotAvailable,

    // Input
    #[error("route parameter {param} is not a number")]
    InvalidRequest { param: &'static str },
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    #[error("user not found")]
    UserNotFound,

    // Operation failures
    #[error("target member is already approved")]
    TargetAlreadyApproved,
    #[error("approval failed")]
    ApproveFailed,
    #[error("member is already an officer")]
    AlreadyOfficer,
    #[error("member is not an officer")]
    NotOfficer,
    #[error("revoking officer grant failed")]
    RevokeOfficerFailed,
    #[error("group already exists")]
    GroupAlreadyExists,
    #[error("group not found")]
    GroupNotFound,
    #[error("recording payment failed")]
    PaymentFailed,
    #[error("confirming payment failed")]
    ConfirmFailed,

    // Infrastructure
    #[error("member directory unavailable")]
    DirectoryUnavailable,
}

/// Wire-level description of a rejection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
    pub approach: Option<&'static str>,
    pub status: StatusCode,
}

const LOG_IN_AGAIN: &str = "Please log in again";
const ASK_AN_ADMIN: &str = "Please contact an administrator";
const CHECK_MEMBER_ID: &str = "Please check the member ID";
const CHECK_RECEIPT: &str = "Please check that the dues have been received";

impl ErrorKind {
    pub fn report(&self) -> ErrorReport {
        use ErrorKind::*;

        let (code, message, approach, status) = match self {
            AuthFailed => (
                "A1",
                "Authentication failed".to_string(),
                Some(LOG_IN_AGAIN),
                StatusCode::UNAUTHORIZED,
            ),
            NotAdmin => (
                "A2",
                "Administrator privileges are required".to_string(),
                Some(ASK_AN_ADMIN),
                StatusCode::UNAUTHORIZED,
            ),
            NotSelfOrAdmin => (
                "A3",
                "Only the member or an administrator can do this".to_string(),
                Some(ASK_AN_ADMIN),
                StatusCode::UNAUTHORIZED,
            ),
            InvalidRequest { param } => (
                "C0",
                format!("{param} is an invalid value. {param} must be a number"),
                None,
                StatusCode::BAD_REQUEST,
            ),
            ValidationFailed(message) => ("C1", message.clone(), None, StatusCode::BAD_REQUEST),
            UserNotFound => (
                "C3",
                "User not found".to_string(),
                Some("Please check the user ID"),
                StatusCode::NOT_FOUND,
            ),
            TargetAlreadyApproved => (
                "C4",
                "Already approved".to_string(),
                None,
                StatusCode::BAD_REQUEST,
            ),
            ApproveFailed => (
                "C5",
                "Approval failed".to_string(),
                Some(CHECK_MEMBER_ID),
                StatusCode::BAD_REQUEST,
            ),
            AlreadyOfficer => (
                "C6",
                "Already approved as an officer".to_string(),
                None,
                StatusCode::BAD_REQUEST,
            ),
            NotOfficer => (
                "C7",
                "Not approved as an officer".to_string(),
                Some(CHECK_MEMBER_ID),
                StatusCode::BAD_REQUEST,
            ),
            RevokeOfficerFailed => (
                "C8",
                "Failed to revoke officer privileges".to_string(),
                Some(CHECK_MEMBER_ID),
                StatusCode::BAD_REQUEST,
            ),
            GroupAlreadyExists => (
                "C9",
                "A group with that name already exists".to_string(),
                None,
                StatusCode::BAD_REQUEST,
            ),
            PaymentFailed => (
                "D0",
                "Failed to record the payment".to_string(),
                None,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            ConfirmFailed => (
                "D1",
                "Failed to record the receipt".to_string(),
                Some(CHECK_RECEIPT),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            AlreadyPaid => (
                "D3",
                "Payment has already been made".to_string(),
                None,
                StatusCode::BAD_REQUEST,
            ),
            PaymentNotAvailable => (
                "D6",
                "The payment is not in a state that can be confirmed".to_string(),
                Some(CHECK_RECEIPT),
                StatusCode::BAD_REQUEST,
            ),
            Deactivated => (
                "E0",
                "Membership is deactivated".to_string(),
                Some("Please complete the continuation registration"),
                StatusCode::BAD_REQUEST,
            ),
            NotDeactivated => (
                "E1",
                "Membership is not deactivated".to_string(),
                Some("Please register as a new member"),
                StatusCode::BAD_REQUEST,
            ),
            NotRegistered => (
                "E2",
                "You are not registered".to_string(),
                Some("Please complete the registration"),
                StatusCode::UNAUTHORIZED,
            ),
            AlreadyRegistered => (
                "E3",
                "Already registered".to_string(),
                None,
                StatusCode::UNAUTHORIZED,
            ),
            AlreadyApproved => (
                "E4",
                "Already approved".to_string(),
                None,
                StatusCode::UNAUTHORIZED,
            ),
            NotApproved => (
                "E5",
                "Your registration has not been approved".to_string(),
                Some("Please wait until an administrator approves it"),
                StatusCode::UNAUTHORIZED,
            ),
            GroupNotFound => (
                "F0",
                "Group not found".to_string(),
                None,
                StatusCode::NOT_FOUND,
            ),
            DirectoryUnavailable => (
                "S0",
                "The member directory is unavailable".to_string(),
                Some("Please try again later"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        };

        ErrorReport {
            code,
            message,
            approach,
            status,
        }
    }
}

/// Failure envelope: `{ success: false, key, message, approach? }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub key: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approach: Option<&'static str>,
}

impl From<ErrorReport> for ErrorBody {
    fn from(report: ErrorReport) -> Self {
        Self {
            success: false,
            key: report.code,
            message: report.message,
            approach: report.approach,
        }
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        let report = self.report();
        let status = report.status;
        (status, Json(ErrorBody::from(report))).into_response()
    }
}

impl From<DirectoryError> for ErrorKind {
    fn from(_: DirectoryError) -> Self {
        ErrorKind::DirectoryUnavailable
    }
}

/// Faults raised by the member directory itself (not predicate outcomes)
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Directory read timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Directory query failed: {0}")]
    Query(#[from] anyhow::Error),
}
