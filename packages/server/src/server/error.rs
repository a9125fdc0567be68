use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::common::auth::ErrorKind;

/// Handler error: either a reportable rejection or an unexpected store fault
#[derive(Debug)]
pub enum ApiError {
    Rejected(ErrorKind),
    Internal(anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ErrorKind> for ApiError {
    fn from(kind: ErrorKind) -> Self {
        ApiError::Rejected(kind)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected(kind) => kind.into_response(),
            ApiError::Internal(err) => {
                error!(error = %err, "Request failed");
                ErrorKind::DirectoryUnavailable.into_response()
            }
        }
    }
}
