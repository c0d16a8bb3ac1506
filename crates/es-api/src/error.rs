//! API error handling
//!
//! Maps core errors onto HTTP responses with a stable JSON error shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use es_core::error::EsError;

/// Transport wrapper around the core error type.
#[derive(Debug)]
pub struct ApiError(pub EsError);

impl From<EsError> for ApiError {
    fn from(err: EsError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "_type")]
    type_name: &'static str,
    #[serde(rename = "errorIdentifier")]
    error_identifier: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
    retryable: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Server-side faults get logged here; client errors are the caller's
        // problem and stay at debug.
        if status.is_server_error() {
            tracing::error!(code = err.error_code(), "Request failed: {err}");
        } else {
            tracing::debug!(code = err.error_code(), "Request rejected: {err}");
        }

        let rule = match &err {
            EsError::InvariantViolation { rule, .. } => Some(rule.as_str()),
            _ => None,
        };
        let details = match &err {
            EsError::Validation(errors) => errors.full_messages(),
            _ => Vec::new(),
        };

        // Internal detail stays out of 500 bodies.
        let message = if status.is_server_error() {
            "internal error".to_string()
        } else {
            err.to_string()
        };

        let body = ErrorBody {
            type_name: "Error",
            error_identifier: err.error_code(),
            message,
            rule,
            details,
            retryable: err.is_retryable(),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use es_core::error::InvariantRule;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(EsError, StatusCode)> = vec![
            (
                EsError::not_found("Project", "id", 1),
                StatusCode::NOT_FOUND,
            ),
            (
                EsError::unauthenticated("no token"),
                StatusCode::UNAUTHORIZED,
            ),
            (EsError::forbidden("role"), StatusCode::FORBIDDEN),
            (
                EsError::unsupported_bulletin_type("rotary"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                EsError::invariant(InvariantRule::CollaboratorLimit, "full"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                EsError::upstream("storage", "down"),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let response = ApiError(EsError::Internal("secret detail".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
