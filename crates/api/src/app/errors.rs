use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;
use tracing::Level;

use billing_core::DomainError;
use billing_infra::RepositoryError;

/// Errors returned by the invoice handlers.
///
/// Every variant maps to a status, a machine-readable code and a log
/// severity; the response body is `{ "error": code, "message": text }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body")]
    InvalidBody(String),

    #[error("invalid request query")]
    InvalidQuery(String),

    #[error("invalid invoice id")]
    InvalidId(String),

    #[error("invoice not found")]
    NotFound,

    #[error("invoice already exists")]
    Conflict,

    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::InvalidQuery(_) | ApiError::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidBody(_) => "invalid_body",
            ApiError::InvalidQuery(_) => "invalid_query",
            ApiError::InvalidId(_) => "invalid_id",
            ApiError::NotFound => "not_found",
            ApiError::Conflict => "conflict",
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn severity(&self) -> Level {
        if self.status().is_server_error() {
            Level::ERROR
        } else {
            Level::WARN
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            ApiError::InvalidBody(d)
            | ApiError::InvalidQuery(d)
            | ApiError::InvalidId(d)
            | ApiError::Internal(d) => Some(d),
            ApiError::NotFound | ApiError::Conflict => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let detail = self.detail().unwrap_or_default();
        if self.severity() == Level::ERROR {
            tracing::error!(code = self.code(), detail, "{self}");
        } else {
            tracing::warn!(code = self.code(), detail, "{self}");
        }

        // Internal details stay in the logs.
        let message = match &self {
            ApiError::Internal(_) => self.to_string(),
            _ => match self.detail() {
                Some(d) => format!("{self}: {d}"),
                None => self.to_string(),
            },
        };
        json_error(self.status(), self.code(), message)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ApiError::NotFound,
            RepositoryError::Conflict(_) => ApiError::Conflict,
            RepositoryError::Domain(e) => e.into(),
            e @ RepositoryError::Backend { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::InvalidBody(msg),
            DomainError::InvalidId(msg) => ApiError::InvalidId(msg),
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_to_statuses() {
        assert_eq!(ApiError::from(RepositoryError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(RepositoryError::backend("list", "boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(RepositoryError::Domain(DomainError::validation("amount"))).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn client_errors_log_as_warnings() {
        assert_eq!(ApiError::NotFound.severity(), Level::WARN);
        assert_eq!(ApiError::InvalidId("x".into()).severity(), Level::WARN);
        assert_eq!(ApiError::Internal("db down".into()).severity(), Level::ERROR);
    }
}
