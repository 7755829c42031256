//! Error responses: every failure leaves the API as a plain-text message with
//! a status code.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use catalog_core::format::UNEXPECTED_FAILURE;
use catalog_core::DomainError;

/// Message for request bodies that cannot be read as the expected JSON.
pub const UNREADABLE_BODY: &str = "What was that?";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Rejected by boundary validation before reaching a service.
    #[error("{0}")]
    BadRequest(String),

    #[error("unreadable request body: {0}")]
    UnreadableBody(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(err) => match err {
                DomainError::NotFound { .. } | DomainError::AssociationNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                DomainError::Conflict(_) => StatusCode::CONFLICT,
                DomainError::BadRequest(_) => StatusCode::BAD_REQUEST,
                DomainError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) | ApiError::UnreadableBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The text the client sees. Store failures are not described.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Domain(DomainError::Store(_)) => UNEXPECTED_FAILURE.to_string(),
            ApiError::UnreadableBody(_) => UNREADABLE_BODY.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::UnreadableBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.client_message();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), %message, "request rejected");
        }

        text_response(status, message)
    }
}

pub fn text_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, message.into()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{ComponentId, ProductId};

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::product_not_found(ProductId::new(1)), StatusCode::NOT_FOUND),
            (
                DomainError::association_not_found(ProductId::new(1), ComponentId::new(2)),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::already_contains(ProductId::new(1), ComponentId::new(2)),
                StatusCode::CONFLICT,
            ),
            (DomainError::bad_request("nope"), StatusCode::BAD_REQUEST),
            (DomainError::store("db down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn store_details_are_hidden_from_clients() {
        let err = ApiError::from(DomainError::store("connection refused"));
        assert_eq!(err.client_message(), "Sorry, something went wrong");
    }

    #[test]
    fn unreadable_body_has_a_fixed_message() {
        let err = ApiError::UnreadableBody("expected value at line 1".to_string());
        assert_eq!(err.client_message(), "What was that?");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
