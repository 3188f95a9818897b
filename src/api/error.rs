//! API error taxonomy and its HTTP mapping.
//!
//! Handlers propagate with `?`; the `ResponseError` impl turns each variant
//! into a generic user-facing message with the matching status code. Store
//! and lookup causes are logged for operators, never returned verbatim.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::api::models::ApiResponse;
use crate::images::LookupError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("store query failed")]
    Store(#[from] sqlx::Error),
    #[error("image lookup failed")]
    Lookup(#[from] LookupError),
}

impl ApiError {
    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Store(_) => "error querying inventory".to_string(),
            Self::Lookup(_) => "error resolving set image".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Store(cause) => {
                tracing::error!(error = %cause, "store query failed");
            }
            Self::Lookup(cause) => {
                tracing::error!(error = %cause, "image lookup failed");
            }
            _ => {}
        }
        HttpResponse::build(self.status_code())
            .json(ApiResponse::<()>::error(self.public_message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_the_taxonomy() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Store(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Lookup(LookupError::NotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_causes_never_reach_the_public_message() {
        let msg = ApiError::Store(sqlx::Error::PoolClosed).public_message();
        assert_eq!(msg, "error querying inventory");
    }
}
