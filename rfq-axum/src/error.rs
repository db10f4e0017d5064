//! Mapping business refusals and storage faults to HTTP responses.
//!
//! The auction taxonomy (`AuctionFailure`) is surfaced to clients as a
//! distinct status code per class, with a typed body carrying a stable
//! `kind` tag so state conflicts and uniqueness conflicts stay
//! distinguishable even where they share a status code.

use aide::OperationOutput;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rfq_core::ports::AuctionFailure;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{Level, event};

/// The wire shape of a refused or failed request.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorBody {
    /// A stable lowercase tag identifying the failure class
    pub kind: &'static str,
    /// A human-readable explanation
    pub message: String,
}

/// An error response: a status code paired with an [`ErrorBody`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// The caller did not present a usable trading identity.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: ErrorBody {
                kind: "unauthorized",
                message: "bearer token does not resolve to a trading party".into(),
            },
        }
    }

    /// The caller is authenticated but lacks the required privilege.
    pub fn forbidden(message: &str) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            body: ErrorBody {
                kind: "access_denied",
                message: message.into(),
            },
        }
    }

    /// The referenced entity does not exist.
    pub fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                kind: "not_found",
                message: message.into(),
            },
        }
    }

    /// Log a storage fault and collapse it to a 500.
    ///
    /// Business refusals never take this path; only backend errors do, and
    /// their detail stays in the logs rather than the response.
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        event!(Level::ERROR, err = err.to_string());
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                kind: "internal",
                message: "internal server error".into(),
            },
        }
    }
}

impl From<AuctionFailure> for ApiError {
    fn from(failure: AuctionFailure) -> Self {
        let status = match failure {
            AuctionFailure::NotFound(_) => StatusCode::NOT_FOUND,
            AuctionFailure::AccessDenied(_) => StatusCode::FORBIDDEN,
            AuctionFailure::InvalidState(_) | AuctionFailure::Conflict(_) => StatusCode::CONFLICT,
            AuctionFailure::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            body: ErrorBody {
                kind: failure.kind(),
                message: failure.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl OperationOutput for ApiError {
    type Inner = ErrorBody;
}
