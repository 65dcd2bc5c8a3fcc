//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the error type every handler returns.
//! Its variants follow the service's failure taxonomy: bad client input,
//! failed authentication, failed ownership checks, rejected logins and
//! storage failures.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so a handler
//! returning `Err(AppError)` produces the matching status code and a
//! `{"message": ...}` JSON body. Messages carried by the variants are the
//! client-facing text; underlying causes are logged where the error is
//! created and never reach the response.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;

/// Client-facing message for every failed identity check.
pub const UNAUTHORIZED_ACCESS: &str = "Unauthorized access";

/// Client-facing message for every failed login.
pub const LOGIN_FAILED: &str = "Unable to authenticate the user";

/// Rejected signup or login payload.
pub const ACCOUNT_BODY_INVALID: &str = "Could not parse the request body";

/// Rejected task payload.
pub const TASK_BODY_INVALID: &str = "Unable to parse request data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Malformed or missing client input (HTTP 400).
    Validation(String),
    /// Missing, invalid or expired bearer token (HTTP 401).
    Authentication,
    /// Valid identity, but the caller does not own the resource (HTTP 401).
    Authorization(String),
    /// Login rejected. Unknown email and wrong password look identical (HTTP 401).
    InvalidCredentials,
    /// Storage failure (HTTP 500).
    Persistence(String),
    /// Any other server-side failure (HTTP 500).
    Internal(String),
}

impl AppError {
    /// Logs `cause` and returns a persistence error carrying only `message`.
    pub fn persistence(message: &str, cause: impl fmt::Display) -> Self {
        log::error!("{}: {}", message, cause);
        AppError::Persistence(message.to_string())
    }

    /// Logs `cause` and returns an internal error carrying only `message`.
    pub fn internal(message: &str, cause: impl fmt::Display) -> Self {
        log::error!("{}: {}", message, cause);
        AppError::Internal(message.to_string())
    }

    fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Authorization(msg)
            | AppError::Persistence(msg)
            | AppError::Internal(msg) => msg,
            AppError::Authentication => UNAUTHORIZED_ACCESS,
            AppError::InvalidCredentials => LOGIN_FAILED,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Authentication => write!(f, "Authentication Error"),
            AppError::Authorization(msg) => write!(f, "Authorization Error: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid Credentials"),
            AppError::Persistence(msg) => write!(f, "Persistence Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication
            | AppError::Authorization(_)
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Persistence(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.message()
        }))
    }
}
