pub mod extractors;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthenticatedSubject;
pub use middleware::IdentityMiddleware;
pub use password::{HashingError, PasswordHasher};
pub use token::{Claims, TokenCodec, TokenError};

/// Represents the payload for a new account signup request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Email address for the new account. Must be a valid email format.
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: String,
    /// Plaintext password. Must not be empty.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    /// Access token to send back verbatim in the `Authorization` header.
    pub token: String,
}
