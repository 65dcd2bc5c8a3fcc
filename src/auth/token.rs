use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::TOKEN_TTL_HOURS;

/// Signing algorithm used for issued tokens.
const ISSUE_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted on verification. All of them are HMAC.
const MAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Claims encoded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Email of the subject at issuance.
    pub email: String,
    /// Account id of the subject.
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch. The token is valid strictly before it.
    pub exp: i64,
}

/// Why a token could not be issued or verified.
///
/// The verification kinds stay distinct for logs and tests; the HTTP layer
/// collapses all of them into one unauthorized response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("signing secret is empty")]
    EmptySecret,
    #[error("token subject is missing an email")]
    MissingSubject,
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("token could not be decoded")]
    Malformed,
    #[error("token is not signed with an HMAC algorithm")]
    AlgorithmMismatch,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
}

#[derive(Deserialize)]
struct RawHeader {
    alg: Option<String>,
}

/// Issues and verifies HMAC-signed access tokens.
///
/// Built once from the configured secret and shared read-only by every
/// worker; verification depends only on the token, the secret and the clock.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ISSUE_ALGORITHM)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Fails with `TokenError::EmptySecret` when `secret` is empty, so an
    /// unusable secret surfaces at startup instead of producing forgeable tokens.
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(ISSUE_ALGORITHM);
        validation.algorithms = MAC_ALGORITHMS.to_vec();
        // Expiry is checked against our own clock, strictly, after the signature.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, email: &str, user_id: i64) -> Result<String, TokenError> {
        self.issue_at(email, user_id, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        email: &str,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if email.is_empty() {
            return Err(TokenError::MissingSubject);
        }

        let claims = Claims {
            email: email.to_string(),
            user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(ISSUE_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies `token` and returns the subject id it was issued for.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        self.verify_at(token, Utc::now()).map(|claims| claims.user_id)
    }

    /// Verifies `token` against the clock value `now` and returns its claims.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        check_algorithm(token)?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => TokenError::AlgorithmMismatch,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Rejects tokens whose header names no algorithm or a non-HMAC one.
///
/// `alg: none` and asymmetric algorithms never reach signature checking.
fn check_algorithm(token: &str) -> Result<(), TokenError> {
    let header_segment = token.split('.').next().unwrap_or_default();
    let raw = URL_SAFE_NO_PAD
        .decode(header_segment)
        .map_err(|_| TokenError::Malformed)?;
    let header: RawHeader = serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;

    match header.alg.as_deref() {
        Some("HS256" | "HS384" | "HS512") => Ok(()),
        _ => Err(TokenError::AlgorithmMismatch),
    }
}
