//! Signup and login.
//!
//! Signup hashes the password and persists the account. Login loads the
//! account, verifies the password and issues an access token. Both login
//! failure paths (unknown email, wrong password) return the same
//! `AppError::InvalidCredentials` and cost the same hashing work.

use actix_web::web;
use std::sync::Arc;
use validator::Validate;

use crate::auth::{HashingError, LoginRequest, PasswordHasher, SignupRequest, TokenCodec};
use crate::error::{AppError, ACCOUNT_BODY_INVALID};
use crate::models::Account;
use crate::store::{AccountStore, NewAccount};

const SIGNUP_FAILED: &str = "Unable to save the user";

pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
    /// Verified against when the email is unknown.
    dummy_digest: String,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: PasswordHasher,
        codec: Arc<TokenCodec>,
    ) -> Result<Self, HashingError> {
        let dummy_digest = hasher.hash("dummy password for unknown accounts")?;
        Ok(Self {
            store,
            hasher,
            codec,
            dummy_digest,
        })
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<Account, AppError> {
        request.validate().map_err(|e| {
            log::debug!("signup rejected: {}", e);
            AppError::Validation(ACCOUNT_BODY_INVALID.into())
        })?;

        let hasher = self.hasher;
        let password = request.password;
        let password_digest = web::block(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::internal(SIGNUP_FAILED, e))?
            .map_err(|e| AppError::internal(SIGNUP_FAILED, e))?;

        let account = self
            .store
            .insert_account(NewAccount {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                password_digest,
            })
            .await
            .map_err(|e| AppError::persistence(SIGNUP_FAILED, e))?;

        log::info!("account {} created", account.id);
        Ok(account)
    }

    /// Returns a fresh access token for the account behind `request.email`.
    pub async fn login(&self, request: LoginRequest) -> Result<String, AppError> {
        request.validate().map_err(|e| {
            log::debug!("login rejected: {}", e);
            AppError::Validation(ACCOUNT_BODY_INVALID.into())
        })?;

        let account = self
            .store
            .find_account_by_email(&request.email)
            .await
            .map_err(|e| {
                log::error!("login lookup failed: {}", e);
                AppError::InvalidCredentials
            })?;

        let digest = match &account {
            Some(account) => account.password_digest.clone(),
            None => self.dummy_digest.clone(),
        };
        let hasher = self.hasher;
        let password = request.password;
        let matches = web::block(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| {
                log::error!("password verification did not complete: {}", e);
                AppError::InvalidCredentials
            })?;

        let account = match account {
            Some(account) if matches && account.is_active => account,
            Some(account) => {
                log::info!("login rejected for account {}", account.id);
                return Err(AppError::InvalidCredentials);
            }
            None => {
                log::info!("login rejected for unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        self.codec.issue(&account.email, account.id).map_err(|e| {
            log::error!("token issuance failed for account {}: {}", account.id, e);
            AppError::InvalidCredentials
        })
    }
}
