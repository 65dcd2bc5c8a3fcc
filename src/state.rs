use actix_web::web;
use std::sync::Arc;

use crate::accounts::AccountService;
use crate::auth::{HashingError, PasswordHasher, TokenCodec};
use crate::routes;
use crate::store::{AccountStore, TaskStore};

/// Shared services mounted on every worker.
///
/// Built once at startup and cloned into each `App`; every field is
/// reference-counted and read-only after construction.
#[derive(Clone)]
pub struct AppState {
    accounts: web::Data<AccountService>,
    tasks: web::Data<dyn TaskStore>,
    codec: Arc<TokenCodec>,
}

impl AppState {
    /// Wires the account service and task handlers to a single store.
    pub fn new<S>(
        store: Arc<S>,
        codec: TokenCodec,
        hasher: PasswordHasher,
    ) -> Result<Self, HashingError>
    where
        S: AccountStore + TaskStore + 'static,
    {
        Self::with_stores(store.clone(), store, codec, hasher)
    }

    /// Wires accounts and tasks to separate stores.
    pub fn with_stores(
        accounts: Arc<dyn AccountStore>,
        tasks: Arc<dyn TaskStore>,
        codec: TokenCodec,
        hasher: PasswordHasher,
    ) -> Result<Self, HashingError> {
        let codec = Arc::new(codec);
        let accounts = AccountService::new(accounts, hasher, Arc::clone(&codec))?;

        Ok(Self {
            accounts: web::Data::new(accounts),
            tasks: web::Data::from(tasks),
            codec,
        })
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Registers shared data and the route table on `cfg`.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.accounts.clone())
            .app_data(self.tasks.clone());
        routes::config(cfg, Arc::clone(&self.codec));
    }
}
