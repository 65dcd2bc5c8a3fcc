#![doc = "The `todoguard` library crate."]
#![doc = ""]
#![doc = "A multi-user todo service: password hashing, signed access tokens, an"]
#![doc = "identity middleware and per-task ownership checks in front of a small"]
#![doc = "task store. The binary (`main.rs`) builds an [`state::AppState`] and"]
#![doc = "mounts it on an actix-web server."]

pub mod accounts;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
