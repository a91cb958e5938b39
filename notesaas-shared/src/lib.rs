//! # notesaas shared library
//!
//! Domain logic of the multi-tenant notes service, used by the API server.
//!
//! ## Module Organization
//!
//! - `models`: tenants, users and notes, with their PostgreSQL queries
//! - `db`: connection pool and embedded migrations
//! - `store`: the persistence trait and its PostgreSQL and in-memory implementations
//! - `auth`: password hashing, JWT, request authentication and the authorization guard
//! - `quota`: plan-based note limits
//! - `services`: login, invitations, note CRUD and plan upgrades
//! - `seed`: demo tenants and users

pub mod auth;
pub mod db;
pub mod models;
pub mod quota;
pub mod seed;
pub mod services;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
