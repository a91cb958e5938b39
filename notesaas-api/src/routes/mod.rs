/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login
/// - `users`: Invitations
/// - `notes`: Note CRUD
/// - `tenants`: Plan upgrades

pub mod auth;
pub mod health;
pub mod notes;
pub mod tenants;
pub mod users;
