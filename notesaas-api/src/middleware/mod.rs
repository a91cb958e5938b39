/// Middleware modules for the API server
///
/// - `security`: Security response headers
///
/// Authentication lives in `notesaas_shared::auth::middleware` and is
/// wired up in [`crate::app`].

pub mod security;
