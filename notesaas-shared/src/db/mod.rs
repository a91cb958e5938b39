/// PostgreSQL plumbing
///
/// - `pool`: connection pool creation and health checks
/// - `migrations`: embedded schema migrations
///
/// Queries themselves live on the models (see [`crate::models`]) and are
/// exposed to the rest of the crate through [`crate::store::postgres::PgStore`].

pub mod migrations;
pub mod pool;
