/// Database models for the notes service
///
/// This module contains all models and their PostgreSQL operations.
///
/// # Models
///
/// - [`tenant`]: Organizations and their billing plan
/// - [`user`]: Accounts, each bound to one tenant with a fixed role
/// - [`note`]: Notes, each bound to one tenant and one owner
///
/// # Example
///
/// ```no_run
/// use notesaas_shared::models::{note::Note, tenant::Tenant};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let tenant = Tenant::find_by_slug(&pool, "acme").await?.expect("seeded");
/// let notes = Note::list_by_tenant(&pool, tenant.id).await?;
/// println!("{} has {} notes", tenant.name, notes.len());
/// # Ok(())
/// # }
/// ```

pub mod note;
pub mod tenant;
pub mod user;
