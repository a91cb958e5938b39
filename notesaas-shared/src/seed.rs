/// Demo data
///
/// Provisions two tenants with an admin and a member each, all sharing one
/// password. Safe to run on every start: tenants and users are upserted
/// by slug and email, and an upgraded tenant keeps its plan.
///
/// | Tenant | Users |
/// |---|---|
/// | `acme` (Acme) | `admin@acme.test` (Admin), `user@acme.test` (Member) |
/// | `globex` (Globex) | `admin@globex.test` (Admin), `user@globex.test` (Member) |

use tracing::info;

use crate::auth::password::{hash_password_blocking, PasswordError};
use crate::models::user::{CreateUser, Role};
use crate::store::{Store, StoreError};

/// Password of every demo account
pub const DEMO_PASSWORD: &str = "password";

const DEMO_TENANTS: [(&str, &str); 2] = [("acme", "Acme"), ("globex", "Globex")];

/// Seeding failure
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Counts of what a seed run touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub tenants: usize,
    pub users: usize,
}

/// Upserts the demo tenants and users
pub async fn seed_demo_data(store: &dyn Store) -> Result<SeedSummary, SeedError> {
    let password_hash = hash_password_blocking(DEMO_PASSWORD.to_string()).await?;
    let mut summary = SeedSummary { tenants: 0, users: 0 };

    for (slug, name) in DEMO_TENANTS {
        let tenant = store.upsert_tenant(slug, name).await?;
        summary.tenants += 1;

        for (local, role) in [("admin", Role::Admin), ("user", Role::Member)] {
            store
                .upsert_user(CreateUser {
                    email: format!("{}@{}.test", local, slug),
                    password_hash: password_hash.clone(),
                    role,
                    tenant_id: tenant.id,
                })
                .await?;
            summary.users += 1;
        }
    }

    info!(tenants = summary.tenants, users = summary.users, "Demo data seeded");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tenant::TenantPlan;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_seed_is_idempotent_and_keeps_plan() {
        let store = MemoryStore::new();

        let first = seed_demo_data(&store).await.unwrap();
        assert_eq!(first, SeedSummary { tenants: 2, users: 4 });

        let acme = store.find_tenant_by_slug("acme").await.unwrap().unwrap();
        store.set_tenant_plan("acme", TenantPlan::Pro).await.unwrap();

        seed_demo_data(&store).await.unwrap();

        let again = store.find_tenant_by_slug("acme").await.unwrap().unwrap();
        assert_eq!(again.id, acme.id);
        assert_eq!(again.plan, TenantPlan::Pro);

        let user = store.find_user_by_email("user@globex.test").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Member);
    }
}
