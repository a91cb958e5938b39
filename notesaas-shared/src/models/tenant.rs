/// Tenant model and database operations
///
/// A tenant is an isolated organization. Users and notes always belong to
/// exactly one tenant, and nothing crosses tenant boundaries.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tenants (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     slug VARCHAR(64) NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL,
///     plan VARCHAR(16) NOT NULL DEFAULT 'free',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tenants_plan_check CHECK (plan IN ('free', 'pro'))
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use notesaas_shared::models::tenant::{Tenant, TenantPlan};
/// use notesaas_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let tenant = Tenant::upsert(&pool, "acme", "Acme").await?;
/// assert_eq!(tenant.plan, TenantPlan::Free);
///
/// Tenant::set_plan(&pool, "acme", TenantPlan::Pro).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Billing plan
///
/// The plan decides the note quota (see [`crate::quota`]). Plans only ever
/// move from Free to Pro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenantPlan {
    /// Free plan, limited to three notes
    Free,

    /// Pro plan, unlimited notes
    Pro,
}

impl TenantPlan {
    /// Converts plan to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantPlan::Free => "free",
            TenantPlan::Pro => "pro",
        }
    }

    /// Parses plan from its database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "free" => Some(TenantPlan::Free),
            "pro" => Some(TenantPlan::Pro),
            _ => None,
        }
    }
}

impl Default for TenantPlan {
    fn default() -> Self {
        TenantPlan::Free
    }
}

/// Tenant model representing an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// Unique tenant ID
    pub id: Uuid,

    /// URL-safe identifier, unique and immutable
    pub slug: String,

    /// Display name
    pub name: String,

    /// Current billing plan
    pub plan: TenantPlan,

    /// When the tenant was created
    pub created_at: DateTime<Utc>,

    /// When the tenant was last updated
    pub updated_at: DateTime<Utc>,
}

/// Raw `tenants` row; `plan` is validated on conversion
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TenantRow {
    id: Uuid,
    slug: String,
    name: String,
    plan: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TenantRow> for Tenant {
    type Error = sqlx::Error;

    fn try_from(row: TenantRow) -> Result<Self, Self::Error> {
        let plan = TenantPlan::parse(&row.plan).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown tenant plan '{}'", row.plan).into())
        })?;

        Ok(Tenant {
            id: row.id,
            slug: row.slug,
            name: row.name,
            plan,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_tenant(row: Option<TenantRow>) -> Result<Option<Tenant>, sqlx::Error> {
    row.map(Tenant::try_from).transpose()
}

impl Tenant {
    /// Finds a tenant by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT id, slug, name, plan, created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        into_tenant(row)
    }

    /// Finds a tenant by slug
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use notesaas_shared::models::tenant::Tenant;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// if let Some(tenant) = Tenant::find_by_slug(&pool, "acme").await? {
    ///     println!("{} is on the {:?} plan", tenant.name, tenant.plan);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT id, slug, name, plan, created_at, updated_at
            FROM tenants
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        into_tenant(row)
    }

    /// Inserts a tenant or refreshes its name if the slug already exists
    ///
    /// New tenants start on the Free plan. The plan of an existing tenant is
    /// left untouched, so re-running the seed never downgrades anyone.
    pub async fn upsert(pool: &PgPool, slug: &str, name: &str) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            INSERT INTO tenants (slug, name, plan)
            VALUES ($1, $2, $3)
            ON CONFLICT (slug) DO UPDATE
            SET name = EXCLUDED.name, updated_at = NOW()
            RETURNING id, slug, name, plan, created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(TenantPlan::Free.as_str())
        .fetch_one(pool)
        .await?;

        Tenant::try_from(row)
    }

    /// Sets the plan of the tenant with the given slug
    ///
    /// # Returns
    ///
    /// The updated tenant, or `None` if no tenant has that slug
    pub async fn set_plan(
        pool: &PgPool,
        slug: &str,
        plan: TenantPlan,
    ) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            UPDATE tenants
            SET plan = $2, updated_at = NOW()
            WHERE slug = $1
            RETURNING id, slug, name, plan, created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(plan.as_str())
        .fetch_optional(pool)
        .await?;

        into_tenant(row)
    }

    /// Locks the tenant row for the rest of the transaction
    ///
    /// Used to serialize quota-checked note creation per tenant.
    pub(crate) async fn lock_for_update(
        conn: &mut sqlx::PgConnection,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT id, slug, name, plan, created_at, updated_at
            FROM tenants
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        into_tenant(row)
    }
}
