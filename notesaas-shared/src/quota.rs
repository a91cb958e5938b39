/// Plan-based note quota
///
/// Free tenants may hold at most [`FREE_PLAN_NOTE_LIMIT`] notes at any time;
/// Pro tenants are unlimited. Creation beyond the limit is rejected, never
/// truncated.
///
/// The check itself is pure. Stores call it while holding a per-tenant lock
/// (a row lock in PostgreSQL, the write lock in memory) so that the count
/// and the insert happen atomically.
///
/// # Example
///
/// ```
/// use notesaas_shared::models::tenant::TenantPlan;
/// use notesaas_shared::quota::{enforce_note_quota, QuotaLimits};
///
/// let limits = QuotaLimits::for_plan(TenantPlan::Free);
/// assert!(limits.check(2).allowed);
/// assert!(!limits.check(3).allowed);
///
/// assert!(enforce_note_quota(TenantPlan::Pro, 1_000).is_ok());
/// ```

use crate::models::tenant::TenantPlan;

/// Maximum number of notes a Free tenant may hold
pub const FREE_PLAN_NOTE_LIMIT: u32 = 3;

/// Quota enforcement error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuotaError {
    /// The tenant already holds as many notes as its plan allows
    #[error("Note limit exceeded for {plan:?} plan ({current}/{limit})")]
    LimitExceeded {
        plan: TenantPlan,
        limit: u32,
        current: u64,
    },
}

/// Limits attached to a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    /// Maximum notes per tenant (None = unlimited)
    pub max_notes: Option<u32>,
}

impl QuotaLimits {
    /// Gets quota limits for a tenant plan
    pub fn for_plan(plan: TenantPlan) -> Self {
        match plan {
            TenantPlan::Free => QuotaLimits {
                max_notes: Some(FREE_PLAN_NOTE_LIMIT),
            },
            TenantPlan::Pro => QuotaLimits { max_notes: None },
        }
    }

    /// Checks whether one more note fits next to `current` existing notes
    pub fn check(&self, current: u64) -> QuotaCheckResult {
        match self.max_notes {
            Some(limit) if current >= u64::from(limit) => QuotaCheckResult::exceeded(current, limit),
            Some(limit) => QuotaCheckResult::allowed(current, Some(limit)),
            None => QuotaCheckResult::allowed(current, None),
        }
    }
}

/// Result of a quota check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaCheckResult {
    /// Whether another note may be created
    pub allowed: bool,

    /// Notes currently held
    pub current: u64,

    /// Plan limit (None = unlimited)
    pub limit: Option<u32>,

    /// Notes that can still be created (None = unlimited)
    pub remaining: Option<u64>,
}

impl QuotaCheckResult {
    fn allowed(current: u64, limit: Option<u32>) -> Self {
        QuotaCheckResult {
            allowed: true,
            current,
            limit,
            remaining: limit.map(|l| u64::from(l).saturating_sub(current)),
        }
    }

    fn exceeded(current: u64, limit: u32) -> Self {
        QuotaCheckResult {
            allowed: false,
            current,
            limit: Some(limit),
            remaining: Some(0),
        }
    }
}

/// Returns an error if a tenant on `plan` holding `current` notes may not
/// create another one
pub fn enforce_note_quota(plan: TenantPlan, current: u64) -> Result<QuotaCheckResult, QuotaError> {
    let result = QuotaLimits::for_plan(plan).check(current);

    if !result.allowed {
        return Err(QuotaError::LimitExceeded {
            plan,
            limit: result.limit.unwrap_or(0),
            current,
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_limits_free() {
        let limits = QuotaLimits::for_plan(TenantPlan::Free);
        assert_eq!(limits.max_notes, Some(3));
    }

    #[test]
    fn test_quota_limits_pro_is_unlimited() {
        let limits = QuotaLimits::for_plan(TenantPlan::Pro);
        assert_eq!(limits.max_notes, None);

        let result = limits.check(10_000);
        assert!(result.allowed);
        assert_eq!(result.remaining, None);
    }

    #[test]
    fn test_free_plan_boundary() {
        let limits = QuotaLimits::for_plan(TenantPlan::Free);

        let result = limits.check(2);
        assert!(result.allowed);
        assert_eq!(result.remaining, Some(1));

        let result = limits.check(3);
        assert!(!result.allowed);
        assert_eq!(result.remaining, Some(0));
        assert_eq!(result.limit, Some(3));
    }

    #[test]
    fn test_over_limit_stays_rejected() {
        // A tenant can end up above the limit only through data imported
        // outside the API; it must still be rejected.
        let result = QuotaLimits::for_plan(TenantPlan::Free).check(7);
        assert!(!result.allowed);
        assert_eq!(result.remaining, Some(0));
    }

    #[test]
    fn test_enforce_note_quota() {
        assert!(enforce_note_quota(TenantPlan::Free, 0).is_ok());

        let err = enforce_note_quota(TenantPlan::Free, 3).unwrap_err();
        assert_eq!(
            err,
            QuotaError::LimitExceeded {
                plan: TenantPlan::Free,
                limit: 3,
                current: 3,
            }
        );
        assert_eq!(err.to_string(), "Note limit exceeded for Free plan (3/3)");
    }
}
