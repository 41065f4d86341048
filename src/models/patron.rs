//! Patron model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{MembershipTier, PatronRole};

/// Library member. The lending core only reads `active` and the tier; the
/// rest is directory data.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Patron {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: PatronRole,
    pub membership_tier: MembershipTier,
    pub active: bool,
}

impl Patron {
    /// Whether this patron may open one more loan given their current
    /// active-loan count.
    pub fn can_borrow(&self, active_loans: i64) -> bool {
        self.active && active_loans < self.membership_tier.max_concurrent_loans()
    }
}

/// Create patron request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePatron {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default = "default_role")]
    pub role: PatronRole,
    #[serde(default = "default_tier")]
    pub membership_tier: MembershipTier,
}

fn default_role() -> PatronRole {
    PatronRole::Member
}

fn default_tier() -> MembershipTier {
    MembershipTier::Standard
}

/// Update patron request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePatron {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<PatronRole>,
    pub membership_tier: Option<MembershipTier>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patron(tier: MembershipTier, active: bool) -> Patron {
        Patron {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.org".into(),
            phone: None,
            role: PatronRole::Member,
            membership_tier: tier,
            active,
        }
    }

    #[test]
    fn standard_tier_caps_at_three() {
        let p = patron(MembershipTier::Standard, true);
        assert!(p.can_borrow(2));
        assert!(!p.can_borrow(3));
    }

    #[test]
    fn premium_tier_caps_at_five() {
        let p = patron(MembershipTier::Premium, true);
        assert!(p.can_borrow(4));
        assert!(!p.can_borrow(5));
    }

    #[test]
    fn inactive_patron_cannot_borrow() {
        let p = patron(MembershipTier::Premium, false);
        assert!(!p.can_borrow(0));
    }
}
