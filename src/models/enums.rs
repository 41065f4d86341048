//! Shared domain enums, stored as smallint codes

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Postgres};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// MembershipTier
// ---------------------------------------------------------------------------

/// Patron membership tiers. The concurrent-loan limit is derived from the
/// tier rather than stored per patron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum MembershipTier {
    Standard = 0,
    Premium = 1,
}

impl MembershipTier {
    /// Maximum number of simultaneously active loans for this tier.
    pub fn max_concurrent_loans(self) -> i64 {
        match self {
            MembershipTier::Standard => 3,
            MembershipTier::Premium => 5,
        }
    }
}

impl From<i16> for MembershipTier {
    fn from(v: i16) -> Self {
        match v {
            1 => MembershipTier::Premium,
            _ => MembershipTier::Standard,
        }
    }
}

impl From<MembershipTier> for i16 {
    fn from(t: MembershipTier) -> Self {
        t as i16
    }
}

impl std::fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MembershipTier::Standard => "Standard",
            MembershipTier::Premium => "Premium",
        };
        write!(f, "{}", label)
    }
}

impl sqlx::Type<Postgres> for MembershipTier {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i16 as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for MembershipTier {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let v: i16 = Decode::<Postgres>::decode(value)?;
        Ok(MembershipTier::from(v))
    }
}

// ---------------------------------------------------------------------------
// PatronRole
// ---------------------------------------------------------------------------

/// Patron roles. A flat enum replacing the User/Admin hierarchy of the
/// legacy system; administrative privileges are an authorization concern
/// outside the lending core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum PatronRole {
    Member = 0,
    Librarian = 1,
}

impl From<i16> for PatronRole {
    fn from(v: i16) -> Self {
        match v {
            1 => PatronRole::Librarian,
            _ => PatronRole::Member,
        }
    }
}

impl From<PatronRole> for i16 {
    fn from(r: PatronRole) -> Self {
        r as i16
    }
}

impl sqlx::Type<Postgres> for PatronRole {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i16 as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for PatronRole {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let v: i16 = Decode::<Postgres>::decode(value)?;
        Ok(PatronRole::from(v))
    }
}

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Loan lifecycle states. Active -> Completed is the only transition; a
/// completed loan is immutable history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum LoanStatus {
    Active = 0,
    Completed = 1,
}

impl From<i16> for LoanStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => LoanStatus::Completed,
            _ => LoanStatus::Active,
        }
    }
}

impl From<LoanStatus> for i16 {
    fn from(s: LoanStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanStatus::Active => "active",
            LoanStatus::Completed => "completed",
        };
        write!(f, "{}", label)
    }
}

impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i16 as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let v: i16 = Decode::<Postgres>::decode(value)?;
        Ok(LoanStatus::from(v))
    }
}

// ---------------------------------------------------------------------------
// FineStatus
// ---------------------------------------------------------------------------

/// Fine record states. Payment processing is out of scope; fines are
/// recorded as pending and settled elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum FineStatus {
    Pending = 0,
    Paid = 1,
}

impl From<i16> for FineStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => FineStatus::Paid,
            _ => FineStatus::Pending,
        }
    }
}

impl From<FineStatus> for i16 {
    fn from(s: FineStatus) -> Self {
        s as i16
    }
}

impl sqlx::Type<Postgres> for FineStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i16 as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for FineStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let v: i16 = Decode::<Postgres>::decode(value)?;
        Ok(FineStatus::from(v))
    }
}
