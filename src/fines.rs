//! Overdue fine arithmetic
//!
//! Pure functions, no I/O: every caller passes timestamps in explicitly so
//! the computation stays deterministic under test. Fines accrue per whole
//! calendar day overdue and are uncapped.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Whole calendar days `as_of` lies past `due_at`. Zero when the loan is
/// not overdue; never negative. Partial days truncate.
pub fn days_overdue(due_at: DateTime<Utc>, as_of: DateTime<Utc>) -> i64 {
    (as_of.date_naive() - due_at.date_naive()).num_days().max(0)
}

/// Fine accrued by a loan returned at `returned_at`.
pub fn accrued(due_at: DateTime<Utc>, returned_at: DateTime<Utc>, daily_rate: Decimal) -> Decimal {
    Decimal::from(days_overdue(due_at, returned_at)) * daily_rate
}

/// Fine a still-open loan has accrued as of `now`. Used for overdue
/// reporting and outstanding-fine queries without mutating the loan.
pub fn accrued_as_of(due_at: DateTime<Utc>, now: DateTime<Utc>, daily_rate: Decimal) -> Decimal {
    accrued(due_at, now, daily_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    const RATE: Decimal = Decimal::TWO;

    #[test]
    fn three_days_late_accrues_three_times_the_rate() {
        let fine = accrued(at(2024, 1, 1), at(2024, 1, 4), RATE);
        assert_eq!(fine, Decimal::from(6));
    }

    #[test]
    fn on_time_return_accrues_nothing() {
        assert_eq!(accrued(at(2024, 1, 1), at(2024, 1, 1), RATE), Decimal::ZERO);
    }

    #[test]
    fn early_return_is_never_negative() {
        assert_eq!(accrued(at(2024, 1, 10), at(2024, 1, 4), RATE), Decimal::ZERO);
        assert_eq!(days_overdue(at(2024, 1, 10), at(2024, 1, 4)), 0);
    }

    #[test]
    fn partial_days_truncate_on_calendar_dates() {
        // Due at noon, returned the next morning: one calendar day.
        let due = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let back = Utc.with_ymd_and_hms(2024, 1, 2, 8, 30, 0).unwrap();
        assert_eq!(days_overdue(due, back), 1);
        // Same calendar date, later hour: not overdue.
        let same_day = Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap();
        assert_eq!(days_overdue(due, same_day), 0);
    }

    #[test]
    fn accrual_is_uncapped() {
        let fine = accrued(at(2023, 1, 1), at(2024, 1, 1), RATE);
        assert_eq!(fine, Decimal::from(365 * 2));
    }

    #[test]
    fn as_of_matches_closed_form() {
        let due = at(2024, 3, 1);
        let now = at(2024, 3, 9);
        assert_eq!(accrued_as_of(due, now, RATE), accrued(due, now, RATE));
    }
}
