//! Fine computation
//!
//! Pure functions; the clock is always an explicit `today` parameter so
//! tests can pin dates. Day counts are floored at zero - a return on or
//! before the due date carries no fine.

use biblio_util::Money;
use chrono::NaiveDate;

/// Whole days `today` is past `due`, never negative.
pub fn days_overdue(today: NaiveDate, due: NaiveDate) -> i64 {
    (today - due).num_days().max(0)
}

/// Fine owed on a single loan: `rate` per overdue day.
pub fn fine_amount(today: NaiveDate, due: NaiveDate, rate: Money) -> Money {
    rate * days_overdue(today, due)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn no_fine_on_or_before_due_date() {
        let due = date(2026, 3, 6);
        let rate = Money::from_cents(2000);

        assert_eq!(fine_amount(due, due, rate), Money::ZERO);
        assert_eq!(fine_amount(date(2026, 3, 1), due, rate), Money::ZERO);
        assert_eq!(days_overdue(date(2026, 3, 1), due), 0);
    }

    #[test]
    fn fine_scales_with_days_late() {
        let due = date(2026, 3, 6);
        let rate = Money::from_cents(2000);

        assert_eq!(fine_amount(date(2026, 3, 7), due, rate), Money::from_cents(2000));
        assert_eq!(fine_amount(date(2026, 3, 9), due, rate), Money::from_cents(6000));
    }

    #[test]
    fn fine_is_monotonic_in_today() {
        let due = date(2026, 3, 6);
        let rate = Money::from_cents(50);

        let mut previous = Money::ZERO;
        for offset in -3..30 {
            let today = due + chrono::Duration::days(offset);
            let fine = fine_amount(today, due, rate);
            assert!(fine >= previous, "fine decreased at offset {offset}");
            assert!(fine >= Money::ZERO);
            previous = fine;
        }
    }
}
