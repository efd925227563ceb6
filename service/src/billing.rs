//! Time-based play charge calculation.
//!
//! The single source of billing arithmetic: both live bill previews and
//! final settlement go through [`time_charge`], so a previewed amount and
//! the amount persisted at the same instant are always identical.

use common::{DateTime, Money};
use rust_decimal::Decimal;

/// Number of milliseconds in one hour.
const MS_PER_HOUR: Decimal = Decimal::from_parts(3_600_000, 0, 0, false, 0);

/// Computes the charge for playing from `from` to `to` at the given price
/// per hour.
///
/// Partial hours are billed proportionally (elapsed milliseconds divided by
/// 3,600,000), and the final amount is rounded up to the nearest 1000 in one
/// step. Intermediate values stay exact, so summing charges over several
/// tables never accumulates rounding drift.
///
/// An interval with `to` earlier than `from` counts as zero elapsed time and
/// yields a zero charge.
#[must_use]
pub fn time_charge(
    from: DateTime,
    to: DateTime,
    price_per_hour: Money,
) -> Money {
    let elapsed_ms = if to > from {
        Decimal::from(u64::try_from((to - from).as_millis()).unwrap_or(u64::MAX))
    } else {
        Decimal::ZERO
    };

    Money {
        amount: ceil_to_thousand(
            elapsed_ms * price_per_hour.amount / MS_PER_HOUR,
        ),
        currency: price_per_hour.currency,
    }
}

/// Rounds the given `amount` up to the nearest multiple of 1000.
fn ceil_to_thousand(amount: Decimal) -> Decimal {
    (amount / Decimal::ONE_THOUSAND).ceil() * Decimal::ONE_THOUSAND
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{money::Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use super::time_charge;

    fn at(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn vnd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Vnd,
        }
    }

    #[test]
    fn bills_partial_hours_proportionally() {
        // 1.5h at 50,000/hr is already a multiple of 1000.
        assert_eq!(
            time_charge(
                at("2024-05-04T10:00:00Z"),
                at("2024-05-04T11:30:00Z"),
                vnd("50000"),
            ),
            vnd("75000"),
        );
    }

    #[test]
    fn whole_hours_need_no_rounding() {
        assert_eq!(
            time_charge(
                at("2024-05-04T10:00:00Z"),
                at("2024-05-04T11:00:00Z"),
                vnd("33000"),
            ),
            vnd("33000"),
        );
    }

    #[test]
    fn rounds_fractional_thousands_up_once() {
        // 1h10m at 33,000/hr is 38,500 exactly, rounded up to 39,000.
        assert_eq!(
            time_charge(
                at("2024-05-04T10:00:00Z"),
                at("2024-05-04T11:10:00Z"),
                vnd("33000"),
            ),
            vnd("39000"),
        );
    }

    #[test]
    fn clamps_reversed_interval_to_zero() {
        assert_eq!(
            time_charge(
                at("2024-05-04T11:30:00Z"),
                at("2024-05-04T10:00:00Z"),
                vnd("50000"),
            ),
            vnd("0"),
        );
    }

    #[test]
    fn zero_elapsed_and_zero_rate_charge_nothing() {
        let start = at("2024-05-04T10:00:00Z");

        assert_eq!(time_charge(start, start, vnd("50000")), vnd("0"));
        assert_eq!(
            time_charge(start, at("2024-05-04T12:00:00Z"), vnd("0")),
            vnd("0"),
        );
    }

    #[test]
    fn charge_is_monotonic_and_thousand_aligned() {
        let rate = vnd("47000");
        let start = at("2024-05-04T10:00:00Z");

        let mut prev = Decimal::ZERO;
        for minutes in [0_u64, 1, 7, 30, 59, 60, 61, 90, 120, 600] {
            let charge =
                time_charge(start, start + Duration::from_secs(minutes * 60), rate);

            assert!(charge.amount >= Decimal::ZERO);
            assert!(charge.amount >= prev, "not monotonic at {minutes}m");
            assert_eq!(
                charge.amount % Decimal::ONE_THOUSAND,
                Decimal::ZERO,
                "not a multiple of 1000 at {minutes}m",
            );
            prev = charge.amount;
        }
    }
}
