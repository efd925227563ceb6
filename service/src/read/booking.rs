//! [`Booking`] read models definitions.

use common::{money::Currency, DateTime, Money};

use crate::{
    billing,
    domain::{
        booking::{self, occupancy, Occupancy},
        order, table, Booking, Order,
    },
};

/// Wrapper around [`Booking`] indicating that it [`is_open()`].
///
/// [`is_open()`]: Booking::is_open
#[derive(Clone, Debug)]
pub struct Open<T>(pub T);

/// Itemized bill of a [`Booking`].
///
/// Built by one shared computation for both the live preview shown to
/// polling dashboards and the amount persisted by settlement, so the two
/// can never diverge: settling at the instant a preview was taken persists
/// exactly the previewed grand total.
#[derive(Clone, Debug)]
pub struct Bill {
    /// ID of the billed [`Booking`].
    pub booking_id: booking::Id,

    /// Time charge of every [`Occupancy`] of the [`Booking`].
    pub table_charges: Vec<TableCharge>,

    /// Charge of every billable [`Order`] of the [`Booking`].
    pub order_charges: Vec<OrderCharge>,

    /// Sum of all [`table_charges`] amounts.
    ///
    /// [`table_charges`]: Bill::table_charges
    pub table_total: Money,

    /// Sum of all [`order_charges`] amounts.
    ///
    /// [`order_charges`]: Bill::order_charges
    pub order_total: Money,

    /// `table_total + order_total`. The exact sum, no further rounding.
    pub grand_total: Money,

    /// Instant this [`Bill`] was computed at.
    pub computed_at: DateTime,
}

/// One [`Occupancy`] line of a [`Bill`].
#[derive(Clone, Copy, Debug)]
pub struct TableCharge {
    /// ID of the billed [`Occupancy`].
    pub occupancy_id: occupancy::Id,

    /// ID of the occupied [`Table`].
    ///
    /// [`Table`]: crate::domain::Table
    pub table_id: table::Id,

    /// [`DateTime`] the [`Occupancy`] started at.
    ///
    /// [`DateTime`]: common::DateTime
    pub started_at: occupancy::StartDateTime,

    /// End bound the charge was computed with: the recorded end of the
    /// [`Occupancy`], or the [`Bill`]'s instant while it's still open.
    pub ended_at: occupancy::EndDateTime,

    /// Time charge of the [`Occupancy`], rounded up to the nearest 1000.
    pub amount: Money,
}

/// One [`Order`] line of a [`Bill`].
#[derive(Clone, Copy, Debug)]
pub struct OrderCharge {
    /// ID of the billed [`Order`].
    pub order_id: order::Id,

    /// Total of the [`Order`], as recorded at its creation.
    pub amount: Money,
}

impl Bill {
    /// Computes the [`Bill`] of the given [`Booking`] at the `at` instant.
    ///
    /// Open [`Occupancy`]s are billed as if they ended at `at`, ended ones
    /// keep their recorded end, and cancelled [`Order`]s are skipped. A
    /// [`Booking`] without occupancies and orders bills to zero in the
    /// club's bookkeeping `currency`.
    #[must_use]
    pub fn compute(
        booking: &Booking,
        occupancies: &[Occupancy],
        orders: &[Order],
        at: DateTime,
        currency: Currency,
    ) -> Self {
        let table_charges: Vec<_> = occupancies
            .iter()
            .map(|o| {
                let ended_at = o.ended_at.unwrap_or_else(|| at.coerce());
                TableCharge {
                    occupancy_id: o.id,
                    table_id: o.table_id,
                    started_at: o.started_at,
                    ended_at,
                    amount: billing::time_charge(
                        o.started_at.coerce(),
                        ended_at.coerce(),
                        o.price_per_hour,
                    ),
                }
            })
            .collect();

        let order_charges: Vec<_> = orders
            .iter()
            .filter(|o| o.is_billable())
            .map(|o| OrderCharge {
                order_id: o.id,
                amount: o.total,
            })
            .collect();

        let table_total =
            total(table_charges.iter().map(|c| c.amount), currency);
        let order_total =
            total(order_charges.iter().map(|c| c.amount), currency);
        let grand_total = Money {
            amount: table_total.amount + order_total.amount,
            currency,
        };

        Self {
            booking_id: booking.id,
            table_charges,
            order_charges,
            table_total,
            order_total,
            grand_total,
            computed_at: at,
        }
    }
}

/// Sums the given amounts, labeling the result with the club's bookkeeping
/// `currency`.
///
/// All rates and order totals are recorded in that currency by construction.
fn total(amounts: impl Iterator<Item = Money>, currency: Currency) -> Money {
    Money {
        amount: amounts.map(|m| m.amount).sum(),
        currency,
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateTime, Money};

    use super::Bill;
    use crate::domain::{
        booking::{self, occupancy, Occupancy},
        order, table, Booking, Order,
    };

    fn at(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn vnd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Vnd,
        }
    }

    fn confirmed_booking() -> Booking {
        Booking {
            id: booking::Id::new(),
            customer_id: None,
            status: booking::Status::Confirmed,
            note: None,
            started_at: at("2024-05-04T10:00:00Z").coerce(),
            ended_at: None,
            total: None,
        }
    }

    fn occupancy(
        booking: &Booking,
        started: &str,
        ended: Option<&str>,
        rate: &str,
    ) -> Occupancy {
        Occupancy {
            id: occupancy::Id::new(),
            booking_id: booking.id,
            table_id: table::Id::new(),
            price_per_hour: vnd(rate),
            started_at: at(started).coerce(),
            ended_at: ended.map(|e| at(e).coerce()),
        }
    }

    fn order(booking: &Booking, status: order::Status, total: &str) -> Order {
        Order {
            id: order::Id::new(),
            booking_id: Some(booking.id),
            status,
            total: vnd(total),
            created_at: at("2024-05-04T10:05:00Z").coerce(),
        }
    }

    #[test]
    fn ticking_occupancy_is_billed_up_to_the_requested_instant() {
        let b = confirmed_booking();
        let occ = occupancy(&b, "2024-05-04T10:00:00Z", None, "50000");

        let bill = Bill::compute(
            &b,
            &[occ],
            &[],
            at("2024-05-04T11:30:00Z"),
            Currency::Vnd,
        );

        assert_eq!(bill.table_total, vnd("75000"));
        assert_eq!(bill.order_total, vnd("0"));
        assert_eq!(bill.grand_total, vnd("75000"));
        assert_eq!(
            bill.table_charges[0].ended_at,
            at("2024-05-04T11:30:00Z").coerce(),
        );
    }

    #[test]
    fn ended_occupancies_keep_their_recorded_end() {
        let b = confirmed_booking();
        let ended = occupancy(
            &b,
            "2024-05-04T10:00:00Z",
            Some("2024-05-04T11:00:00Z"),
            "48000",
        );
        let open = occupancy(&b, "2024-05-04T10:30:00Z", None, "48000");

        let bill = Bill::compute(
            &b,
            &[ended.clone(), open],
            &[],
            at("2024-05-04T11:15:00Z"),
            Currency::Vnd,
        );

        // 1h and 45m at 48,000/hr.
        assert_eq!(bill.table_charges[0].amount, vnd("48000"));
        assert_eq!(bill.table_charges[1].amount, vnd("36000"));
        assert_eq!(bill.table_total, vnd("84000"));

        assert_eq!(bill.table_charges[0].ended_at, ended.ended_at.unwrap());
        assert_eq!(
            bill.table_charges[1].ended_at,
            at("2024-05-04T11:15:00Z").coerce(),
        );
    }

    #[test]
    fn cancelled_orders_are_excluded() {
        let b = confirmed_booking();
        let kept = order(&b, order::Status::Completed, "50000");
        let voided = order(&b, order::Status::Cancelled, "30000");

        let bill = Bill::compute(
            &b,
            &[],
            &[kept.clone(), voided],
            at("2024-05-04T11:00:00Z"),
            Currency::Vnd,
        );

        assert_eq!(bill.order_charges.len(), 1);
        assert_eq!(bill.order_charges[0].order_id, kept.id);
        assert_eq!(bill.order_total, vnd("50000"));
        assert_eq!(bill.grand_total, vnd("50000"));
    }

    #[test]
    fn empty_booking_bills_to_zero() {
        let b = confirmed_booking();

        let bill = Bill::compute(
            &b,
            &[],
            &[],
            at("2024-05-04T11:00:00Z"),
            Currency::Vnd,
        );

        assert_eq!(bill.grand_total, Money::zero(Currency::Vnd));
        assert!(bill.table_charges.is_empty());
        assert!(bill.order_charges.is_empty());
    }

    #[test]
    fn preview_equals_settlement_at_the_same_instant() {
        let b = confirmed_booking();
        let open = occupancy(&b, "2024-05-04T10:00:00Z", None, "33000");
        let orders = [order(&b, order::Status::Delivered, "50000")];
        let now = at("2024-05-04T11:10:00Z");

        let preview =
            Bill::compute(&b, &[open.clone()], &orders, now, Currency::Vnd);

        // Settlement closes the occupancy at the same instant and recomputes.
        let closed = Occupancy {
            ended_at: Some(now.coerce()),
            ..open
        };
        let settled =
            Bill::compute(&b, &[closed], &orders, now, Currency::Vnd);

        assert_eq!(preview.table_total, settled.table_total);
        assert_eq!(preview.order_total, settled.order_total);
        assert_eq!(preview.grand_total, settled.grand_total);
        // 1h10m at 33,000/hr rounds up to 39,000, plus the 50,000 order.
        assert_eq!(settled.grand_total, vnd("89000"));
    }
}
