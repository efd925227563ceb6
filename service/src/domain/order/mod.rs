//! [`Order`] definitions.

pub mod item;

use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::booking;
#[cfg(doc)]
use crate::domain::Booking;

pub use self::item::Item;

/// Products purchased within a [`Booking`], or standalone at the bar.
#[derive(Clone, Debug)]
pub struct Order {
    /// ID of this [`Order`].
    pub id: Id,

    /// ID of the [`Booking`] this [`Order`] is attached to, if any.
    pub booking_id: Option<booking::Id>,

    /// Current [`Status`] of this [`Order`].
    pub status: Status,

    /// Total price of this [`Order`]: the exact sum of `quantity × unit
    /// price` over its [`Item`]s, no rounding applied.
    pub total: Money,

    /// [`DateTime`] when this [`Order`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

impl Order {
    /// Returns whether this [`Order`] counts towards billing sums.
    ///
    /// Cancelled [`Order`]s never do.
    #[must_use]
    pub fn is_billable(&self) -> bool {
        self.status != Status::Cancelled
    }

    /// Returns whether this [`Order`] can still be cancelled.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        !matches!(self.status, Status::Completed | Status::Cancelled)
    }
}

/// ID of an [`Order`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of an [`Order`]."]
    enum Status {
        #[doc = "Accepted, not yet in preparation."]
        Pending = 1,

        #[doc = "Being prepared."]
        Preparing = 2,

        #[doc = "Handed over to the table."]
        Delivered = 3,

        #[doc = "Paid out. Terminal."]
        Completed = 4,

        #[doc = "Voided and excluded from billing. Terminal."]
        Cancelled = 5,
    }
}

/// [`DateTime`] when an [`Order`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Order, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateTime, Money};

    use super::{Id, Order, Status};

    fn order(status: Status) -> Order {
        Order {
            id: Id::new(),
            booking_id: None,
            status,
            total: Money::zero(Currency::Vnd),
            created_at: DateTime::UNIX_EPOCH.coerce(),
        }
    }

    #[test]
    fn only_cancelled_is_excluded_from_billing() {
        assert!(order(Status::Pending).is_billable());
        assert!(order(Status::Preparing).is_billable());
        assert!(order(Status::Delivered).is_billable());
        assert!(order(Status::Completed).is_billable());
        assert!(!order(Status::Cancelled).is_billable());
    }

    #[test]
    fn terminal_orders_cannot_be_cancelled() {
        assert!(order(Status::Pending).is_cancellable());
        assert!(order(Status::Preparing).is_cancellable());
        assert!(order(Status::Delivered).is_cancellable());
        assert!(!order(Status::Completed).is_cancellable());
        assert!(!order(Status::Cancelled).is_cancellable());
    }
}
