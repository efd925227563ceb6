//! [`Transaction`] definitions.

use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{booking, staff};
#[cfg(doc)]
use crate::domain::Booking;

/// Entry of the financial ledger.
///
/// The ledger is append-only: a [`Transaction`] is never updated or deleted
/// once written, and the persistence layer exposes no operation to do so.
/// Settlement of a [`Booking`] produces exactly one [`Revenue`] entry.
///
/// [`Revenue`]: Kind::Revenue
#[derive(Clone, Debug)]
pub struct Transaction {
    /// ID of this [`Transaction`].
    pub id: Id,

    /// [`Kind`] of this [`Transaction`].
    pub kind: Kind,

    /// Amount of money moved by this [`Transaction`].
    pub amount: Money,

    /// [`Method`] the money was moved with.
    pub method: Method,

    /// ID of the [`Booking`] this [`Transaction`] settles, if any.
    pub booking_id: Option<booking::Id>,

    /// ID of the staff member who recorded this [`Transaction`].
    ///
    /// [`None`] means a guest/system identity.
    pub creator_id: Option<staff::Id>,

    /// [`DateTime`] when this [`Transaction`] was recorded.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

/// ID of a [`Transaction`].
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
    #[doc = "Kind of a [`Transaction`]."]
    enum Kind {
        #[doc = "Money received from a customer."]
        Revenue = 1,

        #[doc = "Money spent on running the club."]
        Expense = 2,

        #[doc = "Money spent on restocking products."]
        Purchase = 3,
    }
}

define_kind! {
    #[doc = "Method a [`Transaction`] was paid with."]
    enum Method {
        #[doc = "Cash over the counter."]
        Cash = 1,

        #[doc = "Card terminal."]
        Card = 2,

        #[doc = "Bank transfer."]
        Transfer = 3,
    }
}

/// [`DateTime`] when a [`Transaction`] was recorded.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Transaction, unit::Creation)>;
