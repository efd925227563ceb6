//! [`Booking`] definitions.

pub mod occupancy;

use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::customer;
#[cfg(doc)]
use crate::domain::{Order, Table, Transaction};

pub use self::occupancy::Occupancy;

/// One customer's play session: the central billable unit, owning
/// [`Occupancy`] records and [`Order`]s.
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the customer this [`Booking`] belongs to, if known.
    pub customer_id: Option<customer::Id>,

    /// Current [`Status`] of this [`Booking`].
    pub status: Status,

    /// Free-form [`Note`] attached to this [`Booking`].
    pub note: Option<Note>,

    /// [`DateTime`] when this [`Booking`] was started.
    ///
    /// [`DateTime`]: common::DateTime
    pub started_at: StartDateTime,

    /// [`DateTime`] when this [`Booking`] was settled.
    ///
    /// Unset until the [`Status`] becomes [`Completed`], and permanently
    /// fixed afterwards.
    ///
    /// [`Completed`]: Status::Completed
    /// [`DateTime`]: common::DateTime
    pub ended_at: Option<CompletionDateTime>,

    /// Final amount this [`Booking`] was settled for.
    ///
    /// Unset until the [`Status`] becomes [`Completed`], and permanently
    /// fixed afterwards.
    ///
    /// [`Completed`]: Status::Completed
    pub total: Option<Money>,
}

impl Booking {
    /// Returns whether this [`Booking`] is in a terminal [`Status`].
    ///
    /// Terminal [`Booking`]s accept no further mutations: no tables, no
    /// orders, no settlement, no cancellation.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, Status::Cancelled | Status::Completed)
    }

    /// Returns whether this [`Booking`] can still be settled or cancelled.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }
}

/// ID of a [`Booking`].
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

/// Free-form note attached to a [`Booking`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Note(String);

impl Note {
    /// Creates a new [`Note`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `note` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(note: impl Into<String>) -> Self {
        Self(note.into())
    }

    /// Creates a new [`Note`] if the given `note` is valid.
    #[must_use]
    pub fn new(note: impl Into<String>) -> Option<Self> {
        let note = note.into();
        Self::check(&note).then_some(Self(note))
    }

    /// Checks whether the given `note` is a valid [`Note`].
    fn check(note: impl AsRef<str>) -> bool {
        let note = note.as_ref();
        note.trim() == note && !note.is_empty() && note.len() <= 512
    }
}

impl FromStr for Note {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Note`")
    }
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "Reserved, not yet started."]
        Pending = 1,

        #[doc = "In progress."]
        Confirmed = 2,

        #[doc = "Aborted without settlement. Terminal."]
        Cancelled = 3,

        #[doc = "Settled. Terminal."]
        Completed = 4,
    }
}

/// [`DateTime`] when a [`Booking`] was started.
///
/// [`DateTime`]: common::DateTime
pub type StartDateTime = DateTimeOf<(Booking, unit::Start)>;

/// [`DateTime`] when a [`Booking`] was settled.
///
/// [`DateTime`]: common::DateTime
pub type CompletionDateTime = DateTimeOf<(Booking, unit::Completion)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use super::{Booking, Id, Status};

    fn booking(status: Status) -> Booking {
        Booking {
            id: Id::new(),
            customer_id: None,
            status,
            note: None,
            started_at: DateTime::UNIX_EPOCH.coerce(),
            ended_at: None,
            total: None,
        }
    }

    #[test]
    fn pending_and_confirmed_are_open() {
        assert!(booking(Status::Pending).is_open());
        assert!(booking(Status::Confirmed).is_open());
        assert!(!booking(Status::Pending).is_terminal());
        assert!(!booking(Status::Confirmed).is_terminal());
    }

    #[test]
    fn cancelled_and_completed_are_terminal() {
        assert!(booking(Status::Cancelled).is_terminal());
        assert!(booking(Status::Completed).is_terminal());
        assert!(!booking(Status::Cancelled).is_open());
        assert!(!booking(Status::Completed).is_open());
    }
}
