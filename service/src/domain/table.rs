//! [`Table`] definitions.

use common::{define_kind, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::{booking::Occupancy, Booking};

/// Physical playing table of the club.
#[derive(Clone, Debug)]
pub struct Table {
    /// ID of this [`Table`].
    pub id: Id,

    /// Display [`Name`] of this [`Table`].
    pub name: Name,

    /// [`Kind`] of this [`Table`].
    pub kind: Kind,

    /// Price charged for one hour of play on this [`Table`].
    ///
    /// Attaching the [`Table`] to a [`Booking`] snapshots this value into the
    /// [`Occupancy`], so later rate edits don't affect running sessions.
    pub hourly_rate: Money,

    /// Current [`Status`] of this [`Table`].
    pub status: Status,
}

impl Table {
    /// Returns whether this [`Table`] can be attached to a [`Booking`].
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }
}

/// ID of a [`Table`].
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

/// Name of a [`Table`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

define_kind! {
    #[doc = "Playing discipline a [`Table`] is built for."]
    enum Kind {
        #[doc = "Pocket billiards [`Table`]."]
        Pool = 1,

        #[doc = "Carom billiards [`Table`]."]
        Carom = 2,

        #[doc = "Snooker [`Table`]."]
        Snooker = 3,
    }
}

define_kind! {
    #[doc = "Status of a [`Table`]."]
    enum Status {
        #[doc = "Free to be attached to a [`Booking`]."]
        Available = 1,

        #[doc = "Running under an open [`Occupancy`]."]
        Occupied = 2,

        #[doc = "Held for an upcoming [`Booking`]."]
        Reserved = 3,

        #[doc = "Out of service."]
        Maintenance = 4,
    }
}
