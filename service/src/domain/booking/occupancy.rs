//! [`Occupancy`] definitions.

use common::{unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::table;
#[cfg(doc)]
use crate::domain::{Booking, Table};

/// Interval during which one [`Table`] runs under a [`Booking`].
#[derive(Clone, Debug)]
pub struct Occupancy {
    /// ID of this [`Occupancy`].
    pub id: Id,

    /// ID of the [`Booking`] owning this [`Occupancy`].
    pub booking_id: super::Id,

    /// ID of the occupied [`Table`].
    pub table_id: table::Id,

    /// Price per hour of play, snapshotted from the [`Table`] at attach time.
    ///
    /// Never changes afterwards, so later rate edits don't affect this
    /// [`Occupancy`].
    pub price_per_hour: Money,

    /// [`DateTime`] when the [`Table`] was attached.
    ///
    /// [`DateTime`]: common::DateTime
    pub started_at: StartDateTime,

    /// [`DateTime`] when the [`Table`] was released.
    ///
    /// Unset while the [`Table`] still runs under the [`Booking`].
    ///
    /// [`DateTime`]: common::DateTime
    pub ended_at: Option<EndDateTime>,
}

impl Occupancy {
    /// Returns whether this [`Occupancy`] is still running.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// ID of an [`Occupancy`].
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

/// [`DateTime`] when an [`Occupancy`] was started.
///
/// [`DateTime`]: common::DateTime
pub type StartDateTime = DateTimeOf<(Occupancy, unit::Start)>;

/// [`DateTime`] when an [`Occupancy`] was ended.
///
/// [`DateTime`]: common::DateTime
pub type EndDateTime = DateTimeOf<(Occupancy, unit::End)>;
