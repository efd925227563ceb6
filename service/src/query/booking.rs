//! [`Query`] collection related to a single [`Booking`].

use common::operations::By;

use crate::domain::{
    booking::{self, Occupancy},
    Booking, Order,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Booking`] by its [`booking::Id`].
pub type ById = DatabaseQuery<By<Option<Booking>, booking::Id>>;

/// Queries all [`Occupancy`]s of a [`Booking`].
pub type Occupancies = DatabaseQuery<By<Vec<Occupancy>, booking::Id>>;

/// Queries all [`Order`]s attached to a [`Booking`].
pub type Orders = DatabaseQuery<By<Vec<Order>, booking::Id>>;
