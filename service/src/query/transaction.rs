//! [`Query`] collection related to ledger [`Transaction`]s.

use common::operations::By;

use crate::domain::{booking, Transaction};
#[cfg(doc)]
use crate::{domain::Booking, Query};

use super::DatabaseQuery;

/// Queries all ledger [`Transaction`]s referencing a [`Booking`].
///
/// A settled [`Booking`] has exactly one.
pub type OfBooking = DatabaseQuery<By<Vec<Transaction>, booking::Id>>;
