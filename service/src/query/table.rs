//! [`Query`] collection related to [`Table`]s.

use common::operations::By;

use crate::domain::{table, Table};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Table`] by its [`table::Id`].
pub type ById = DatabaseQuery<By<Option<Table>, table::Id>>;

/// Queries all [`Table`]s of the club.
///
/// The floor is small enough that dashboards render it unpaged.
pub type All = DatabaseQuery<By<Vec<Table>, ()>>;
