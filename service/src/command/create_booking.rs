//! [`Command`] for creating a new [`Booking`].

use std::collections::HashMap;

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
    Clock,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, occupancy, Occupancy},
        customer, table, Booking, Table,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Booking`]: a walk-in session starting
/// right away on the given [`Table`]s.
///
/// Every [`Table`] gets an [`Occupancy`] snapshotting its current hourly
/// rate and becomes occupied. A [`Booking`] without tables is allowed and
/// carries [`Order`]s only.
///
/// [`Order`]: crate::domain::Order
#[derive(Clone, Debug)]
pub struct CreateBooking {
    /// IDs of the [`Table`]s to attach.
    pub tables: Vec<table::Id>,

    /// ID of the customer this [`Booking`] belongs to, if known.
    pub customer_id: Option<customer::Id>,

    /// Free-form [`Note`] for the staff.
    ///
    /// [`Note`]: booking::Note
    pub note: Option<booking::Note>,

    /// Start instant overriding the current one.
    pub started_at: Option<booking::StartDateTime>,
}

impl<Db, Clk> Command<CreateBooking> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<HashMap<table::Id, Table>, Vec<table::Id>>>,
            Ok = HashMap<table::Id, Table>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Lock<By<Table, table::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<HashMap<table::Id, Table>, Vec<table::Id>>>,
            Ok = HashMap<table::Id, Table>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Insert<Occupancy>, Err = Traced<database::Error>>
        + Database<Update<Table>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            tables,
            customer_id,
            note,
            started_at,
        } = cmd;

        let mut table_ids: Vec<table::Id> = Vec::with_capacity(tables.len());
        for id in tables {
            if !table_ids.contains(&id) {
                table_ids.push(id);
            }
        }

        let known = self
            .database()
            .execute(Select(By::<HashMap<table::Id, Table>, _>::new(
                table_ids.clone(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for id in &table_ids {
            if !known.contains_key(id) {
                return Err(tracerr::new!(E::TableNotExists(*id)));
            }
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for &id in &table_ids {
            // Avoid concurrent actions upon the same `Table`.
            tx.execute(Lock(By::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let mut locked = tx
            .execute(Select(By::<HashMap<table::Id, Table>, _>::new(
                table_ids.clone(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let at = started_at.unwrap_or_else(|| self.clock().now());
        let booking = Booking {
            id: booking::Id::new(),
            customer_id,
            status: booking::Status::Confirmed,
            note,
            started_at: at,
            ended_at: None,
            total: None,
        };
        tx.execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        for id in table_ids {
            let mut table = locked
                .remove(&id)
                .ok_or(E::TableNotExists(id))
                .map_err(tracerr::wrap!())?;
            if !table.is_available() {
                return Err(tracerr::new!(E::TableNotAvailable(id)));
            }

            tx.execute(Insert(Occupancy {
                id: occupancy::Id::new(),
                booking_id: booking.id,
                table_id: table.id,
                price_per_hour: table.hourly_rate,
                started_at: at.coerce(),
                ended_at: None,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

            table.status = table::Status::Occupied;
            tx.execute(Update(table))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Table`] is not available for a new [`Booking`].
    #[display("`Table(id: {_0})` is not available")]
    TableNotAvailable(#[error(not(source))] table::Id),

    /// [`Table`] with the provided ID does not exist.
    #[display("`Table(id: {_0})` does not exist")]
    TableNotExists(#[error(not(source))] table::Id),
}
