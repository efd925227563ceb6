//! [`Command`] for cancelling a [`Booking`].

use std::collections::HashMap;

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Clock, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, Occupancy},
        table, Booking, Table,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for cancelling a [`Booking`] without settling it.
///
/// Still-open [`Occupancy`]s are closed and their [`Table`]s released, but no
/// ledger entry is written and the [`Booking`] keeps no end instant or total:
/// those are fixed exclusively by settlement.
#[derive(Clone, Copy, Debug)]
pub struct CancelBooking {
    /// ID of the [`Booking`] to cancel.
    pub booking_id: booking::Id,
}

impl<Db, Clk> Command<CancelBooking> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Table, table::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Occupancy>, booking::Id>>,
            Ok = Vec<Occupancy>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<table::Id, Table>, Vec<table::Id>>>,
            Ok = HashMap<table::Id, Table>,
            Err = Traced<database::Error>,
        > + Database<Update<Occupancy>, Err = Traced<database::Error>>
        + Database<Update<Table>, Err = Traced<database::Error>>
        + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CancelBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelBooking { booking_id } = cmd;

        self.database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent settlements/cancellations of the same `Booking`.
        tx.execute(Lock(By::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        match booking.status {
            booking::Status::Completed => {
                return Err(tracerr::new!(E::BookingAlreadySettled(
                    booking_id
                )));
            }
            booking::Status::Cancelled => {
                return Err(tracerr::new!(E::BookingAlreadyCancelled(
                    booking_id
                )));
            }
            booking::Status::Pending | booking::Status::Confirmed => {}
        }

        let at: DateTime = self.clock().now();

        let occupancies = tx
            .execute(Select(By::<Vec<Occupancy>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Tables must not stay occupied under a terminal `Booking`.
        let open: Vec<_> = occupancies
            .into_iter()
            .filter(Occupancy::is_open)
            .collect();

        for o in &open {
            // Avoid concurrent actions upon the same `Table`.
            tx.execute(Lock(By::new(o.table_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let mut released = tx
            .execute(Select(By::<HashMap<table::Id, Table>, _>::new(
                open.iter().map(|o| o.table_id).collect::<Vec<_>>(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for mut o in open {
            let mut table = released
                .remove(&o.table_id)
                .ok_or(E::TableNotExists(o.table_id))
                .map_err(tracerr::wrap!())?;
            table.status = table::Status::Available;

            o.ended_at = Some(at.coerce());

            tx.execute(Update(table))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            tx.execute(Update(o))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        booking.status = booking::Status::Cancelled;
        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`CancelBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] is already cancelled.
    #[display("`Booking(id: {_0})` is already cancelled")]
    BookingAlreadyCancelled(#[error(not(source))] booking::Id),

    /// [`Booking`] is already settled and cannot be cancelled.
    #[display("`Booking(id: {_0})` is already settled")]
    BookingAlreadySettled(#[error(not(source))] booking::Id),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Table`] referenced by an [`Occupancy`] does not exist.
    #[display("`Table(id: {_0})` does not exist")]
    TableNotExists(#[error(not(source))] table::Id),
}
