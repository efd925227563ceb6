//! [`Command`] for ending a single [`Occupancy`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Clock,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, occupancy, Occupancy},
        table, Booking, Table,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for ending one [`Occupancy`] ahead of checkout: the customer
/// is done with this [`Table`] but the [`Booking`] stays open.
///
/// The released [`Table`] becomes available again. The recorded end instant
/// fixes the time charge of this [`Occupancy`], so settling the [`Booking`]
/// later doesn't bill the idle tail.
#[derive(Clone, Copy, Debug)]
pub struct EndBookingTable {
    /// ID of the [`Occupancy`] to end.
    pub occupancy_id: occupancy::Id,

    /// End instant overriding the current one.
    pub ended_at: Option<occupancy::EndDateTime>,
}

impl<Db, Clk> Command<EndBookingTable> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Occupancy>, occupancy::Id>>,
            Ok = Option<Occupancy>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Table, table::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Occupancy>, occupancy::Id>>,
            Ok = Option<Occupancy>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Table>, table::Id>>,
            Ok = Option<Table>,
            Err = Traced<database::Error>,
        > + Database<Update<Occupancy>, Err = Traced<database::Error>>
        + Database<Update<Table>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Occupancy;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: EndBookingTable,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let EndBookingTable {
            occupancy_id,
            ended_at,
        } = cmd;

        let preliminary = self
            .database()
            .execute(Select(By::<Option<Occupancy>, _>::new(occupancy_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OccupancyNotExists(occupancy_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Booking`.
        tx.execute(Lock(By::new(preliminary.booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        // Avoid concurrent actions upon the same `Table`.
        tx.execute(Lock(By::new(preliminary.table_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut occupancy = tx
            .execute(Select(By::<Option<Occupancy>, _>::new(occupancy_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OccupancyNotExists(occupancy_id))
            .map_err(tracerr::wrap!())?;
        if !occupancy.is_open() {
            return Err(tracerr::new!(E::OccupancyAlreadyEnded(occupancy_id)));
        }

        let booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(
                occupancy.booking_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(occupancy.booking_id))
            .map_err(tracerr::wrap!())?;
        if booking.is_terminal() {
            return Err(tracerr::new!(E::BookingNotOpen(booking.id)));
        }

        let mut table = tx
            .execute(Select(By::<Option<Table>, _>::new(occupancy.table_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TableNotExists(occupancy.table_id))
            .map_err(tracerr::wrap!())?;

        occupancy.ended_at =
            Some(ended_at.unwrap_or_else(|| self.clock().now()));
        tx.execute(Update(occupancy.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        table.status = table::Status::Available;
        tx.execute(Update(table))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(occupancy)
    }
}

/// Error of [`EndBookingTable`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] owning the [`Occupancy`] does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Booking`] owning the [`Occupancy`] is already settled or cancelled.
    #[display("`Booking(id: {_0})` is not open")]
    BookingNotOpen(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Occupancy`] is already ended.
    #[display("`Occupancy(id: {_0})` is already ended")]
    OccupancyAlreadyEnded(#[error(not(source))] occupancy::Id),

    /// [`Occupancy`] with the provided ID does not exist.
    #[display("`Occupancy(id: {_0})` does not exist")]
    OccupancyNotExists(#[error(not(source))] occupancy::Id),

    /// [`Table`] referenced by the [`Occupancy`] does not exist.
    #[display("`Table(id: {_0})` does not exist")]
    TableNotExists(#[error(not(source))] table::Id),
}
