//! [`Command`] for attaching a [`Table`] to a [`Booking`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
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

/// [`Command`] for attaching one more [`Table`] to a running [`Booking`].
///
/// The new [`Occupancy`] snapshots the current hourly rate of the [`Table`],
/// so rate edits made later don't change what this session pays.
#[derive(Clone, Copy, Debug)]
pub struct AddBookingTable {
    /// ID of the [`Booking`] to attach the [`Table`] to.
    pub booking_id: booking::Id,

    /// ID of the [`Table`] to attach.
    pub table_id: table::Id,

    /// Start instant overriding the current one.
    pub started_at: Option<occupancy::StartDateTime>,
}

impl<Db, Clk> Command<AddBookingTable> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Table>, table::Id>>,
            Ok = Option<Table>,
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
            Select<By<Option<Table>, table::Id>>,
            Ok = Option<Table>,
            Err = Traced<database::Error>,
        > + Database<Insert<Occupancy>, Err = Traced<database::Error>>
        + Database<Update<Table>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Occupancy;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AddBookingTable,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddBookingTable {
            booking_id,
            table_id,
            started_at,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;
        self.database()
            .execute(Select(By::<Option<Table>, _>::new(table_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TableNotExists(table_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Booking`.
        tx.execute(Lock(By::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        // Avoid concurrent actions upon the same `Table`.
        tx.execute(Lock(By::new(table_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        if booking.is_terminal() {
            return Err(tracerr::new!(E::BookingNotOpen(booking_id)));
        }

        let mut table = tx
            .execute(Select(By::<Option<Table>, _>::new(table_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TableNotExists(table_id))
            .map_err(tracerr::wrap!())?;
        if !table.is_available() {
            return Err(tracerr::new!(E::TableNotAvailable(table_id)));
        }

        let occupancy = Occupancy {
            id: occupancy::Id::new(),
            booking_id,
            table_id,
            price_per_hour: table.hourly_rate,
            started_at: started_at.unwrap_or_else(|| self.clock().now()),
            ended_at: None,
        };
        tx.execute(Insert(occupancy.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        table.status = table::Status::Occupied;
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

/// Error of [`AddBookingTable`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] is already settled or cancelled.
    #[display("`Booking(id: {_0})` is not open")]
    BookingNotOpen(#[error(not(source))] booking::Id),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Table`] is occupied, reserved or under maintenance.
    #[display("`Table(id: {_0})` is not available")]
    TableNotAvailable(#[error(not(source))] table::Id),

    /// [`Table`] with the provided ID does not exist.
    #[display("`Table(id: {_0})` does not exist")]
    TableNotExists(#[error(not(source))] table::Id),
}
