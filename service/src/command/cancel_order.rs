//! [`Command`] for cancelling an [`Order`].

use common::operations::{By, Commit, Lock, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, order, Booking, Order},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for cancelling an [`Order`], excluding it from all billing
/// sums.
///
/// A completed [`Order`] or one attached to a terminal [`Booking`] cannot be
/// cancelled: its total is already settled or void.
#[derive(Clone, Copy, Debug)]
pub struct CancelOrder {
    /// ID of the [`Order`] to cancel.
    pub order_id: order::Id,
}

impl<Db, Clk> Command<CancelOrder> for Service<Db, Clk>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Order>, order::Id>>,
            Ok = Option<Order>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Lock<By<Order, order::Id>>, Err = Traced<database::Error>>
        + Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Order>, order::Id>>,
            Ok = Option<Order>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Update<Order>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CancelOrder) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelOrder { order_id } = cmd;

        let preliminary = self
            .database()
            .execute(Select(By::<Option<Order>, _>::new(order_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OrderNotExists(order_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Order`.
        tx.execute(Lock(By::new(order_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        if let Some(booking_id) = preliminary.booking_id {
            // A concurrent settlement of the owning `Booking` must not bill
            // an `Order` being cancelled, or miss its cancellation.
            tx.execute(Lock(By::new(booking_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let mut order = tx
            .execute(Select(By::<Option<Order>, _>::new(order_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OrderNotExists(order_id))
            .map_err(tracerr::wrap!())?;
        if !order.is_cancellable() {
            return Err(tracerr::new!(E::OrderNotCancellable(order_id)));
        }

        if let Some(booking_id) = order.booking_id {
            let booking = tx
                .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::BookingNotExists(booking_id))
                .map_err(tracerr::wrap!())?;
            if booking.is_terminal() {
                return Err(tracerr::new!(E::BookingNotOpen(booking_id)));
            }
        }

        order.status = order::Status::Cancelled;
        tx.execute(Update(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(order)
    }
}

/// Error of [`CancelOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] the [`Order`] is attached to does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Booking`] the [`Order`] is attached to is already settled or
    /// cancelled.
    #[display("`Booking(id: {_0})` is not open")]
    BookingNotOpen(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Order`] is already completed or cancelled.
    #[display("`Order(id: {_0})` cannot be cancelled")]
    OrderNotCancellable(#[error(not(source))] order::Id),

    /// [`Order`] with the provided ID does not exist.
    #[display("`Order(id: {_0})` does not exist")]
    OrderNotExists(#[error(not(source))] order::Id),
}
