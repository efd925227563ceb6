//! [`Command`] for settling a [`Booking`].

use std::collections::HashMap;

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Clock, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, Occupancy},
        staff, table, transaction, Booking, Order, Table, Transaction,
    },
    infra::{database, Database},
    read::booking::Bill,
    Service,
};

use super::Command;

/// [`Command`] for settling a [`Booking`]: the checkout turning elapsed
/// table time and attached [`Order`]s into one ledger [`Transaction`].
///
/// Still-open [`Occupancy`]s are closed at the settlement instant, every
/// released [`Table`] becomes available again, and the [`Booking`] is fixed
/// as completed with the computed grand total. All of it happens within a
/// single database transaction.
#[derive(Clone, Copy, Debug)]
pub struct SettleBooking {
    /// ID of the [`Booking`] to settle.
    pub booking_id: booking::Id,

    /// [`Method`] the customer pays with.
    ///
    /// [`Method`]: transaction::Method
    pub method: transaction::Method,

    /// ID of the staff member performing the settlement.
    ///
    /// [`None`] attributes the ledger entry to a guest/system identity.
    pub staff_id: Option<staff::Id>,

    /// Settlement instant overriding the current one.
    pub ended_at: Option<booking::CompletionDateTime>,
}

impl<Db, Clk> Command<SettleBooking> for Service<Db, Clk>
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
            Select<By<Vec<Order>, booking::Id>>,
            Ok = Vec<Order>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<table::Id, Table>, Vec<table::Id>>>,
            Ok = HashMap<table::Id, Table>,
            Err = Traced<database::Error>,
        > + Database<Update<Occupancy>, Err = Traced<database::Error>>
        + Database<Update<Table>, Err = Traced<database::Error>>
        + Database<Insert<Transaction>, Err = Traced<database::Error>>
        + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Bill;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SettleBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SettleBooking {
            booking_id,
            method,
            staff_id,
            ended_at,
        } = cmd;

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

        // Avoid concurrent settlements of the same `Booking`.
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

        let at: DateTime =
            ended_at.map_or_else(|| self.clock().now(), |e| e.coerce());

        let mut occupancies = tx
            .execute(Select(By::<Vec<Occupancy>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let orders = tx
            .execute(Select(By::<Vec<Order>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Close occupancies the operator forgot to end before checkout.
        // Already ended ones keep their recorded end untouched.
        let mut closed = Vec::new();
        for o in &mut occupancies {
            if o.is_open() {
                o.ended_at = Some(at.coerce());
                closed.push(o.clone());
            }
        }

        for o in &closed {
            // Avoid concurrent actions upon the same `Table`.
            tx.execute(Lock(By::new(o.table_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let mut released = tx
            .execute(Select(By::<HashMap<table::Id, Table>, _>::new(
                closed.iter().map(|o| o.table_id).collect::<Vec<_>>(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for o in closed {
            let mut table = released
                .remove(&o.table_id)
                .ok_or(E::TableNotExists(o.table_id))
                .map_err(tracerr::wrap!())?;
            table.status = table::Status::Available;

            tx.execute(Update(table))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            tx.execute(Update(o))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let bill = Bill::compute(
            &booking,
            &occupancies,
            &orders,
            at,
            self.config().currency,
        );

        tx.execute(Insert(Transaction {
            id: transaction::Id::new(),
            kind: transaction::Kind::Revenue,
            amount: bill.grand_total,
            method,
            booking_id: Some(booking_id),
            creator_id: staff_id,
            created_at: at.coerce(),
        }))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;

        booking.status = booking::Status::Completed;
        booking.ended_at = Some(at.coerce());
        booking.total = Some(bill.grand_total);
        tx.execute(Update(booking))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(bill)
    }
}

/// Error of [`SettleBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] was cancelled and cannot be settled.
    #[display("`Booking(id: {_0})` is already cancelled")]
    BookingAlreadyCancelled(#[error(not(source))] booking::Id),

    /// [`Booking`] is already settled.
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

#[cfg(test)]
mod spec {
    use std::{cell::RefCell, collections::HashMap, rc::Rc};

    use common::{
        clock::Fixed,
        money::Currency,
        operations::{By, Commit, Insert, Lock, Select, Transact, Update},
        DateTime, Money,
    };
    use tracerr::Traced;

    use super::{ExecutionError, SettleBooking};
    use crate::{
        domain::{
            booking::{self, occupancy, Occupancy},
            table, transaction, Booking, Order, Table, Transaction,
        },
        infra::database,
        Command as _, Config, Service,
    };

    #[derive(Debug)]
    struct State {
        booking: Booking,
        occupancies: Vec<Occupancy>,
        orders: Vec<Order>,
        tables: HashMap<table::Id, Table>,
        transactions: Vec<Transaction>,
    }

    /// In-memory database holding a single [`Booking`] with its satellites.
    ///
    /// Transacting hands out another handle to the same state, so the
    /// command's transactional sequence runs against it unchanged.
    #[derive(Clone, Debug)]
    struct Stub(Rc<RefCell<State>>);

    type DbErr = Traced<database::Error>;

    impl database::Database<Transact> for Stub {
        type Ok = Self;
        type Err = DbErr;

        async fn execute(&self, _: Transact) -> Result<Self, DbErr> {
            Ok(Self(Rc::clone(&self.0)))
        }
    }

    impl database::Database<Select<By<Option<Booking>, booking::Id>>>
        for Stub
    {
        type Ok = Option<Booking>;
        type Err = DbErr;

        async fn execute(
            &self,
            Select(by): Select<By<Option<Booking>, booking::Id>>,
        ) -> Result<Self::Ok, DbErr> {
            let s = self.0.borrow();
            Ok((s.booking.id == by.into_inner())
                .then(|| s.booking.clone()))
        }
    }

    impl database::Database<Select<By<Vec<Occupancy>, booking::Id>>>
        for Stub
    {
        type Ok = Vec<Occupancy>;
        type Err = DbErr;

        async fn execute(
            &self,
            _: Select<By<Vec<Occupancy>, booking::Id>>,
        ) -> Result<Self::Ok, DbErr> {
            Ok(self.0.borrow().occupancies.clone())
        }
    }

    impl database::Database<Select<By<Vec<Order>, booking::Id>>> for Stub {
        type Ok = Vec<Order>;
        type Err = DbErr;

        async fn execute(
            &self,
            _: Select<By<Vec<Order>, booking::Id>>,
        ) -> Result<Self::Ok, DbErr> {
            Ok(self.0.borrow().orders.clone())
        }
    }

    impl
        database::Database<
            Select<By<HashMap<table::Id, Table>, Vec<table::Id>>>,
        > for Stub
    {
        type Ok = HashMap<table::Id, Table>;
        type Err = DbErr;

        async fn execute(
            &self,
            Select(by): Select<
                By<HashMap<table::Id, Table>, Vec<table::Id>>,
            >,
        ) -> Result<Self::Ok, DbErr> {
            let s = self.0.borrow();
            Ok(by
                .into_inner()
                .into_iter()
                .filter_map(|id| {
                    s.tables.get(&id).map(|t| (id, t.clone()))
                })
                .collect())
        }
    }

    impl database::Database<Lock<By<Booking, booking::Id>>> for Stub {
        type Ok = ();
        type Err = DbErr;

        async fn execute(
            &self,
            _: Lock<By<Booking, booking::Id>>,
        ) -> Result<(), DbErr> {
            Ok(())
        }
    }

    impl database::Database<Lock<By<Table, table::Id>>> for Stub {
        type Ok = ();
        type Err = DbErr;

        async fn execute(
            &self,
            _: Lock<By<Table, table::Id>>,
        ) -> Result<(), DbErr> {
            Ok(())
        }
    }

    impl database::Database<Update<Occupancy>> for Stub {
        type Ok = ();
        type Err = DbErr;

        async fn execute(
            &self,
            Update(o): Update<Occupancy>,
        ) -> Result<(), DbErr> {
            let mut s = self.0.borrow_mut();
            if let Some(slot) =
                s.occupancies.iter_mut().find(|x| x.id == o.id)
            {
                *slot = o;
            }
            Ok(())
        }
    }

    impl database::Database<Update<Table>> for Stub {
        type Ok = ();
        type Err = DbErr;

        async fn execute(&self, Update(t): Update<Table>) -> Result<(), DbErr> {
            drop(self.0.borrow_mut().tables.insert(t.id, t));
            Ok(())
        }
    }

    impl database::Database<Update<Booking>> for Stub {
        type Ok = ();
        type Err = DbErr;

        async fn execute(
            &self,
            Update(b): Update<Booking>,
        ) -> Result<(), DbErr> {
            self.0.borrow_mut().booking = b;
            Ok(())
        }
    }

    impl database::Database<Insert<Transaction>> for Stub {
        type Ok = ();
        type Err = DbErr;

        async fn execute(
            &self,
            Insert(t): Insert<Transaction>,
        ) -> Result<(), DbErr> {
            self.0.borrow_mut().transactions.push(t);
            Ok(())
        }
    }

    impl database::Database<Commit> for Stub {
        type Ok = ();
        type Err = DbErr;

        async fn execute(&self, _: Commit) -> Result<(), DbErr> {
            Ok(())
        }
    }

    fn at(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn vnd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Vnd,
        }
    }

    fn confirmed_session() -> (Rc<RefCell<State>>, booking::Id) {
        let booking = Booking {
            id: booking::Id::new(),
            customer_id: None,
            status: booking::Status::Confirmed,
            note: None,
            started_at: at("2024-05-04T10:00:00Z").coerce(),
            ended_at: None,
            total: None,
        };
        let table = Table {
            id: table::Id::new(),
            name: "T1".parse().unwrap(),
            kind: table::Kind::Pool,
            hourly_rate: vnd("50000"),
            status: table::Status::Occupied,
        };
        let occupancy = Occupancy {
            id: occupancy::Id::new(),
            booking_id: booking.id,
            table_id: table.id,
            price_per_hour: vnd("50000"),
            started_at: at("2024-05-04T10:00:00Z").coerce(),
            ended_at: None,
        };

        let id = booking.id;
        let state = Rc::new(RefCell::new(State {
            booking,
            occupancies: vec![occupancy],
            orders: vec![],
            tables: HashMap::from([(table.id, table)]),
            transactions: vec![],
        }));
        (state, id)
    }

    fn service(
        state: &Rc<RefCell<State>>,
        now: &str,
    ) -> Service<Stub, Fixed> {
        Service::new(
            Config {
                currency: Currency::Vnd,
            },
            Stub(Rc::clone(state)),
            Fixed(at(now)),
        )
    }

    fn settle(booking_id: booking::Id) -> SettleBooking {
        SettleBooking {
            booking_id,
            method: transaction::Method::Cash,
            staff_id: None,
            ended_at: None,
        }
    }

    #[tokio::test]
    async fn settles_once_then_rejects_without_a_second_charge() {
        let (state, booking_id) = confirmed_session();
        let service = service(&state, "2024-05-04T11:30:00Z");

        let bill = service.execute(settle(booking_id)).await.unwrap();
        assert_eq!(bill.grand_total, vnd("75000"));

        {
            let s = state.borrow();
            assert_eq!(s.booking.status, booking::Status::Completed);
            assert_eq!(s.booking.total, Some(vnd("75000")));
            assert_eq!(
                s.occupancies[0].ended_at,
                Some(at("2024-05-04T11:30:00Z").coerce()),
            );
            assert!(s
                .tables
                .values()
                .all(|t| t.status == table::Status::Available));
            assert_eq!(s.transactions.len(), 1);
            assert_eq!(s.transactions[0].kind, transaction::Kind::Revenue);
            assert_eq!(s.transactions[0].amount, vnd("75000"));
        }

        let err = service.execute(settle(booking_id)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::BookingAlreadySettled(id) if *id == booking_id,
        ));
        assert_eq!(state.borrow().transactions.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_booking_is_rejected_too() {
        let (state, booking_id) = confirmed_session();
        state.borrow_mut().booking.status = booking::Status::Cancelled;
        let service = service(&state, "2024-05-04T11:30:00Z");

        let err = service.execute(settle(booking_id)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::BookingAlreadyCancelled(id) if *id == booking_id,
        ));

        let s = state.borrow();
        assert_eq!(s.booking.status, booking::Status::Cancelled);
        assert!(s.transactions.is_empty());
        assert!(s.occupancies[0].ended_at.is_none());
    }
}
