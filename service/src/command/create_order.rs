//! [`Command`] for creating a new [`Order`].

use common::{
    money::Currency,
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Clock, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        booking,
        order::{self, item, Item},
        product, Booking, Order,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Order`], optionally attached to an open
/// [`Booking`].
///
/// Unit prices and costs are snapshots supplied by the catalog at order
/// time, so later catalog edits never change what this [`Order`] bills. The
/// [`Order`] total is the exact sum of `quantity × unit price` over its
/// [`Item`]s, with no rounding.
#[derive(Clone, Debug)]
pub struct CreateOrder {
    /// ID of the [`Booking`] to attach the [`Order`] to, if any.
    pub booking_id: Option<booking::Id>,

    /// Lines of the [`Order`].
    pub items: Vec<NewItem>,
}

/// One line of a [`CreateOrder`] [`Command`].
#[derive(Clone, Copy, Debug)]
pub struct NewItem {
    /// ID of the ordered product.
    pub product_id: product::Id,

    /// Number of units ordered.
    pub quantity: item::Quantity,

    /// Price of one unit, snapshotted from the catalog.
    pub unit_price: Money,

    /// Cost of one unit, snapshotted from the catalog, if known.
    pub unit_cost: Option<Money>,
}

impl<Db, Clk> Command<CreateOrder> for Service<Db, Clk>
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
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Insert<Order>, Err = Traced<database::Error>>
        + Database<Insert<Item>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateOrder) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateOrder { booking_id, items } = cmd;

        if items.is_empty() {
            return Err(tracerr::new!(E::NoItems));
        }

        let total = total_of(&items, self.config().currency)
            .map_err(|c| tracerr::new!(E::CurrencyMismatch(c)))?;

        if let Some(id) = booking_id {
            self.database()
                .execute(Select(By::<Option<Booking>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::BookingNotExists(id))
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Some(id) = booking_id {
            // Avoid concurrent actions upon the same `Booking`.
            tx.execute(Lock(By::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            let booking = tx
                .execute(Select(By::<Option<Booking>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::BookingNotExists(id))
                .map_err(tracerr::wrap!())?;
            if booking.is_terminal() {
                return Err(tracerr::new!(E::BookingNotOpen(id)));
            }
        }

        let order = Order {
            id: order::Id::new(),
            booking_id,
            status: order::Status::Pending,
            total,
            created_at: self.clock().now(),
        };
        tx.execute(Insert(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        for line in items {
            tx.execute(Insert(Item {
                id: item::Id::new(),
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                unit_cost: line.unit_cost,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(order)
    }
}

/// Computes the total of the provided `items`, ensuring every price and cost
/// is recorded in the club's bookkeeping `currency`.
///
/// All billing sums label their result with that currency, so an [`Item`]
/// priced in any other one must be rejected here rather than silently
/// relabeled. The mismatching [`Currency`] is returned as the error.
fn total_of(items: &[NewItem], currency: Currency) -> Result<Money, Currency> {
    let mut amount = Decimal::ZERO;
    for i in items {
        for m in [Some(i.unit_price), i.unit_cost].into_iter().flatten() {
            if m.currency != currency {
                return Err(m.currency);
            }
        }
        amount += Decimal::from(i.quantity.get()) * i.unit_price.amount;
    }
    Ok(Money { amount, currency })
}

/// Error of [`CreateOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Booking`] is already settled or cancelled.
    #[display("`Booking(id: {_0})` is not open")]
    BookingNotOpen(#[error(not(source))] booking::Id),

    /// [`Item`] priced or costed in a different [`Currency`] than the club's
    /// bookkeeping one.
    #[display("`Item` amount in `{_0}`, not the bookkeeping currency")]
    CurrencyMismatch(#[error(not(source))] Currency),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Order`] without any [`Item`]s was requested.
    #[display("`Order` must contain at least one `Item`")]
    NoItems,
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};

    use super::{total_of, NewItem};
    use crate::domain::{order::item, product};

    fn item(price: Money, cost: Option<Money>) -> NewItem {
        NewItem {
            product_id: product::Id::new(),
            quantity: item::Quantity::new(2).unwrap(),
            unit_price: price,
            unit_cost: cost,
        }
    }

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn totals_are_exact_sums_of_quantity_times_price() {
        let total = total_of(
            &[
                item(money("25000VND"), None),
                item(money("10500.5VND"), Some(money("8000VND"))),
            ],
            Currency::Vnd,
        )
        .unwrap();

        assert_eq!(total, money("71001VND"));
    }

    #[test]
    fn foreign_priced_item_is_rejected_instead_of_relabeled() {
        assert_eq!(
            total_of(&[item(money("50USD"), None)], Currency::Vnd),
            Err(Currency::Usd),
        );
    }

    #[test]
    fn foreign_costed_item_is_rejected() {
        assert_eq!(
            total_of(
                &[item(money("25000VND"), Some(money("1USD")))],
                Currency::Vnd,
            ),
            Err(Currency::Usd),
        );
    }
}
