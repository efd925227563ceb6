//! [`Order`]-related [`Database`] implementations.

use common::{
    money,
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        booking,
        order::{self, Item},
        Order,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

#[cfg(doc)]
use crate::domain::Booking;

impl<C> Database<Select<By<Vec<Order>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let booking_id: booking::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, booking_id, status, \
                   total, total_currency, \
                   created_at \
            FROM orders \
            WHERE booking_id = $1::UUID \
            ORDER BY created_at ASC, id ASC";
        Ok(self
            .query(SQL, &[&booking_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Order {
                id: row.get("id"),
                booking_id: row.get("booking_id"),
                status: row.get("status"),
                total: Money {
                    amount: row.get("total"),
                    currency: row.get("total_currency"),
                },
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Order>, order::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Order>, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: order::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, booking_id, status, \
                   total, total_currency, \
                   created_at \
            FROM orders \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Order {
                id: row.get("id"),
                booking_id: row.get("booking_id"),
                status: row.get("status"),
                total: Money {
                    amount: row.get("total"),
                    currency: row.get("total_currency"),
                },
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Insert<Order>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Order>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(order)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Order>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(order): Update<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        let Order {
            id,
            booking_id,
            status,
            total,
            created_at,
        } = order;

        const SQL: &str = "\
            INSERT INTO orders (\
                id, booking_id, status, \
                total, total_currency, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::INT2, \
                $4::NUMERIC, $5::INT2, \
                $6::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET booking_id = EXCLUDED.booking_id, \
                status = EXCLUDED.status, \
                total = EXCLUDED.total, \
                total_currency = EXCLUDED.total_currency, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &booking_id,
                &status,
                &total.amount,
                &total.currency,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Order, order::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Order, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: order::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO orders_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Item>, order::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Item>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Item>, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let order_id: order::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, order_id, product_id, quantity, \
                   unit_price, unit_price_currency, \
                   unit_cost, unit_cost_currency \
            FROM order_items \
            WHERE order_id = $1::UUID \
            ORDER BY id ASC";
        Ok(self
            .query(SQL, &[&order_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Item {
                id: row.get("id"),
                order_id: row.get("order_id"),
                product_id: row.get("product_id"),
                quantity: row.get("quantity"),
                unit_price: Money {
                    amount: row.get("unit_price"),
                    currency: row.get("unit_price_currency"),
                },
                unit_cost: row
                    .get::<_, Option<Decimal>>("unit_cost")
                    .zip(row.get::<_, Option<money::Currency>>(
                        "unit_cost_currency",
                    ))
                    .map(|(amount, currency)| Money { amount, currency }),
            })
            .collect())
    }
}

// `Item` price and cost are immutable snapshots, so there is no `Update`
// operation for it.
impl<C> Database<Insert<Item>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(item): Insert<Item>,
    ) -> Result<Self::Ok, Self::Err> {
        let Item {
            id,
            order_id,
            product_id,
            quantity,
            unit_price,
            unit_cost,
        } = item;

        let unit_cost_amount = unit_cost.map(|c| c.amount);
        let unit_cost_currency = unit_cost.map(|c| c.currency);

        const SQL: &str = "\
            INSERT INTO order_items (\
                id, order_id, product_id, quantity, \
                unit_price, unit_price_currency, \
                unit_cost, unit_cost_currency\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::INT4, \
                $5::NUMERIC, $6::INT2, \
                $7::NUMERIC, $8::INT2\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &order_id,
                &product_id,
                &quantity,
                &unit_price.amount,
                &unit_price.currency,
                &unit_cost_amount,
                &unit_cost_currency,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
