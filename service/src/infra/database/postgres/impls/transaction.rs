//! [`Transaction`]-related [`Database`] implementations.
//!
//! The ledger is append-only: only [`Insert`] and [`Select`] are
//! implemented, so no code path can ever rewrite a recorded [`Transaction`].

use common::{
    operations::{By, Insert, Select},
    Money,
};
use tracerr::Traced;

use crate::{
    domain::{booking, Transaction},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

#[cfg(doc)]
use crate::domain::Booking;

impl<C> Database<Select<By<Vec<Transaction>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Transaction>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Transaction>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let booking_id: booking::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, kind, \
                   amount, amount_currency, \
                   method, booking_id, creator_id, \
                   created_at \
            FROM transactions \
            WHERE booking_id = $1::UUID \
            ORDER BY created_at ASC, id ASC";
        Ok(self
            .query(SQL, &[&booking_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Transaction {
                id: row.get("id"),
                kind: row.get("kind"),
                amount: Money {
                    amount: row.get("amount"),
                    currency: row.get("amount_currency"),
                },
                method: row.get("method"),
                booking_id: row.get("booking_id"),
                creator_id: row.get("creator_id"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

impl<C> Database<Insert<Transaction>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(transaction): Insert<Transaction>,
    ) -> Result<Self::Ok, Self::Err> {
        let Transaction {
            id,
            kind,
            amount,
            method,
            booking_id,
            creator_id,
            created_at,
        } = transaction;

        const SQL: &str = "\
            INSERT INTO transactions (\
                id, kind, \
                amount, amount_currency, \
                method, booking_id, creator_id, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, $2::INT2, \
                $3::NUMERIC, $4::INT2, \
                $5::INT2, $6::UUID, $7::UUID, \
                $8::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &kind,
                &amount.amount,
                &amount.currency,
                &method,
                &booking_id,
                &creator_id,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
