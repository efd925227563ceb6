//! [`Booking`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    money,
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{booking, Booking},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C, IDs> Database<Select<By<HashMap<booking::Id, Booking>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[booking::Id]>,
{
    type Ok = HashMap<booking::Id, Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<booking::Id, Booking>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[booking::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, customer_id, status, note, \
                   started_at, ended_at, \
                   total, total_currency \
            FROM bookings \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Booking {
                        id,
                        customer_id: row.get("customer_id"),
                        status: row.get("status"),
                        note: row.get("note"),
                        started_at: row.get("started_at"),
                        ended_at: row.get("ended_at"),
                        total: row
                            .get::<_, Option<Decimal>>("total")
                            .zip(row.get::<_, Option<money::Currency>>(
                                "total_currency",
                            ))
                            .map(|(amount, currency)| Money {
                                amount,
                                currency,
                            }),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<booking::Id, Booking>, [booking::Id; 1]>>,
        Ok = HashMap<booking::Id, Booking>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Booking>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            customer_id,
            status,
            note,
            started_at,
            ended_at,
            total,
        } = booking;

        let total_amount = total.map(|t| t.amount);
        let total_currency = total.map(|t| t.currency);

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, customer_id, status, note, \
                started_at, ended_at, \
                total, total_currency\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::INT2, $4::VARCHAR, \
                $5::TIMESTAMPTZ, $6::TIMESTAMPTZ, \
                $7::NUMERIC, $8::INT2\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET customer_id = EXCLUDED.customer_id, \
                status = EXCLUDED.status, \
                note = EXCLUDED.note, \
                started_at = EXCLUDED.started_at, \
                ended_at = EXCLUDED.ended_at, \
                total = EXCLUDED.total, \
                total_currency = EXCLUDED.total_currency";
        self.exec(
            SQL,
            &[
                &id,
                &customer_id,
                &status,
                &note,
                &started_at,
                &ended_at,
                &total_amount,
                &total_currency,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Booking, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: booking::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO bookings_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
