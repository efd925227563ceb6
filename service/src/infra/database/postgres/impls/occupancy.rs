//! [`Occupancy`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select, Update},
    Money,
};
use tracerr::Traced;

use crate::{
    domain::booking::{self, occupancy, Occupancy},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

#[cfg(doc)]
use crate::domain::Booking;

impl<C> Database<Select<By<Vec<Occupancy>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Occupancy>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Occupancy>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let booking_id: booking::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, booking_id, table_id, \
                   price_per_hour, price_per_hour_currency, \
                   started_at, ended_at \
            FROM occupancies \
            WHERE booking_id = $1::UUID \
            ORDER BY started_at ASC, id ASC";
        Ok(self
            .query(SQL, &[&booking_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Occupancy {
                id: row.get("id"),
                booking_id: row.get("booking_id"),
                table_id: row.get("table_id"),
                price_per_hour: Money {
                    amount: row.get("price_per_hour"),
                    currency: row.get("price_per_hour_currency"),
                },
                started_at: row.get("started_at"),
                ended_at: row.get("ended_at"),
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Occupancy>, occupancy::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Occupancy>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Occupancy>, occupancy::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: occupancy::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, booking_id, table_id, \
                   price_per_hour, price_per_hour_currency, \
                   started_at, ended_at \
            FROM occupancies \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Occupancy {
                id: row.get("id"),
                booking_id: row.get("booking_id"),
                table_id: row.get("table_id"),
                price_per_hour: Money {
                    amount: row.get("price_per_hour"),
                    currency: row.get("price_per_hour_currency"),
                },
                started_at: row.get("started_at"),
                ended_at: row.get("ended_at"),
            }))
    }
}

impl<C> Database<Insert<Occupancy>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Occupancy>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(occupancy): Insert<Occupancy>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(occupancy))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Occupancy>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(occupancy): Update<Occupancy>,
    ) -> Result<Self::Ok, Self::Err> {
        let Occupancy {
            id,
            booking_id,
            table_id,
            price_per_hour,
            started_at,
            ended_at,
        } = occupancy;

        const SQL: &str = "\
            INSERT INTO occupancies (\
                id, booking_id, table_id, \
                price_per_hour, price_per_hour_currency, \
                started_at, ended_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::NUMERIC, $5::INT2, \
                $6::TIMESTAMPTZ, $7::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET booking_id = EXCLUDED.booking_id, \
                table_id = EXCLUDED.table_id, \
                price_per_hour = EXCLUDED.price_per_hour, \
                price_per_hour_currency = EXCLUDED.price_per_hour_currency, \
                started_at = EXCLUDED.started_at, \
                ended_at = EXCLUDED.ended_at";
        self.exec(
            SQL,
            &[
                &id,
                &booking_id,
                &table_id,
                &price_per_hour.amount,
                &price_per_hour.currency,
                &started_at,
                &ended_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
