//! [`Table`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use tracerr::Traced;

use crate::{
    domain::{table, Table},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C, IDs> Database<Select<By<HashMap<table::Id, Table>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[table::Id]>,
{
    type Ok = HashMap<table::Id, Table>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<table::Id, Table>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[table::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, name, kind, \
                   hourly_rate, hourly_rate_currency, \
                   status \
            FROM tables \
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
                    Table {
                        id,
                        name: row.get("name"),
                        kind: row.get("kind"),
                        hourly_rate: Money {
                            amount: row.get("hourly_rate"),
                            currency: row.get("hourly_rate_currency"),
                        },
                        status: row.get("status"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Table>, table::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<table::Id, Table>, [table::Id; 1]>>,
        Ok = HashMap<table::Id, Table>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Table>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Table>, table::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Table>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Table>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<Table>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, name, kind, \
                   hourly_rate, hourly_rate_currency, \
                   status \
            FROM tables \
            ORDER BY name ASC";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Table {
                id: row.get("id"),
                name: row.get("name"),
                kind: row.get("kind"),
                hourly_rate: Money {
                    amount: row.get("hourly_rate"),
                    currency: row.get("hourly_rate_currency"),
                },
                status: row.get("status"),
            })
            .collect())
    }
}

impl<C> Database<Insert<Table>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Table>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(table): Insert<Table>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(table)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Table>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(table): Update<Table>,
    ) -> Result<Self::Ok, Self::Err> {
        let Table {
            id,
            name,
            kind,
            hourly_rate,
            status,
        } = table;

        const SQL: &str = "\
            INSERT INTO tables (\
                id, name, kind, \
                hourly_rate, hourly_rate_currency, \
                status\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::INT2, \
                $4::NUMERIC, $5::INT2, \
                $6::INT2\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                kind = EXCLUDED.kind, \
                hourly_rate = EXCLUDED.hourly_rate, \
                hourly_rate_currency = EXCLUDED.hourly_rate_currency, \
                status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &kind,
                &hourly_rate.amount,
                &hourly_rate.currency,
                &status,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Table, table::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Table, table::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: table::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO tables_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
