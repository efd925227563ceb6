//! [`Table`]-related definitions.

use std::future;

use common::{Handler as _, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A billiard table of the club.
#[derive(Clone, Debug, From)]
pub struct Table {
    /// ID of this [`Table`].
    id: Id,

    /// Underlying [`domain::Table`].
    table: OnceCell<domain::Table>,
}

impl From<domain::Table> for Table {
    fn from(table: domain::Table) -> Self {
        Self {
            id: table.id.into(),
            table: OnceCell::new_with(Some(table)),
        }
    }
}

impl Table {
    /// Creates a new [`Table`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Table`] with the provided ID exists,
    /// otherwise accessing this [`Table`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            table: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Table`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Table`] doesn't exist.
    async fn table(&self, ctx: &Context) -> Result<&domain::Table, Error> {
        let id = self.id.into();
        self.table
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::table::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|t| {
                        future::ready(t.ok_or_else(|| {
                            api::query::TableError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A billiard table of the club.
#[graphql_object(context = Context)]
impl Table {
    /// Unique identifier of this `Table`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Table.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Table`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Table.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.table(ctx).await?.name.clone().into())
    }

    /// Playing discipline of this `Table`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Table.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.table(ctx).await?.kind.into())
    }

    /// Hourly rate of this `Table`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Table.hourlyRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn hourly_rate(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.table(ctx).await?.hourly_rate)
    }

    /// Status of this `Table`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Table.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.table(ctx).await?.status.into())
    }
}

/// Unique identifier of a `Table`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::table::Id)]
#[into(domain::table::Id)]
#[graphql(name = "TableId", transparent)]
pub struct Id(Uuid);

/// Name of a `Table`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "TableName",
    with = scalar::Via::<domain::table::Name>,
)]
pub struct Name(domain::table::Name);

/// Playing discipline of a `Table`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "TableKind")]
pub enum Kind {
    /// Pocket billiards table.
    Pool,

    /// Carom billiards table.
    Carom,

    /// Snooker table.
    Snooker,
}

impl From<domain::table::Kind> for Kind {
    fn from(kind: domain::table::Kind) -> Self {
        use domain::table::Kind as K;
        match kind {
            K::Pool => Self::Pool,
            K::Carom => Self::Carom,
            K::Snooker => Self::Snooker,
        }
    }
}

/// Status of a `Table`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "TableStatus")]
pub enum Status {
    /// Free to be attached to a `Booking`.
    Available,

    /// Running under an open `Occupancy`.
    Occupied,

    /// Held for an upcoming `Booking`.
    Reserved,

    /// Out of service.
    Maintenance,
}

impl From<domain::table::Status> for Status {
    fn from(status: domain::table::Status) -> Self {
        use domain::table::Status as S;
        match status {
            S::Available => Self::Available,
            S::Occupied => Self::Occupied,
            S::Reserved => Self::Reserved,
            S::Maintenance => Self::Maintenance,
        }
    }
}
