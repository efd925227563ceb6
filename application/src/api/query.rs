//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Table` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `TABLE_NOT_EXISTS` - the `Table` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "table",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn table(
        id: api::table::Id,
        ctx: &Context,
    ) -> Result<api::Table, Error> {
        ctx.service()
            .execute(query::table::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| TableError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns all `Table`s of the club, ordered by name.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "tables",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn tables(ctx: &Context) -> Result<Vec<api::Table>, Error> {
        ctx.service()
            .execute(query::table::All::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ts| ts.into_iter().map(Into::into).collect())
    }

    /// Returns the `Booking` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "booking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(query::booking::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| BookingError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Order` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ORDER_NOT_EXISTS` - the `Order` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "order",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn order(
        id: api::order::Id,
        ctx: &Context,
    ) -> Result<api::Order, Error> {
        ctx.service()
            .execute(query::order::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| OrderError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Computes the live `Bill` of the `Booking` with the specified ID at the
    /// current instant.
    ///
    /// Open occupancies are billed as if they ended right now, so polling
    /// this query previews exactly what a settlement happening at the same
    /// instant would charge.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "bill",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn bill(
        booking_id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Bill, Error> {
        ctx.service()
            .execute(query::bill::Live {
                booking_id: booking_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| BookingError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum BookingError {
        #[code = "BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Booking` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum OrderError {
        #[code = "ORDER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Order` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum TableError {
        #[code = "TABLE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Table` with the specified ID does not exist"]
        NotExists,
    }
}
