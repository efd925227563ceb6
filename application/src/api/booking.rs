//! [`Booking`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A visit of a group of players occupying tables of the club.
#[derive(Clone, Debug, From)]
pub struct Booking {
    /// ID of this [`Booking`].
    id: Id,

    /// Underlying [`domain::Booking`].
    booking: OnceCell<domain::Booking>,
}

impl From<domain::Booking> for Booking {
    fn from(booking: domain::Booking) -> Self {
        Self {
            id: booking.id.into(),
            booking: OnceCell::new_with(Some(booking)),
        }
    }
}

impl Booking {
    /// Creates a new [`Booking`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Booking`] with the provided ID exists,
    /// otherwise accessing this [`Booking`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            booking: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Booking`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Booking`] doesn't exist.
    async fn booking(&self, ctx: &Context) -> Result<&domain::Booking, Error> {
        let id = self.id.into();
        self.booking
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::booking::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|b| {
                        future::ready(b.ok_or_else(|| {
                            api::query::BookingError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A visit of a group of players occupying tables of the club.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// ID of the customer this `Booking` belongs to (if known).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.customerId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer_id(
        &self,
        ctx: &Context,
    ) -> Result<Option<CustomerId>, Error> {
        Ok(self.booking(ctx).await?.customer_id.map(Into::into))
    }

    /// Status of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.booking(ctx).await?.status.into())
    }

    /// Free-form note attached to this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.note",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn note(&self, ctx: &Context) -> Result<Option<Note>, Error> {
        Ok(self.booking(ctx).await?.note.clone().map(Into::into))
    }

    /// `DateTime` when this `Booking` was started.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.startedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn started_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.booking(ctx).await?.started_at.coerce())
    }

    /// `DateTime` when this `Booking` was settled (if it was).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.endedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn ended_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.booking(ctx).await?.ended_at.map(|t| t.coerce()))
    }

    /// Grand total this `Booking` was settled with (if it was).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.total",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total(&self, ctx: &Context) -> Result<Option<Money>, Error> {
        Ok(self.booking(ctx).await?.total)
    }

    /// `Occupancy`s of this `Booking`, ordered by their start.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.occupancies",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn occupancies(
        &self,
        ctx: &Context,
    ) -> Result<Vec<Occupancy>, Error> {
        ctx.service()
            .execute(query::booking::Occupancies::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|os| os.into_iter().map(Into::into).collect())
    }

    /// `Order`s charged to this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.orders",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn orders(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Order>, Error> {
        ctx.service()
            .execute(query::booking::Orders::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|os| os.into_iter().map(Into::into).collect())
    }

    /// `Transaction`s recorded against this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.transactions",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn transactions(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Transaction>, Error> {
        ctx.service()
            .execute(query::transaction::OfBooking::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ts| ts.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Booking`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Unique identifier of a customer.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::customer::Id)]
#[into(domain::customer::Id)]
#[graphql(transparent)]
pub struct CustomerId(Uuid);

/// Free-form note attached to a `Booking`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "BookingNote",
    with = scalar::Via::<domain::booking::Note>,
)]
pub struct Note(domain::booking::Note);

/// Status of a `Booking`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// Reserved, not yet started.
    Pending,

    /// In progress.
    Confirmed,

    /// Aborted without settlement.
    Cancelled,

    /// Settled.
    Completed,
}

impl From<domain::booking::Status> for Status {
    fn from(status: domain::booking::Status) -> Self {
        use domain::booking::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::Cancelled => Self::Cancelled,
            S::Completed => Self::Completed,
        }
    }
}

/// A single table attached to a `Booking` for a span of time.
#[derive(Clone, Debug, From, Into)]
pub struct Occupancy(domain::booking::Occupancy);

/// A single table attached to a `Booking` for a span of time.
#[graphql_object(context = Context)]
impl Occupancy {
    /// Unique identifier of this `Occupancy`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Occupancy.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn id(&self) -> OccupancyId {
        self.0.id.into()
    }

    /// `Table` this `Occupancy` runs on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Occupancy.table",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn table(&self) -> api::Table {
        #[expect(
            unsafe_code,
            reason = "`Occupancy` loaded from repository guarantees `Table` \
                      existence"
        )]
        unsafe {
            api::Table::new_unchecked(self.0.table_id)
        }
    }

    /// Hourly rate this `Occupancy` is billed with, as snapshotted when the
    /// table was attached.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Occupancy.pricePerHour",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn price_per_hour(&self) -> Money {
        self.0.price_per_hour
    }

    /// `DateTime` when this `Occupancy` was started.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Occupancy.startedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn started_at(&self) -> DateTime {
        self.0.started_at.coerce()
    }

    /// `DateTime` when this `Occupancy` was ended (if it was).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Occupancy.endedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime> {
        self.0.ended_at.map(|t| t.coerce())
    }
}

/// Unique identifier of an `Occupancy`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::booking::occupancy::Id)]
#[into(domain::booking::occupancy::Id)]
#[graphql(transparent)]
pub struct OccupancyId(Uuid);
