//! [`Order`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A food/drink order, either charged to a `Booking` or standalone.
#[derive(Clone, Debug, From)]
pub struct Order {
    /// ID of this [`Order`].
    id: Id,

    /// Underlying [`domain::Order`].
    order: OnceCell<domain::Order>,
}

impl From<domain::Order> for Order {
    fn from(order: domain::Order) -> Self {
        Self {
            id: order.id.into(),
            order: OnceCell::new_with(Some(order)),
        }
    }
}

impl Order {
    /// Creates a new [`Order`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Order`] with the provided ID exists,
    /// otherwise accessing this [`Order`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            order: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Order`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Order`] doesn't exist.
    async fn order(&self, ctx: &Context) -> Result<&domain::Order, Error> {
        let id = self.id.into();
        self.order
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::order::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|o| {
                        future::ready(o.ok_or_else(|| {
                            api::query::OrderError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A food/drink order, either charged to a `Booking` or standalone.
#[graphql_object(context = Context)]
impl Order {
    /// Unique identifier of this `Order`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Booking` this `Order` is charged to (if any).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.booking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Booking>, Error> {
        Ok(self.order(ctx).await?.booking_id.map(|id| {
            #[expect(
                unsafe_code,
                reason = "`Order` loaded from repository guarantees \
                          `Booking` existence"
            )]
            unsafe {
                api::Booking::new_unchecked(id)
            }
        }))
    }

    /// Status of this `Order`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.order(ctx).await?.status.into())
    }

    /// Total of this `Order`, as recorded at its creation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.total",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.order(ctx).await?.total)
    }

    /// `DateTime` when this `Order` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.order(ctx).await?.created_at.coerce())
    }

    /// Line items of this `Order`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.items",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn items(&self, ctx: &Context) -> Result<Vec<Item>, Error> {
        ctx.service()
            .execute(query::order::Items::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|is| is.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of an `Order`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::order::Id)]
#[into(domain::order::Id)]
#[graphql(name = "OrderId", transparent)]
pub struct Id(Uuid);

/// Unique identifier of a product.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::product::Id)]
#[into(domain::product::Id)]
#[graphql(transparent)]
pub struct ProductId(Uuid);

/// Status of an `Order`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "OrderStatus")]
pub enum Status {
    /// Accepted, not yet in preparation.
    Pending,

    /// Being prepared.
    Preparing,

    /// Handed over to the table.
    Delivered,

    /// Paid out.
    Completed,

    /// Voided and excluded from billing.
    Cancelled,
}

impl From<domain::order::Status> for Status {
    fn from(status: domain::order::Status) -> Self {
        use domain::order::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Preparing => Self::Preparing,
            S::Delivered => Self::Delivered,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

/// A single line of an `Order`: a product with its quantity and price
/// snapshot.
#[derive(Clone, Debug, From, Into)]
pub struct Item(domain::order::Item);

/// A single line of an `Order`: a product with its quantity and price
/// snapshot.
#[graphql_object(name = "OrderItem", context = Context)]
impl Item {
    /// Unique identifier of this `OrderItem`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OrderItem.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.0.id.into()
    }

    /// ID of the product this `OrderItem` refers to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OrderItem.productId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn product_id(&self) -> ProductId {
        self.0.product_id.into()
    }

    /// Number of units of this `OrderItem`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OrderItem.quantity",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn quantity(&self) -> i32 {
        self.0.quantity.get()
    }

    /// Selling price of a single unit, as snapshotted at the `Order`
    /// creation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OrderItem.unitPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn unit_price(&self) -> Money {
        self.0.unit_price
    }

    /// Purchase cost of a single unit (if recorded).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OrderItem.unitCost",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn unit_cost(&self) -> Option<Money> {
        self.0.unit_cost
    }
}

/// Unique identifier of an `OrderItem`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::order::item::Id)]
#[into(domain::order::item::Id)]
#[graphql(name = "OrderItemId", transparent)]
pub struct ItemId(Uuid);

/// Input describing a single line of a new `Order`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "OrderItemInput")]
pub struct ItemInput {
    /// ID of the product being ordered.
    pub product_id: ProductId,

    /// Number of units being ordered. Must be positive.
    pub quantity: i32,

    /// Selling price of a single unit.
    pub unit_price: Money,

    /// Purchase cost of a single unit (if known).
    pub unit_cost: Option<Money>,
}
