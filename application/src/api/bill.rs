//! [`Bill`]-related definitions.

use common::{DateTime, Money};
use derive_more::From;
use juniper::graphql_object;
use service::read;

use crate::{api, Context};

/// Itemized bill of a `Booking`, computed from its occupancies and orders.
///
/// The same computation backs both the live preview and the amount a
/// settlement persists.
#[derive(Clone, Debug, From)]
pub struct Bill(read::booking::Bill);

/// Itemized bill of a `Booking`, computed from its occupancies and orders.
#[graphql_object(context = Context)]
impl Bill {
    /// `Booking` this `Bill` is computed for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Bill.booking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn booking(&self) -> api::Booking {
        #[expect(
            unsafe_code,
            reason = "`Bill` is only computed for an existing `Booking`"
        )]
        unsafe {
            api::Booking::new_unchecked(self.0.booking_id)
        }
    }

    /// Per-table time charges of this `Bill`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Bill.tableCharges",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn table_charges(&self) -> Vec<TableCharge> {
        self.0.table_charges.iter().copied().map(Into::into).collect()
    }

    /// Per-order charges of this `Bill`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Bill.orderCharges",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn order_charges(&self) -> Vec<OrderCharge> {
        self.0.order_charges.iter().copied().map(Into::into).collect()
    }

    /// Sum of all table time charges.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Bill.tableTotal",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn table_total(&self) -> Money {
        self.0.table_total
    }

    /// Sum of all order charges.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Bill.orderTotal",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn order_total(&self) -> Money {
        self.0.order_total
    }

    /// Grand total of this `Bill`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Bill.grandTotal",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn grand_total(&self) -> Money {
        self.0.grand_total
    }

    /// `DateTime` this `Bill` was computed at.
    ///
    /// Open occupancies are billed as if they ended at this instant.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Bill.computedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn computed_at(&self) -> DateTime {
        self.0.computed_at
    }
}

/// Time charge of a single `Occupancy`.
#[derive(Clone, Copy, Debug, From)]
pub struct TableCharge(read::booking::TableCharge);

/// Time charge of a single `Occupancy`.
#[graphql_object(context = Context)]
impl TableCharge {
    /// ID of the `Occupancy` this charge is billed for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "TableCharge.occupancyId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn occupancy_id(&self) -> api::booking::OccupancyId {
        self.0.occupancy_id.into()
    }

    /// `Table` this charge is billed for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "TableCharge.table",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn table(&self) -> api::Table {
        #[expect(
            unsafe_code,
            reason = "`TableCharge` is only computed for an existing `Table`"
        )]
        unsafe {
            api::Table::new_unchecked(self.0.table_id)
        }
    }

    /// `DateTime` when the billed span started.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "TableCharge.startedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn started_at(&self) -> DateTime {
        self.0.started_at.coerce()
    }

    /// `DateTime` when the billed span ended.
    ///
    /// For an open `Occupancy` this is the instant the `Bill` was computed
    /// at.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "TableCharge.endedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn ended_at(&self) -> DateTime {
        self.0.ended_at.coerce()
    }

    /// Amount billed for the span.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "TableCharge.amount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn amount(&self) -> Money {
        self.0.amount
    }
}

/// Charge of a single billable `Order`.
#[derive(Clone, Copy, Debug, From)]
pub struct OrderCharge(read::booking::OrderCharge);

/// Charge of a single billable `Order`.
#[graphql_object(context = Context)]
impl OrderCharge {
    /// `Order` this charge is billed for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OrderCharge.order",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn order(&self) -> api::Order {
        #[expect(
            unsafe_code,
            reason = "`OrderCharge` is only computed for an existing `Order`"
        )]
        unsafe {
            api::Order::new_unchecked(self.0.order_id)
        }
    }

    /// Amount billed for the `Order`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OrderCharge.amount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn amount(&self) -> Money {
        self.0.amount
    }
}
