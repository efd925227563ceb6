//! [`Transaction`]-related definitions.

use common::{DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// An immutable entry of the money ledger.
#[derive(Clone, Debug, From, Into)]
pub struct Transaction(domain::Transaction);

/// An immutable entry of the money ledger.
#[graphql_object(context = Context)]
impl Transaction {
    /// Unique identifier of this `Transaction`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Transaction.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Kind of this `Transaction`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Transaction.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Amount of this `Transaction`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Transaction.amount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn amount(&self) -> Money {
        self.0.amount
    }

    /// Method this `Transaction` was paid with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Transaction.method",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn method(&self) -> Method {
        self.0.method.into()
    }

    /// `Booking` this `Transaction` was recorded against (if any).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Transaction.booking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn booking(&self) -> Option<api::Booking> {
        self.0.booking_id.map(|id| {
            #[expect(
                unsafe_code,
                reason = "`Transaction` loaded from repository guarantees \
                          `Booking` existence"
            )]
            unsafe {
                api::Booking::new_unchecked(id)
            }
        })
    }

    /// ID of the staff member who recorded this `Transaction` (if
    /// identified).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Transaction.creatorId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn creator_id(&self) -> Option<StaffId> {
        self.0.creator_id.map(Into::into)
    }

    /// `DateTime` when this `Transaction` was recorded.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Transaction.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Transaction`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::transaction::Id)]
#[into(domain::transaction::Id)]
#[graphql(name = "TransactionId", transparent)]
pub struct Id(Uuid);

/// Unique identifier of a staff member.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::staff::Id)]
#[into(domain::staff::Id)]
#[graphql(transparent)]
pub struct StaffId(Uuid);

/// Kind of a `Transaction`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "TransactionKind")]
pub enum Kind {
    /// Money received from a customer.
    Revenue,

    /// Money spent on running the club.
    Expense,

    /// Money spent on restocking products.
    Purchase,
}

impl From<domain::transaction::Kind> for Kind {
    fn from(kind: domain::transaction::Kind) -> Self {
        use domain::transaction::Kind as K;
        match kind {
            K::Revenue => Self::Revenue,
            K::Expense => Self::Expense,
            K::Purchase => Self::Purchase,
        }
    }
}

/// Method a `Transaction` was paid with.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "TransactionMethod")]
pub enum Method {
    /// Cash over the counter.
    Cash,

    /// Card terminal.
    Card,

    /// Bank transfer.
    Transfer,
}

impl From<domain::transaction::Method> for Method {
    fn from(method: domain::transaction::Method) -> Self {
        use domain::transaction::Method as M;
        match method {
            M::Cash => Self::Cash,
            M::Card => Self::Card,
            M::Transfer => Self::Transfer,
        }
    }
}

impl From<Method> for domain::transaction::Method {
    fn from(method: Method) -> Self {
        use Method as M;
        match method {
            M::Cash => Self::Cash,
            M::Card => Self::Card,
            M::Transfer => Self::Transfer,
        }
    }
}
