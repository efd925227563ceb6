//! GraphQL API definitions.

pub mod bill;
pub mod booking;
mod mutation;
pub mod order;
mod query;
pub mod scalar;
pub mod table;
pub mod transaction;

use crate::Context;

pub use self::{
    bill::Bill, booking::Booking, mutation::Mutation, order::Order,
    query::Query, table::Table, transaction::Transaction,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<
    'static,
    Query,
    Mutation,
    juniper::EmptySubscription<Context>,
>;
