//! Domain definitions.

pub mod booking;
pub mod customer;
pub mod order;
pub mod product;
pub mod staff;
pub mod table;
pub mod transaction;

pub use self::{
    booking::Booking, order::Order, table::Table, transaction::Transaction,
};
