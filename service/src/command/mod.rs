//! [`Command`] definition.

pub mod add_booking_table;
pub mod cancel_booking;
pub mod cancel_order;
pub mod create_booking;
pub mod create_order;
pub mod end_booking_table;
pub mod settle_booking;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_booking_table::AddBookingTable, cancel_booking::CancelBooking,
    cancel_order::CancelOrder, create_booking::CreateBooking,
    create_order::CreateOrder, end_booking_table::EndBookingTable,
    settle_booking::SettleBooking,
};
