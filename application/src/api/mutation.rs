//! GraphQL [`Mutation`]s definitions.

use common::DateTime;
use juniper::graphql_object;
use service::{command, domain::order::item, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Booking` occupying the specified `Table`s.
    ///
    /// All the specified `Table`s are attached atomically: if any of them is
    /// not available, no `Booking` is created.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `TABLE_NOT_EXISTS` - a `Table` with one of the specified IDs does
    ///                        not exist;
    /// - `TABLE_NOT_AVAILABLE` - one of the specified `Table`s is not
    ///                           available.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = ?customer_id.as_ref().map(ToString::to_string),
            gql.name = "createBooking",
            note = ?note.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            started_at = ?started_at.as_ref().map(DateTime::to_rfc3339),
            table_ids = ?table_ids.iter().map(ToString::to_string)
                .collect::<Vec<_>>(),
        ),
    )]
    pub async fn create_booking(
        table_ids: Vec<api::table::Id>,
        customer_id: Option<api::booking::CustomerId>,
        note: Option<api::booking::Note>,
        started_at: Option<DateTime>,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::CreateBooking {
                tables: table_ids.into_iter().map(Into::into).collect(),
                customer_id: customer_id.map(Into::into),
                note: note.map(Into::into),
                started_at: started_at.map(DateTime::coerce),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Attaches the specified `Table` to the `Booking` with the provided ID,
    /// opening a new `Occupancy` on it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the provided ID does not
    ///                          exist;
    /// - `BOOKING_NOT_OPEN` - the `Booking` with the provided ID is settled
    ///                        or cancelled already;
    /// - `TABLE_NOT_EXISTS` - the `Table` with the provided ID does not
    ///                        exist;
    /// - `TABLE_NOT_AVAILABLE` - the `Table` with the provided ID is not
    ///                           available.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "addBookingTable",
            otel.name = Self::SPAN_NAME,
            started_at = ?started_at.as_ref().map(DateTime::to_rfc3339),
            table_id = %table_id,
        ),
    )]
    pub async fn add_booking_table(
        booking_id: api::booking::Id,
        table_id: api::table::Id,
        started_at: Option<DateTime>,
        ctx: &Context,
    ) -> Result<api::booking::Occupancy, Error> {
        ctx.service()
            .execute(command::AddBookingTable {
                booking_id: booking_id.into(),
                table_id: table_id.into(),
                started_at: started_at.map(DateTime::coerce),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Ends the `Occupancy` with the provided ID, detaching its `Table` from
    /// the `Booking` and freezing its time charge.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `OCCUPANCY_NOT_EXISTS` - the `Occupancy` with the provided ID does
    ///                            not exist;
    /// - `OCCUPANCY_ALREADY_ENDED` - the `Occupancy` with the provided ID is
    ///                               ended already;
    /// - `BOOKING_NOT_OPEN` - the owning `Booking` is settled or cancelled
    ///                        already.
    #[tracing::instrument(
        skip_all,
        fields(
            ended_at = ?ended_at.as_ref().map(DateTime::to_rfc3339),
            gql.name = "endBookingTable",
            occupancy_id = %occupancy_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn end_booking_table(
        occupancy_id: api::booking::OccupancyId,
        ended_at: Option<DateTime>,
        ctx: &Context,
    ) -> Result<api::booking::Occupancy, Error> {
        ctx.service()
            .execute(command::EndBookingTable {
                occupancy_id: occupancy_id.into(),
                ended_at: ended_at.map(DateTime::coerce),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Settles the `Booking` with the provided ID, ending its open
    /// occupancies, fixing its total and recording a revenue `Transaction`.
    ///
    /// The settled total is the `Bill` computed at the settlement instant,
    /// so it always matches the live preview taken at the same moment. The
    /// recorded `Transaction` is attributed to the staff member identified
    /// by the `X-Staff-Id` request header (if provided).
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the provided ID does not
    ///                          exist;
    /// - `BOOKING_ALREADY_SETTLED` - the `Booking` with the provided ID is
    ///                               settled already;
    /// - `BOOKING_ALREADY_CANCELLED` - the `Booking` with the provided ID is
    ///                                 cancelled.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            ended_at = ?ended_at.as_ref().map(DateTime::to_rfc3339),
            gql.name = "settleBooking",
            method = ?method,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn settle_booking(
        booking_id: api::booking::Id,
        method: api::transaction::Method,
        ended_at: Option<DateTime>,
        ctx: &Context,
    ) -> Result<api::Bill, Error> {
        ctx.service()
            .execute(command::SettleBooking {
                booking_id: booking_id.into(),
                method: method.into(),
                staff_id: ctx.staff_id(),
                ended_at: ended_at.map(DateTime::coerce),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `Booking` with the provided ID, ending its open
    /// occupancies without charging anything.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the provided ID does not
    ///                          exist;
    /// - `BOOKING_ALREADY_SETTLED` - the `Booking` with the provided ID is
    ///                               settled already;
    /// - `BOOKING_ALREADY_CANCELLED` - the `Booking` with the provided ID is
    ///                                 cancelled already.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "cancelBooking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_booking(
        booking_id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::CancelBooking {
                booking_id: booking_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Order`, either charged to the `Booking` with the
    /// provided ID or standalone.
    ///
    /// The `Order` total is computed from the provided items and fixed at
    /// creation.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the provided ID does not
    ///                          exist;
    /// - `BOOKING_NOT_OPEN` - the `Booking` with the provided ID is settled
    ///                        or cancelled already;
    /// - `NO_ORDER_ITEMS` - no items were provided;
    /// - `INVALID_QUANTITY` - an item quantity is not positive;
    /// - `CURRENCY_MISMATCH` - an item price or cost is not in the
    ///                         bookkeeping currency.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = ?booking_id.as_ref().map(ToString::to_string),
            gql.name = "createOrder",
            items = items.len(),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_order(
        booking_id: Option<api::booking::Id>,
        items: Vec<api::order::ItemInput>,
        ctx: &Context,
    ) -> Result<api::Order, Error> {
        let items = items
            .into_iter()
            .map(|i| {
                Ok(command::create_order::NewItem {
                    product_id: i.product_id.into(),
                    quantity: item::Quantity::new(i.quantity)
                        .ok_or(OrderItemError::InvalidQuantity)?,
                    unit_price: i.unit_price,
                    unit_cost: i.unit_cost,
                })
            })
            .collect::<Result<Vec<_>, OrderItemError>>()
            .map_err(Into::into)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateOrder {
                booking_id: booking_id.map(Into::into),
                items,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `Order` with the provided ID, excluding it from billing.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ORDER_NOT_EXISTS` - the `Order` with the provided ID does not
    ///                        exist;
    /// - `ORDER_NOT_CANCELLABLE` - the `Order` with the provided ID is
    ///                             completed or cancelled already;
    /// - `BOOKING_NOT_OPEN` - the owning `Booking` is settled or cancelled
    ///                        already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelOrder",
            order_id = %order_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_order(
        order_id: api::order::Id,
        ctx: &Context,
    ) -> Result<api::Order, Error> {
        ctx.service()
            .execute(command::CancelOrder {
                order_id: order_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum OrderItemError {
        #[code = "INVALID_QUANTITY"]
        #[status = BAD_REQUEST]
        #[message = "`OrderItem` quantity must be positive"]
        InvalidQuantity,
    }
}

impl AsError for command::create_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "TABLE_NOT_AVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Table` with the provided ID is not available"]
                TableNotAvailable,

                #[code = "TABLE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Table` with the provided ID does not exist"]
                TableNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::TableNotAvailable(_) => Error::TableNotAvailable.into(),
            Self::TableNotExists(_) => Error::TableNotExists.into(),
        })
    }
}

impl AsError for command::add_booking_table::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Booking` with the provided ID does not exist"]
                BookingNotExists,

                #[code = "BOOKING_NOT_OPEN"]
                #[status = CONFLICT]
                #[message = "`Booking` with the provided ID is settled or \
                             cancelled already"]
                BookingNotOpen,

                #[code = "TABLE_NOT_AVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Table` with the provided ID is not available"]
                TableNotAvailable,

                #[code = "TABLE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Table` with the provided ID does not exist"]
                TableNotExists,
            }
        }

        Some(match self {
            Self::BookingNotExists(_) => Error::BookingNotExists.into(),
            Self::BookingNotOpen(_) => Error::BookingNotOpen.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::TableNotAvailable(_) => Error::TableNotAvailable.into(),
            Self::TableNotExists(_) => Error::TableNotExists.into(),
        })
    }
}

impl AsError for command::end_booking_table::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_OPEN"]
                #[status = CONFLICT]
                #[message = "`Booking` owning the `Occupancy` is settled or \
                             cancelled already"]
                BookingNotOpen,

                #[code = "OCCUPANCY_ALREADY_ENDED"]
                #[status = CONFLICT]
                #[message = "`Occupancy` with the provided ID is ended \
                             already"]
                OccupancyAlreadyEnded,

                #[code = "OCCUPANCY_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Occupancy` with the provided ID does not exist"]
                OccupancyNotExists,
            }
        }

        Some(match self {
            Self::BookingNotExists(_) | Self::TableNotExists(_) => return None,
            Self::BookingNotOpen(_) => Error::BookingNotOpen.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::OccupancyAlreadyEnded(_) => {
                Error::OccupancyAlreadyEnded.into()
            }
            Self::OccupancyNotExists(_) => Error::OccupancyNotExists.into(),
        })
    }
}

impl AsError for command::settle_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_ALREADY_CANCELLED"]
                #[status = CONFLICT]
                #[message = "`Booking` with the provided ID is cancelled"]
                BookingAlreadyCancelled,

                #[code = "BOOKING_ALREADY_SETTLED"]
                #[status = CONFLICT]
                #[message = "`Booking` with the provided ID is settled \
                             already"]
                BookingAlreadySettled,

                #[code = "BOOKING_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Booking` with the provided ID does not exist"]
                BookingNotExists,
            }
        }

        Some(match self {
            Self::BookingAlreadyCancelled(_) => {
                Error::BookingAlreadyCancelled.into()
            }
            Self::BookingAlreadySettled(_) => {
                Error::BookingAlreadySettled.into()
            }
            Self::BookingNotExists(_) => Error::BookingNotExists.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::TableNotExists(_) => return None,
        })
    }
}

impl AsError for command::cancel_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_ALREADY_CANCELLED"]
                #[status = CONFLICT]
                #[message = "`Booking` with the provided ID is cancelled \
                             already"]
                BookingAlreadyCancelled,

                #[code = "BOOKING_ALREADY_SETTLED"]
                #[status = CONFLICT]
                #[message = "`Booking` with the provided ID is settled \
                             already"]
                BookingAlreadySettled,

                #[code = "BOOKING_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Booking` with the provided ID does not exist"]
                BookingNotExists,
            }
        }

        Some(match self {
            Self::BookingAlreadyCancelled(_) => {
                Error::BookingAlreadyCancelled.into()
            }
            Self::BookingAlreadySettled(_) => {
                Error::BookingAlreadySettled.into()
            }
            Self::BookingNotExists(_) => Error::BookingNotExists.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::TableNotExists(_) => return None,
        })
    }
}

impl AsError for command::create_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Booking` with the provided ID does not exist"]
                BookingNotExists,

                #[code = "BOOKING_NOT_OPEN"]
                #[status = CONFLICT]
                #[message = "`Booking` with the provided ID is settled or \
                             cancelled already"]
                BookingNotOpen,

                #[code = "CURRENCY_MISMATCH"]
                #[status = BAD_REQUEST]
                #[message = "`OrderItem` amount is not in the bookkeeping \
                             currency"]
                CurrencyMismatch,

                #[code = "NO_ORDER_ITEMS"]
                #[status = BAD_REQUEST]
                #[message = "At least one `OrderItem` must be provided"]
                NoItems,
            }
        }

        Some(match self {
            Self::BookingNotExists(_) => Error::BookingNotExists.into(),
            Self::BookingNotOpen(_) => Error::BookingNotOpen.into(),
            Self::CurrencyMismatch(_) => Error::CurrencyMismatch.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::NoItems => Error::NoItems.into(),
        })
    }
}

impl AsError for command::cancel_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_OPEN"]
                #[status = CONFLICT]
                #[message = "`Booking` owning the `Order` is settled or \
                             cancelled already"]
                BookingNotOpen,

                #[code = "ORDER_NOT_CANCELLABLE"]
                #[status = CONFLICT]
                #[message = "`Order` with the provided ID is completed or \
                             cancelled already"]
                OrderNotCancellable,

                #[code = "ORDER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Order` with the provided ID does not exist"]
                OrderNotExists,
            }
        }

        Some(match self {
            Self::BookingNotExists(_) => return None,
            Self::BookingNotOpen(_) => Error::BookingNotOpen.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::OrderNotCancellable(_) => Error::OrderNotCancellable.into(),
            Self::OrderNotExists(_) => Error::OrderNotExists.into(),
        })
    }
}
