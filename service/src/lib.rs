//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod billing;
pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use common::{clock, money::Currency};
use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Bookkeeping [`Currency`] of the club.
    ///
    /// All table rates and product prices are recorded in it, and a
    /// [`Booking`] without any charges settles to zero in it.
    ///
    /// [`Booking`]: domain::Booking
    #[default(Currency::Vnd)]
    pub currency: Currency,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Clk = clock::System> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Clock`] of this [`Service`].
    ///
    /// [`Clock`]: common::Clock
    clock: Clk,
}

impl<Db, Clk> Service<Db, Clk> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(config: Config, database: Db, clock: Clk) -> Self {
        Self {
            config,
            database,
            clock,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the [`Clock`] of this [`Service`].
    ///
    /// [`Clock`]: common::Clock
    #[must_use]
    pub fn clock(&self) -> &Clk {
        &self.clock
    }
}
