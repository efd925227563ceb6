//! [`Clock`] abstractions.

use std::fmt;

use crate::datetime::DateTimeOf;

/// Source of the current date and time.
///
/// Billing math depends on "now", so it's threaded through a [`Clock`]
/// instead of being read from the OS directly, allowing tests to pin it.
pub trait Clock: fmt::Debug {
    /// Returns the current date and time.
    fn now<Of: ?Sized>(&self) -> DateTimeOf<Of>;
}

/// [`Clock`] reading the operating system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct System;

impl Clock for System {
    fn now<Of: ?Sized>(&self) -> DateTimeOf<Of> {
        DateTimeOf::now()
    }
}

/// [`Clock`] frozen at a fixed instant.
#[derive(Clone, Copy, Debug)]
pub struct Fixed(pub DateTimeOf);

impl Clock for Fixed {
    fn now<Of: ?Sized>(&self) -> DateTimeOf<Of> {
        self.0.coerce()
    }
}

#[cfg(test)]
mod spec {
    use super::{Clock as _, Fixed};
    use crate::datetime::DateTimeOf;

    #[test]
    fn fixed_returns_its_instant() {
        let at = DateTimeOf::from_unix_timestamp(1_700_000_000).unwrap();
        let clock = Fixed(at);

        assert_eq!(clock.now::<()>(), at);
        assert_eq!(clock.now::<()>(), clock.now::<()>());
    }
}
