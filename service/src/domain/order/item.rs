//! [`Item`] definitions.

use common::Money;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product;
#[cfg(doc)]
use crate::domain::Order;

/// One product line of an [`Order`].
#[derive(Clone, Debug)]
pub struct Item {
    /// ID of this [`Item`].
    pub id: Id,

    /// ID of the [`Order`] owning this [`Item`].
    pub order_id: super::Id,

    /// ID of the ordered product.
    pub product_id: product::Id,

    /// Number of units ordered.
    pub quantity: Quantity,

    /// Price of one unit, snapshotted from the catalog at order time.
    ///
    /// Never changes afterwards, so later catalog edits don't affect this
    /// [`Item`].
    pub unit_price: Money,

    /// Cost of one unit at order time, if known. Used for margin reporting.
    ///
    /// Snapshotted like [`unit_price`].
    ///
    /// [`unit_price`]: Item::unit_price
    pub unit_cost: Option<Money>,
}

impl Item {
    /// Returns the total price of this [`Item`]: `quantity × unit price`.
    #[must_use]
    pub fn amount(&self) -> Money {
        Money {
            amount: Decimal::from(self.quantity.get())
                * self.unit_price.amount,
            currency: self.unit_price.currency,
        }
    }
}

/// ID of an [`Item`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Number of units of an [`Item`]. Always positive.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Quantity(i32);

impl Quantity {
    /// Creates a new [`Quantity`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `quantity` is positive.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(quantity: i32) -> Self {
        Self(quantity)
    }

    /// Creates a new [`Quantity`] if the given `quantity` is valid.
    #[must_use]
    pub fn new(quantity: i32) -> Option<Self> {
        (quantity > 0).then_some(Self(quantity))
    }

    /// Returns this [`Quantity`] as an [`i32`].
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl FromStr for Quantity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Quantity`")
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};
    use rust_decimal::Decimal;

    use super::{Id, Item, Quantity};
    use crate::domain::{order, product};

    #[test]
    fn amount_is_quantity_times_unit_price() {
        let item = Item {
            id: Id::new(),
            order_id: order::Id::new(),
            product_id: product::Id::new(),
            quantity: Quantity::new(3).unwrap(),
            unit_price: Money {
                amount: "25000".parse().unwrap(),
                currency: Currency::Vnd,
            },
            unit_cost: None,
        };

        assert_eq!(
            item.amount(),
            Money {
                amount: Decimal::from(75_000),
                currency: Currency::Vnd,
            },
        );
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(Quantity::new(1).is_some());
        assert!(Quantity::new(0).is_none());
        assert!(Quantity::new(-2).is_none());
    }
}
