//! Gift cards bought from the storefront modal.
//!
//! The buyer types an amount; it must parse as a Colombian price and reach
//! [`GiftCard::minimum`]. A rejected amount leaves the cart untouched.

use rust_decimal::Decimal;

use super::cart::CartLineItem;
use super::price::{Price, PriceError};

/// Line item name used for gift cards.
pub const GIFT_CARD_NAME: &str = "Tarjeta de regalo";

/// Smallest gift card sold, in whole pesos.
const MINIMUM_PESOS: i64 = 10_000;

/// Errors raised while validating user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The amount could not be parsed.
    #[error("gift card amount is not a valid price: {0}")]
    InvalidAmount(#[from] PriceError),
    /// The amount is below the minimum.
    #[error("gift card amount must be at least ${minimum} (got ${amount})")]
    BelowMinimum {
        /// Smallest accepted amount.
        minimum: Price,
        /// Amount entered.
        amount: Price,
    },
}

/// A validated gift card amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GiftCard {
    amount: Price,
}

impl GiftCard {
    /// Smallest accepted gift card amount.
    #[must_use]
    pub fn minimum() -> Price {
        Price::new(Decimal::new(MINIMUM_PESOS, 0))
    }

    /// Validate an amount.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BelowMinimum`] if `amount` is below
    /// [`GiftCard::minimum`].
    pub fn new(amount: Price) -> Result<Self, ValidationError> {
        let minimum = Self::minimum();
        if amount < minimum {
            return Err(ValidationError::BelowMinimum { minimum, amount });
        }
        Ok(Self { amount })
    }

    /// Parse and validate a user-entered amount such as `50.000`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAmount`] if the input does not parse,
    /// or [`ValidationError::BelowMinimum`] if it is too small.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Self::new(Price::parse_display(input)?)
    }

    /// The validated amount.
    #[must_use]
    pub const fn amount(&self) -> Price {
        self.amount
    }

    /// Turn the gift card into a cart line item.
    #[must_use]
    pub fn into_line_item(self) -> CartLineItem {
        let price = self.amount.display();
        let desc = format!("{GIFT_CARD_NAME} por ${price}");
        CartLineItem::new(GIFT_CARD_NAME, price, "", desc)
    }
}
