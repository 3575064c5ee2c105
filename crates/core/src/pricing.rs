//! Pricing
//!
//! Pure functions behind every total the portal shows. Amounts are exact
//! [`Decimal`] values; [`format_currency`] is the only place they become text.

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartLine;

/// Errors raised while constructing a [`TaxRate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxRateError {
    /// Rates are fractions of the taxed amount and can't be negative.
    #[error("tax rate {0} is negative")]
    Negative(Decimal),
}

/// Fraction of an amount charged as tax (IVA), e.g. `0.12` for 12%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// A zero rate.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a rate from a fraction (`0.12`).
    ///
    /// # Errors
    ///
    /// Returns [`TaxRateError::Negative`] for rates below zero.
    pub fn from_fraction(fraction: Decimal) -> Result<Self, TaxRateError> {
        if fraction.is_sign_negative() && !fraction.is_zero() {
            return Err(TaxRateError::Negative(fraction));
        }

        Ok(Self(fraction.normalize()))
    }

    /// Creates a rate from a whole percentage (`12` for 12%).
    #[must_use]
    pub fn from_percent(percent: u32) -> Self {
        Self(Decimal::new(i64::from(percent), 2).normalize())
    }

    /// The rate as a fraction.
    #[must_use]
    pub fn fraction(self) -> Decimal {
        self.0
    }

    /// Display label, e.g. `"12%"`.
    #[must_use]
    pub fn percent_label(self) -> String {
        format!("{}%", (self.0 * Decimal::ONE_HUNDRED).normalize())
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.percent_label())
    }
}

/// Price of `quantity` units at `unit_price`.
#[must_use]
pub fn line_subtotal(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Sum of every line's subtotal. An empty cart costs nothing.
pub fn cart_subtotal<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> Decimal {
    lines
        .into_iter()
        .map(|line| line_subtotal(line.unit_price(), line.quantity()))
        .sum()
}

/// Tax owed on `amount` at `rate`.
#[must_use]
pub fn tax(amount: Decimal, rate: TaxRate) -> Decimal {
    amount * rate.fraction()
}

/// Subtotal plus tax.
#[must_use]
pub fn total(subtotal: Decimal, tax: Decimal) -> Decimal {
    subtotal + tax
}

/// Formats an amount as US dollars with two fractional digits, e.g. `$1,234.50`.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    format!("{}", Money::from_decimal(amount, iso::USD))
}

/// Placeholder invoice number shown before the backend issues the real one.
#[must_use]
pub fn provisional_invoice_number(id: u64, year: i16) -> String {
    format!("FAC-{year}-{id:05}")
}
