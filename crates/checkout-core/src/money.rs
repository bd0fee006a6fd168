//! # Money Types
//!
//! Prices are carried in minor currency units (paise for INR) end to end.
//! Client-supplied decimal amounts are converted exactly once at the boundary
//! with round-to-nearest, so no floating point flows through business logic.

use serde::{Deserialize, Serialize};

/// Upper bound for client-supplied decimal amounts, in major units.
/// Keeps every line total and cart sum far away from i64 range.
const MAX_DECIMAL_AMOUNT: f64 = 1_000_000_000_000.0;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Inr,
    Usd,
    Eur,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    /// Returns the number of minor-unit decimal places for this currency
    pub fn decimal_places(&self) -> u8 {
        2
    }

    /// Convert a decimal amount to the smallest currency unit (paise, cents)
    pub fn to_minor_units(&self, amount: f64) -> i64 {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        (amount * multiplier).round() as i64
    }

    /// Checked conversion for untrusted decimal amounts. Rejects NaN,
    /// infinities, negatives, and anything past [`MAX_DECIMAL_AMOUNT`].
    pub fn try_to_minor_units(&self, amount: f64) -> Option<i64> {
        if !amount.is_finite() || amount < 0.0 || amount > MAX_DECIMAL_AMOUNT {
            return None;
        }
        Some(self.to_minor_units(amount))
    }

    /// Convert from the smallest unit back to a decimal amount
    pub fn from_minor_units(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Inr
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Price with amount in the smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (paise for INR)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a new price from a decimal amount
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_minor_units(amount),
            currency,
        }
    }

    /// Create a price from an untrusted decimal amount. Returns `None`
    /// for non-finite, negative, or out-of-range inputs.
    pub fn try_new(amount: f64, currency: Currency) -> Option<Self> {
        currency
            .try_to_minor_units(amount)
            .map(|amount| Self { amount, currency })
    }

    /// Create a price directly from minor units (paise)
    pub fn from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// A zero price in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_minor_units(self.amount)
    }

    /// Multiply by a quantity
    pub fn times(&self, quantity: u32) -> Price {
        Price {
            amount: self.amount * quantity as i64,
            currency: self.currency,
        }
    }

    /// Overflow-checked multiplication by a quantity
    pub fn checked_times(&self, quantity: u32) -> Option<Price> {
        self.amount.checked_mul(quantity as i64).map(|amount| Price {
            amount,
            currency: self.currency,
        })
    }

    /// Overflow-checked addition
    pub fn checked_add(&self, rhs: Price) -> Option<Price> {
        debug_assert_eq!(self.currency, rhs.currency, "currency mismatch in Price::checked_add");
        self.amount.checked_add(rhs.amount).map(|amount| Price {
            amount,
            currency: self.currency,
        })
    }

    /// Format for display (e.g., "₹499.00")
    pub fn display(&self) -> String {
        let symbol = match self.currency {
            Currency::Inr => "₹",
            Currency::Usd => "$",
            Currency::Eur => "€",
        };
        format!("{}{:.2}", symbol, self.as_decimal())
    }
}

impl std::ops::Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        debug_assert_eq!(self.currency, rhs.currency, "currency mismatch in Price::add");
        Price {
            amount: self.amount + rhs.amount,
            currency: self.currency,
        }
    }
}
