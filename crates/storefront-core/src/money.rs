//! Monetary amounts as returned by the Storefront API.
//!
//! The API encodes amounts as decimal strings (`"12.50"`). They are parsed into
//! [`Decimal`] so that comparisons are numeric: `"9.00"` sorts below `"10.00"`,
//! which string comparison gets wrong.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A non-negative decimal amount paired with an ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyWire", into = "MoneyWire")]
pub struct Money {
    amount: Decimal,
    currency_code: String,
}

/// Serialized shape, identical to the API's `MoneyV2` object.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyWire {
    amount: String,
    currency_code: String,
}

impl Money {
    /// Builds a `Money` from an already-parsed amount.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAmount`] for negative amounts and
    /// [`CoreError::InvalidCurrency`] when the code is not three ASCII letters.
    pub fn new(amount: Decimal, currency_code: &str) -> Result<Self, CoreError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CoreError::InvalidAmount {
                amount: amount.to_string(),
                reason: "amount must not be negative".to_string(),
            });
        }
        let code = currency_code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidCurrency(currency_code.to_string()));
        }
        Ok(Self {
            amount,
            currency_code: code.to_ascii_uppercase(),
        })
    }

    /// Parses a string-encoded amount such as `"12.99"`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAmount`] if the string is not a decimal
    /// number or is negative, and [`CoreError::InvalidCurrency`] for a
    /// malformed currency code.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, CoreError> {
        let parsed = Decimal::from_str(amount.trim()).map_err(|e| CoreError::InvalidAmount {
            amount: amount.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(parsed, currency_code)
    }

    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    #[must_use]
    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    /// Numeric comparison of amounts, ignoring currency.
    #[must_use]
    pub fn cmp_amount(&self, other: &Self) -> Ordering {
        self.amount.cmp(&other.amount)
    }

    /// Returns a copy of this amount labelled with another currency code.
    #[must_use]
    pub fn with_currency_of(&self, other: &Self) -> Self {
        Self {
            amount: self.amount,
            currency_code: other.currency_code.clone(),
        }
    }

    fn symbol(&self) -> Option<&'static str> {
        match self.currency_code.as_str() {
            "USD" => Some("$"),
            "CAD" => Some("CA$"),
            "AUD" => Some("A$"),
            "EUR" => Some("\u{20ac}"),
            "GBP" => Some("\u{00a3}"),
            "JPY" => Some("\u{00a5}"),
            _ => None,
        }
    }

    fn decimal_places(&self) -> usize {
        match self.currency_code.as_str() {
            "JPY" | "KRW" => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let places = self.decimal_places();
        match self.symbol() {
            Some(symbol) => write!(f, "{symbol}{:.*}", places, self.amount),
            None => write!(f, "{} {:.*}", self.currency_code, places, self.amount),
        }
    }
}

impl TryFrom<MoneyWire> for Money {
    type Error = CoreError;

    fn try_from(wire: MoneyWire) -> Result<Self, Self::Error> {
        Money::parse(&wire.amount, &wire.currency_code)
    }
}

impl From<Money> for MoneyWire {
    fn from(money: Money) -> Self {
        Self {
            amount: money.amount.to_string(),
            currency_code: money.currency_code,
        }
    }
}
