//! Displayable prices for product cards and product pages.
//!
//! Grouped products carry no meaningful price of their own: the platform
//! reports whatever was entered on the aggregate, so the displayed range is
//! computed from the children's price ranges instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::products::{PriceRange, Product};

/// What a product card shows: one price or a `min - max` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceDisplay {
    Single { price: Money },
    Range { min: Money, max: Money },
}

impl PriceDisplay {
    /// Collapses equal bounds into [`PriceDisplay::Single`].
    #[must_use]
    pub fn from_bounds(min: Money, max: Money) -> Self {
        if min.cmp_amount(&max).is_eq() {
            Self::Single { price: min }
        } else {
            Self::Range { min, max }
        }
    }

    #[must_use]
    pub fn from_range(range: &PriceRange) -> Self {
        Self::from_bounds(range.min.clone(), range.max.clone())
    }

    /// Lowest displayed amount.
    #[must_use]
    pub fn min(&self) -> &Money {
        match self {
            Self::Single { price } => price,
            Self::Range { min, .. } => min,
        }
    }

    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }
}

impl fmt::Display for PriceDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single { price } => write!(f, "{price}"),
            Self::Range { min, max } => write!(f, "{min} - {max}"),
        }
    }
}

/// Combines child price ranges into one range.
///
/// The minimum is the lowest child minimum and the maximum the highest child
/// maximum. Both bounds carry the currency of the child with the lowest
/// minimum; children are assumed to share a currency and a mismatch is only
/// logged. Returns `None` for an empty slice.
#[must_use]
pub fn aggregate_ranges(ranges: &[PriceRange]) -> Option<PriceRange> {
    let lowest = ranges
        .iter()
        .min_by(|a, b| a.min.cmp_amount(&b.min))?;
    let highest = ranges
        .iter()
        .max_by(|a, b| a.max.cmp_amount(&b.max))?;

    let currency = lowest.min.currency_code();
    if ranges.iter().any(|r| {
        r.min.currency_code() != currency || r.max.currency_code() != currency
    }) {
        tracing::warn!(
            currency,
            children = ranges.len(),
            "grouped product children use mixed currencies; using the currency of the cheapest child"
        );
    }

    Some(PriceRange {
        min: lowest.min.clone(),
        max: highest.max.with_currency_of(&lowest.min),
    })
}

/// Resolves the price shown for `product`.
///
/// - Plain products show their own minimum price.
/// - Grouped products show the aggregate of `child_ranges`.
/// - A grouped product whose children could not be priced (empty
///   `child_ranges`) falls back to its own price range.
#[must_use]
pub fn resolve_price_display(product: &Product, child_ranges: &[PriceRange]) -> PriceDisplay {
    if product.grouped_children().is_none() {
        return PriceDisplay::Single {
            price: product.price_range.min.clone(),
        };
    }

    match aggregate_ranges(child_ranges) {
        Some(range) => PriceDisplay::from_range(&range),
        None => {
            tracing::debug!(
                handle = %product.handle,
                "no child prices for grouped product; using its own price range"
            );
            PriceDisplay::from_range(&product.price_range)
        }
    }
}
