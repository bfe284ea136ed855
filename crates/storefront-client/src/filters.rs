//! Collection filter and sort query construction.
//!
//! Collection pages carry their state in URL parameters:
//!
//! | Parameter | Storefront `ProductFilter` |
//! |-----------|----------------------------|
//! | `filter.<option>=<value>` | `{"variantOption": {"name", "value"}}` |
//! | `available=true` | `{"available": true}` |
//! | `price.min`, `price.max` | `{"price": {"min", "max"}}` |
//! | `vendor` | `{"productVendor": ...}` |
//! | `type` | `{"productType": ...}` |
//! | `tag` | `{"tag": ...}` |
//!
//! plus `sort` and the pagination cursor `after`. Unknown parameters are
//! ignored.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

/// Prefix of option filter parameters, e.g. `filter.Color=Red`.
pub const OPTION_FILTER_PREFIX: &str = "filter.";

/// One Storefront `ProductFilter` input object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductFilter {
    VariantOption { name: String, value: String },
    Available(bool),
    Price {
        #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
        min: Option<Decimal>,
        #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
        max: Option<Decimal>,
    },
    ProductVendor(String),
    ProductType(String),
    Tag(String),
}

/// Collection sort options as they appear in the `sort` URL parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Featured,
    PriceLowHigh,
    PriceHighLow,
    BestSelling,
    Newest,
    TitleAZ,
    TitleZA,
}

impl SortOrder {
    /// `(ProductCollectionSortKeys, reverse)` for the `products` connection.
    #[must_use]
    pub fn sort_key(self) -> (&'static str, bool) {
        match self {
            SortOrder::Featured => ("MANUAL", false),
            SortOrder::PriceLowHigh => ("PRICE", false),
            SortOrder::PriceHighLow => ("PRICE", true),
            SortOrder::BestSelling => ("BEST_SELLING", false),
            SortOrder::Newest => ("CREATED", true),
            SortOrder::TitleAZ => ("TITLE", false),
            SortOrder::TitleZA => ("TITLE", true),
        }
    }

    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Featured => "featured",
            SortOrder::PriceLowHigh => "price-low-high",
            SortOrder::PriceHighLow => "price-high-low",
            SortOrder::BestSelling => "best-selling",
            SortOrder::Newest => "newest",
            SortOrder::TitleAZ => "title-a-z",
            SortOrder::TitleZA => "title-z-a",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(SortOrder::Featured),
            "price-low-high" => Ok(SortOrder::PriceLowHigh),
            "price-high-low" => Ok(SortOrder::PriceHighLow),
            "best-selling" => Ok(SortOrder::BestSelling),
            "newest" => Ok(SortOrder::Newest),
            "title-a-z" => Ok(SortOrder::TitleAZ),
            "title-z-a" => Ok(SortOrder::TitleZA),
            other => Err(format!("unknown sort order \"{other}\"")),
        }
    }
}

/// Everything a collection request needs besides the handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    pub filters: Vec<ProductFilter>,
    pub sort: SortOrder,
    pub after: Option<String>,
}

fn parse_price_bound(key: &str, raw: &str) -> Option<Decimal> {
    match raw.trim().parse::<Decimal>() {
        Ok(value) if !value.is_sign_negative() => Some(value),
        Ok(_) | Err(_) => {
            tracing::debug!(key, value = raw, "dropping malformed price bound");
            None
        }
    }
}

impl CollectionQuery {
    /// Builds a query from decoded URL parameters, in order.
    ///
    /// Repeated `filter.<option>` parameters add one filter each. Empty
    /// values, unknown parameters and unknown sort values are ignored; a
    /// price filter is emitted only when at least one bound parses.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        let mut price_min = None;
        let mut price_max = None;

        for (key, value) in params {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            if value.is_empty() {
                continue;
            }
            if let Some(option) = key.strip_prefix(OPTION_FILTER_PREFIX) {
                if !option.trim().is_empty() {
                    query.filters.push(ProductFilter::VariantOption {
                        name: option.trim().to_owned(),
                        value: value.to_owned(),
                    });
                }
                continue;
            }
            match key {
                "available" => {
                    if let Ok(flag) = value.parse::<bool>() {
                        query.filters.push(ProductFilter::Available(flag));
                    }
                }
                "price.min" => price_min = parse_price_bound(key, value),
                "price.max" => price_max = parse_price_bound(key, value),
                "vendor" => query
                    .filters
                    .push(ProductFilter::ProductVendor(value.to_owned())),
                "type" => query
                    .filters
                    .push(ProductFilter::ProductType(value.to_owned())),
                "tag" => query.filters.push(ProductFilter::Tag(value.to_owned())),
                "sort" => match value.parse() {
                    Ok(sort) => query.sort = sort,
                    Err(reason) => tracing::debug!(%reason, "ignoring sort parameter"),
                },
                "after" => query.after = Some(value.to_owned()),
                _ => {}
            }
        }

        if price_min.is_some() || price_max.is_some() {
            query.filters.push(ProductFilter::Price {
                min: price_min,
                max: price_max,
            });
        }
        query
    }

    /// Canonical URL parameters for this query, used to build pagination
    /// links.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for filter in &self.filters {
            match filter {
                ProductFilter::VariantOption { name, value } => {
                    params.push((format!("{OPTION_FILTER_PREFIX}{name}"), value.clone()));
                }
                ProductFilter::Available(flag) => {
                    params.push(("available".to_owned(), flag.to_string()));
                }
                ProductFilter::Price { min, max } => {
                    if let Some(min) = min {
                        params.push(("price.min".to_owned(), min.to_string()));
                    }
                    if let Some(max) = max {
                        params.push(("price.max".to_owned(), max.to_string()));
                    }
                }
                ProductFilter::ProductVendor(v) => params.push(("vendor".to_owned(), v.clone())),
                ProductFilter::ProductType(v) => params.push(("type".to_owned(), v.clone())),
                ProductFilter::Tag(v) => params.push(("tag".to_owned(), v.clone())),
            }
        }
        if self.sort != SortOrder::Featured {
            params.push(("sort".to_owned(), self.sort.as_param().to_owned()));
        }
        params
    }
}
