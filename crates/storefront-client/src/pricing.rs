//! Async group-price resolution.
//!
//! [`storefront_core::resolve_price_display`] is pure; this module supplies
//! it with child price ranges from a [`PriceSource`] and turns lookup
//! failures into the product's own range.

use std::future::Future;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use storefront_core::{resolve_price_display, PriceDisplay, PriceRange, Product};

use crate::client::StorefrontClient;
use crate::error::ClientError;

/// Somewhere child product price ranges can be looked up.
pub trait PriceSource {
    /// Price ranges of whichever `product_ids` are known. Unknown ids are
    /// left out rather than failing the lookup.
    fn price_ranges(
        &self,
        product_ids: &[String],
    ) -> impl Future<Output = Result<Vec<PriceRange>, ClientError>> + Send;
}

impl PriceSource for StorefrontClient {
    async fn price_ranges(&self, product_ids: &[String]) -> Result<Vec<PriceRange>, ClientError> {
        Ok(self
            .product_price_ranges(product_ids)
            .await?
            .into_iter()
            .map(|(_, range)| range)
            .collect())
    }
}

/// A product together with the price its card should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub price: PriceDisplay,
}

/// Resolves displayed prices, fetching child ranges for grouped products.
pub struct GroupPriceResolver<'a, S> {
    source: &'a S,
}

impl<'a, S: PriceSource + Sync> GroupPriceResolver<'a, S> {
    #[must_use]
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Never fails: a failed or empty child lookup falls back to the
    /// product's own price range and is logged.
    pub async fn resolve(&self, product: &Product) -> PriceDisplay {
        let children = match product.grouped_children() {
            Some(children) if !children.is_empty() => children,
            _ => return resolve_price_display(product, &[]),
        };

        match self.source.price_ranges(children).await {
            Ok(ranges) => {
                if ranges.is_empty() {
                    tracing::warn!(
                        handle = %product.handle,
                        children = children.len(),
                        "no child prices found for grouped product; using its own range"
                    );
                }
                resolve_price_display(product, &ranges)
            }
            Err(e) => {
                tracing::warn!(
                    handle = %product.handle,
                    error = %e,
                    "child price lookup failed for grouped product; using its own range"
                );
                resolve_price_display(product, &[])
            }
        }
    }

    /// Resolves every product concurrently, preserving order.
    pub async fn resolve_all(&self, products: Vec<Product>) -> Vec<PricedProduct> {
        let prices = join_all(products.iter().map(|p| self.resolve(p))).await;
        products
            .into_iter()
            .zip(prices)
            .map(|(product, price)| PricedProduct { product, price })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use storefront_core::Money;

    fn usd(amount: &str) -> Money {
        Money::parse(amount, "USD").unwrap()
    }

    fn range(min: &str, max: &str) -> PriceRange {
        PriceRange {
            min: usd(min),
            max: usd(max),
        }
    }

    fn product(handle: &str, own: PriceRange, children: &[&str]) -> Product {
        Product {
            id: format!("gid://shopify/Product/{handle}"),
            title: handle.to_owned(),
            handle: handle.to_owned(),
            vendor: None,
            product_type: None,
            description_html: None,
            price_range: own,
            featured_image: None,
            metafields: Vec::new(),
            is_grouped: !children.is_empty(),
            child_product_ids: children.iter().map(|c| (*c).to_owned()).collect(),
            variants: Vec::new(),
        }
    }

    /// Child price ranges known up front, keyed by product id.
    struct PrecomputedPrices {
        ranges: HashMap<String, PriceRange>,
    }

    impl FromIterator<(String, PriceRange)> for PrecomputedPrices {
        fn from_iter<I: IntoIterator<Item = (String, PriceRange)>>(iter: I) -> Self {
            Self {
                ranges: iter.into_iter().collect(),
            }
        }
    }

    impl PriceSource for PrecomputedPrices {
        async fn price_ranges(&self, product_ids: &[String]) -> Result<Vec<PriceRange>, ClientError> {
            Ok(product_ids
                .iter()
                .filter_map(|id| self.ranges.get(id).cloned())
                .collect())
        }
    }

    struct FailingSource;

    impl PriceSource for FailingSource {
        async fn price_ranges(&self, _: &[String]) -> Result<Vec<PriceRange>, ClientError> {
            Err(ClientError::UnexpectedStatus {
                status: 503,
                url: "https://shop.example".to_owned(),
            })
        }
    }

    fn children_prices() -> PrecomputedPrices {
        [
            ("a".to_owned(), range("5.00", "5.00")),
            ("b".to_owned(), range("12.00", "12.00")),
            ("c".to_owned(), range("12.00", "12.00")),
            ("d".to_owned(), range("7.00", "7.00")),
            ("e".to_owned(), range("7.00", "7.00")),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn plain_product_shows_its_min_price() {
        let prices = children_prices();
        let resolver = GroupPriceResolver::new(&prices);
        let display = resolver
            .resolve(&product("balm", range("3.00", "9.00"), &[]))
            .await;
        assert_eq!(display.to_string(), "$3.00");
    }

    #[tokio::test]
    async fn grouped_product_spans_child_prices() {
        let prices = children_prices();
        let resolver = GroupPriceResolver::new(&prices);
        let display = resolver
            .resolve(&product("kit", range("1.00", "1.00"), &["a", "b", "c"]))
            .await;
        assert_eq!(display.to_string(), "$5.00 - $12.00");

        let same = resolver
            .resolve(&product("duo", range("1.00", "1.00"), &["d", "e"]))
            .await;
        assert_eq!(same.to_string(), "$7.00");
    }

    #[tokio::test]
    async fn failed_lookup_falls_back_to_own_range() {
        let resolver = GroupPriceResolver::new(&FailingSource);
        let display = resolver
            .resolve(&product("kit", range("4.00", "8.00"), &["a"]))
            .await;
        assert_eq!(display.to_string(), "$4.00 - $8.00");
    }

    #[tokio::test]
    async fn unknown_children_fall_back_to_own_range() {
        let prices = children_prices();
        let resolver = GroupPriceResolver::new(&prices);
        let display = resolver
            .resolve(&product("kit", range("6.00", "6.00"), &["zzz"]))
            .await;
        assert_eq!(display.to_string(), "$6.00");
    }

    #[tokio::test]
    async fn resolve_all_keeps_order() {
        let prices = children_prices();
        let resolver = GroupPriceResolver::new(&prices);
        let priced = resolver
            .resolve_all(vec![
                product("kit", range("1.00", "1.00"), &["a", "b"]),
                product("balm", range("3.00", "3.00"), &[]),
            ])
            .await;
        assert_eq!(priced[0].product.handle, "kit");
        assert_eq!(priced[0].price.to_string(), "$5.00 - $12.00");
        assert_eq!(priced[1].price.to_string(), "$3.00");
    }
}
