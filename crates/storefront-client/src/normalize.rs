//! Normalization from raw Storefront GraphQL shapes to
//! [`storefront_core`] domain types.

use std::collections::{BTreeMap, BTreeSet};

use storefront_core::products::{GROUPED_CHILDREN_KEY, GROUPED_FLAG_KEY, GROUPED_NAMESPACE};
use storefront_core::{
    option_key, CartLine, CartSnapshot, Image, Metafield, Money, PriceRange, Product,
    SelectedOption, Variant,
};

use crate::error::ClientError;
use crate::model::{Collection, ContentPage, MarketingModule, PageInfo};
use crate::types::{
    WireCart, WireCollection, WireImage, WireMetafield, WireMetaobject, WireMoney, WirePage,
    WirePageInfo, WirePriceRange, WireProduct, WireProductPrice, WireVariant,
};

fn normalize_money(wire: &WireMoney, owner_id: &str) -> Result<Money, ClientError> {
    Money::parse(&wire.amount, &wire.currency_code).map_err(|e| ClientError::Normalization {
        id: owner_id.to_owned(),
        reason: e.to_string(),
    })
}

/// Parses a `priceRange` selection.
///
/// # Errors
///
/// Returns [`ClientError::Normalization`] if either bound is not valid money.
pub fn normalize_price_range(
    wire: &WirePriceRange,
    owner_id: &str,
) -> Result<PriceRange, ClientError> {
    Ok(PriceRange {
        min: normalize_money(&wire.min_variant_price, owner_id)?,
        max: normalize_money(&wire.max_variant_price, owner_id)?,
    })
}

fn normalize_image(wire: WireImage) -> Image {
    Image {
        url: wire.url,
        alt_text: wire.alt_text.filter(|s| !s.is_empty()),
        width: wire.width,
        height: wire.height,
    }
}

fn normalize_metafield(wire: WireMetafield) -> Metafield {
    Metafield {
        namespace: wire.namespace,
        key: wire.key,
        value: wire.value,
        kind: wire.kind,
    }
}

/// Reads the grouped-product flag and child ids from metafields.
///
/// The child list is the platform's JSON encoding of a product reference
/// list (`["gid://shopify/Product/1", ...]`). Malformed lists are logged and
/// treated as empty; blank and repeated ids are dropped.
fn grouped_metadata(product_id: &str, metafields: &[Metafield]) -> (bool, Vec<String>) {
    let find = |key: &str| {
        metafields
            .iter()
            .find(|m| m.namespace == GROUPED_NAMESPACE && m.key == key)
    };

    let is_grouped = find(GROUPED_FLAG_KEY).is_some_and(|m| m.value.trim() == "true");

    let children = match find(GROUPED_CHILDREN_KEY) {
        Some(field) => match serde_json::from_str::<Vec<String>>(&field.value) {
            Ok(ids) => {
                let mut seen = BTreeSet::new();
                ids.into_iter()
                    .map(|id| id.trim().to_owned())
                    .filter(|id| !id.is_empty() && seen.insert(id.clone()))
                    .collect()
            }
            Err(e) => {
                tracing::warn!(
                    product_id,
                    error = %e,
                    "grouped_products metafield is not a JSON list of ids; ignoring"
                );
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    (is_grouped, children)
}

fn normalize_variant(wire: WireVariant) -> Result<Variant, ClientError> {
    let price = normalize_money(&wire.price, &wire.id)?;
    let compare_at_price = wire
        .compare_at_price
        .as_ref()
        .map(|m| normalize_money(m, &wire.id))
        .transpose()?;

    Ok(Variant {
        selected_options: wire
            .selected_options
            .into_iter()
            .map(|o| SelectedOption {
                name: o.name,
                value: o.value,
            })
            .collect(),
        price,
        compare_at_price,
        available_for_sale: wire.available_for_sale,
        image: wire.image.map(normalize_image),
        sku: wire.sku.filter(|s| !s.is_empty()),
        title: wire.title,
        id: wire.id,
    })
}

/// Keeps the first variant of each distinct option set.
///
/// Option names are compared case-insensitively, matching how filters
/// address them. Later duplicates are logged and dropped.
fn dedupe_option_sets(product_id: &str, variants: Vec<Variant>) -> Vec<Variant> {
    let mut seen: BTreeSet<Vec<(String, String)>> = BTreeSet::new();
    variants
        .into_iter()
        .filter(|variant| {
            let mut key: Vec<(String, String)> = variant
                .selected_options
                .iter()
                .map(|o| (option_key(&o.name), o.value.clone()))
                .collect();
            key.sort();
            let fresh = seen.insert(key);
            if !fresh {
                tracing::warn!(
                    product_id,
                    variant_id = %variant.id,
                    "variant repeats another variant's option values; dropping it"
                );
            }
            fresh
        })
        .collect()
}

/// Normalizes a raw [`WireProduct`] into a [`Product`].
///
/// Variants with unparsable prices are skipped with a warning; the product
/// itself fails only when its own price range is invalid.
///
/// # Errors
///
/// Returns [`ClientError::Normalization`] if the product's price range
/// cannot be parsed.
pub fn normalize_product(wire: WireProduct) -> Result<Product, ClientError> {
    let price_range = normalize_price_range(&wire.price_range, &wire.id)?;
    let metafields: Vec<Metafield> = wire
        .metafields
        .into_iter()
        .flatten()
        .map(normalize_metafield)
        .collect();
    let (is_grouped, child_product_ids) = grouped_metadata(&wire.id, &metafields);

    let variants = wire
        .variants
        .map(|c| c.nodes)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| match normalize_variant(v) {
            Ok(variant) => Some(variant),
            Err(e) => {
                tracing::warn!(product_id = %wire.id, error = %e, "skipping variant");
                None
            }
        })
        .collect();
    let variants = dedupe_option_sets(&wire.id, variants);

    Ok(Product {
        title: wire.title,
        handle: wire.handle,
        vendor: wire.vendor.filter(|s| !s.is_empty()),
        product_type: wire.product_type.filter(|s| !s.is_empty()),
        description_html: wire.description_html.filter(|s| !s.is_empty()),
        price_range,
        featured_image: wire.featured_image.map(normalize_image),
        metafields,
        is_grouped,
        child_product_ids,
        variants,
        id: wire.id,
    })
}

/// Normalizes a list of products, dropping (and logging) the ones that fail.
#[must_use]
pub fn normalize_products(wire: Vec<WireProduct>) -> Vec<Product> {
    wire.into_iter()
        .filter_map(|p| {
            let id = p.id.clone();
            match normalize_product(p) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(product_id = %id, error = %e, "skipping product");
                    None
                }
            }
        })
        .collect()
}

fn normalize_page_info(wire: WirePageInfo) -> PageInfo {
    PageInfo {
        has_next_page: wire.has_next_page,
        end_cursor: wire.end_cursor.filter(|_| wire.has_next_page),
    }
}

#[must_use]
pub fn normalize_collection(wire: WireCollection) -> Collection {
    Collection {
        id: wire.id,
        handle: wire.handle,
        title: wire.title,
        description: wire.description.filter(|s| !s.is_empty()),
        image: wire.image.map(normalize_image),
        products: normalize_products(wire.products.nodes),
        page_info: normalize_page_info(wire.products.page_info),
    }
}

#[must_use]
pub fn normalize_page(wire: WirePage) -> ContentPage {
    let (seo_title, seo_description) = wire
        .seo
        .map(|s| (s.title, s.description))
        .unwrap_or_default();
    ContentPage {
        id: wire.id,
        handle: wire.handle,
        title: wire.title,
        body_html: wire.body,
        summary: wire.body_summary.filter(|s| !s.is_empty()),
        seo_title: seo_title.filter(|s| !s.is_empty()),
        seo_description: seo_description.filter(|s| !s.is_empty()),
    }
}

#[must_use]
pub fn normalize_metaobject(wire: WireMetaobject) -> MarketingModule {
    let fields: BTreeMap<String, String> = wire
        .fields
        .into_iter()
        .filter_map(|f| f.value.map(|v| (f.key, v)))
        .collect();
    MarketingModule {
        id: wire.id,
        handle: wire.handle,
        kind: wire.kind,
        fields,
    }
}

/// Pairs each product id in a `nodes(ids:)` response with its price range.
///
/// Null entries, non-product nodes and unparsable ranges are skipped.
#[must_use]
pub fn normalize_price_nodes(nodes: Vec<Option<WireProductPrice>>) -> Vec<(String, PriceRange)> {
    nodes
        .into_iter()
        .flatten()
        .filter_map(|node| {
            let id = node.id?;
            let wire = node.price_range?;
            match normalize_price_range(&wire, &id) {
                Ok(range) => Some((id, range)),
                Err(e) => {
                    tracing::warn!(product_id = %id, error = %e, "skipping child price");
                    None
                }
            }
        })
        .collect()
}

/// Normalizes a cart into a [`CartSnapshot`].
///
/// Lines whose merchandise is not a product variant are skipped.
///
/// # Errors
///
/// Returns [`ClientError::Normalization`] if a cost amount is invalid.
pub fn normalize_cart(wire: WireCart) -> Result<CartSnapshot, ClientError> {
    let subtotal = wire
        .cost
        .and_then(|c| c.subtotal_amount)
        .map(|m| normalize_money(&m, &wire.id))
        .transpose()?;

    let mut lines = Vec::with_capacity(wire.lines.nodes.len());
    for line in wire.lines.nodes {
        let Some(variant_id) = line.merchandise.id else {
            tracing::warn!(line_id = %line.id, "cart line without variant merchandise; skipping");
            continue;
        };
        let total = line
            .cost
            .and_then(|c| c.total_amount)
            .map(|m| normalize_money(&m, &line.id))
            .transpose()?;
        lines.push(CartLine {
            id: line.id,
            variant_id,
            quantity: line.quantity,
            total,
        });
    }

    Ok(CartSnapshot {
        id: wire.id,
        checkout_url: wire.checkout_url,
        total_quantity: wire.total_quantity,
        subtotal,
        lines,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
