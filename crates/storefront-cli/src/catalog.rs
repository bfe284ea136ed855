//! Catalog inspection commands.

use storefront_client::{CollectionQuery, GroupPriceResolver, PricedProduct, StorefrontClient};
use storefront_core::{option_values, FilterSelection, ProductSummary, Variant, VariantSelector};
use storefront_store::{KeyValueStore, RecentlyViewed};

use crate::parse_pair;

/// Turns `--filter`, `--sort` and `--after` arguments into the URL parameter
/// list a collection page would receive.
pub(crate) fn collection_params(
    filters: &[String],
    sort: Option<String>,
    after: Option<String>,
) -> anyhow::Result<Vec<(String, String)>> {
    let mut params = filters
        .iter()
        .map(|raw| parse_pair(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if let Some(sort) = sort {
        params.push(("sort".to_string(), sort));
    }
    if let Some(after) = after {
        params.push(("after".to_string(), after));
    }
    Ok(params)
}

pub(crate) fn variant_line(variant: &Variant, selected: bool) -> String {
    let marker = if selected { '*' } else { ' ' };
    let stock = if variant.available_for_sale {
        ""
    } else {
        " (sold out)"
    };
    let compare = match &variant.compare_at_price {
        Some(was) if variant.is_on_sale() => format!(" was {was}"),
        _ => String::new(),
    };
    format!(
        "{marker} {:<28} {}{compare}{stock}  [{}]",
        variant.title, variant.price, variant.id
    )
}

fn product_card_line(priced: &PricedProduct) -> String {
    let grouped = if priced.product.is_grouped {
        " (set)"
    } else {
        ""
    };
    format!("{:<32} {}{grouped}", priced.product.handle, priced.price)
}

pub(crate) async fn run_collection(
    client: &StorefrontClient,
    handle: &str,
    params: Vec<(String, String)>,
    page_size: u32,
    json: bool,
) -> anyhow::Result<()> {
    let query = CollectionQuery::from_params(params);
    let collection = client.collection(handle, &query, page_size).await?;
    let products = GroupPriceResolver::new(client)
        .resolve_all(collection.products)
        .await;

    if json {
        let out = serde_json::json!({
            "handle": collection.handle,
            "title": collection.title,
            "products": products,
            "page_info": collection.page_info,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} ({} products)", collection.title, products.len());
    for priced in &products {
        println!("  {}", product_card_line(priced));
    }
    if let (true, Some(cursor)) = (
        collection.page_info.has_next_page,
        collection.page_info.end_cursor.as_deref(),
    ) {
        println!("more: --after {cursor}");
    }
    Ok(())
}

pub(crate) async fn run_product(
    client: &StorefrontClient,
    store: &dyn KeyValueStore,
    handle: &str,
    options: &[String],
    variant: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let pairs = options
        .iter()
        .map(|raw| parse_pair(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let filter = FilterSelection::from_pairs(pairs);

    let product = client.product(handle).await?;
    let price = GroupPriceResolver::new(client).resolve(&product).await;

    if let Err(e) = RecentlyViewed::new(store).record(ProductSummary::from(&product)) {
        tracing::warn!(handle, error = %e, "could not update recently viewed");
    }

    let selector = VariantSelector::with_filter(product.variants.clone(), filter, variant);
    let visible = selector.visible();
    let selected_id = selector.selected().map(|v| v.id.as_str());

    if json {
        let out = serde_json::json!({
            "product": PricedProduct { product: product.clone(), price: price.clone() },
            "available": product.has_available_variants(),
            "options": option_values(&product.variants),
            "visible_variant_ids": visible.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(),
            "selected_variant_id": selected_id,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}  {}", product.title, price);
    if !product.has_available_variants() {
        println!("sold out");
    }
    if let Some(vendor) = &product.vendor {
        println!("by {vendor}");
    }
    for option in option_values(&product.variants) {
        println!("{}: {}", option.name, option.values.join(", "));
    }
    println!("{} of {} variants shown", visible.len(), product.variants.len());
    for v in &visible {
        println!("{}", variant_line(v, Some(v.id.as_str()) == selected_id));
    }
    Ok(())
}
