use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Serialize;
use storefront_client::{GroupPriceResolver, PricedProduct};
use storefront_core::{
    option_values, FilterSelection, OptionValues, ProductSummary, Variant, VariantSelector,
};

use crate::middleware::RequestId;

use super::{map_client_error, ApiError, ApiResponse, AppState};

/// Prefix of query parameters that filter the variant list, e.g.
/// `option.Color=Red`.
const OPTION_PARAM_PREFIX: &str = "option.";

#[derive(Debug, Serialize)]
pub(super) struct ProductPage {
    product: PricedProduct,
    /// `false` when every variant is sold out.
    available: bool,
    /// Compact card for the shopper's recently viewed list.
    summary: ProductSummary,
    options: Vec<OptionValues>,
    filter: FilterSelection,
    visible_variant_ids: Vec<String>,
    selected_variant: Option<Variant>,
    recommendations: Vec<ProductSummary>,
}

/// Splits product page parameters into the variant filter and the requested
/// variant id.
fn selection_from_params(params: &[(String, String)]) -> (FilterSelection, Option<&str>) {
    let filter = FilterSelection::from_pairs(params.iter().filter_map(|(key, value)| {
        let option = key.strip_prefix(OPTION_PARAM_PREFIX)?;
        (!option.trim().is_empty() && !value.is_empty()).then(|| (option, value.clone()))
    }));
    let variant = params
        .iter()
        .find(|(key, _)| key == "variant")
        .map(|(_, value)| value.as_str());
    (filter, variant)
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<ProductPage>>, ApiError> {
    let product = state
        .client
        .product(&handle)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    let resolver = GroupPriceResolver::new(state.client.as_ref());
    let (price, recommendations) = tokio::join!(
        resolver.resolve(&product),
        state.client.recommendations(&product.id),
    );
    let recommendations = match recommendations {
        Ok(products) => products.iter().map(ProductSummary::from).collect(),
        Err(e) => {
            tracing::warn!(handle = %product.handle, error = %e, "recommendations unavailable");
            Vec::new()
        }
    };

    let (filter, requested) = selection_from_params(&params);
    let options = option_values(&product.variants);
    let selector = VariantSelector::with_filter(product.variants.clone(), filter, requested);
    let visible_variant_ids = selector.visible().iter().map(|v| v.id.clone()).collect();
    let selected_variant = selector.selected().cloned();

    let page = ProductPage {
        summary: ProductSummary::from(&product),
        available: product.has_available_variants(),
        product: PricedProduct { product, price },
        options,
        filter: selector.filter().clone(),
        visible_variant_ids,
        selected_variant,
        recommendations,
    };
    Ok(Json(ApiResponse::new(page, req_id.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn selection_reads_option_params_and_variant() {
        let params = params(&[
            ("option.Color", "Red"),
            ("option.color", "Blue"),
            ("option.Size", ""),
            ("variant", "v2"),
            ("utm_source", "mail"),
        ]);
        let (filter, variant) = selection_from_params(&params);
        assert!(filter.is_selected("color", "Red"));
        assert!(filter.is_selected("COLOR", "Blue"));
        assert!(filter.values("size").is_none());
        assert_eq!(variant, Some("v2"));
    }

    #[test]
    fn selection_without_params_is_unconstrained() {
        let (filter, variant) = selection_from_params(&[]);
        assert!(filter.is_unconstrained());
        assert!(variant.is_none());
    }
}
