use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Serialize;
use storefront_client::{
    Collection, CollectionQuery, GroupPriceResolver, PageInfo, PricedProduct, ProductFilter,
};
use storefront_core::Image;

use crate::middleware::RequestId;

use super::{map_client_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CollectionPage {
    id: String,
    handle: String,
    title: String,
    description: Option<String>,
    image: Option<Image>,
    products: Vec<PricedProduct>,
    page_info: PageInfo,
    sort: &'static str,
    filters: Vec<ProductFilter>,
    /// Query parameters for the next page, when there is one.
    next_page: Option<Vec<(String, String)>>,
}

fn next_page_params(query: &CollectionQuery, page_info: &PageInfo) -> Option<Vec<(String, String)>> {
    if !page_info.has_next_page {
        return None;
    }
    let cursor = page_info.end_cursor.as_ref()?;
    let mut params = query.to_params();
    params.push(("after".to_owned(), cursor.clone()));
    Some(params)
}

/// Builds priced collection page data. The collection fetch is critical;
/// grouped-product price lookups degrade per product.
pub(super) async fn load_collection_page(
    state: &AppState,
    handle: &str,
    query: CollectionQuery,
) -> Result<CollectionPage, storefront_client::ClientError> {
    let Collection {
        id,
        handle,
        title,
        description,
        image,
        products,
        page_info,
    } = state
        .client
        .collection(handle, &query, state.config.page_size)
        .await?;

    let products = GroupPriceResolver::new(state.client.as_ref())
        .resolve_all(products)
        .await;
    let next_page = next_page_params(&query, &page_info);

    Ok(CollectionPage {
        id,
        handle,
        title,
        description,
        image,
        products,
        page_info,
        sort: query.sort.as_param(),
        filters: query.filters,
        next_page,
    })
}

pub(super) async fn get_collection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<CollectionPage>>, ApiError> {
    let query = CollectionQuery::from_params(params);
    let page = load_collection_page(&state, &handle, query)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    tracing::debug!(
        handle = %page.handle,
        products = page.products.len(),
        has_next_page = page.page_info.has_next_page,
        "collection loaded"
    );
    Ok(Json(ApiResponse::new(page, req_id.0)))
}
