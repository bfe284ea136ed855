//! Catalog and content queries.

use serde_json::json;
use storefront_core::{PriceRange, Product};

use super::StorefrontClient;
use crate::error::ClientError;
use crate::filters::CollectionQuery;
use crate::model::{Collection, ContentPage, MarketingModule};
use crate::normalize::{
    normalize_collection, normalize_metaobject, normalize_page, normalize_price_nodes,
    normalize_product, normalize_products,
};
use crate::queries::{
    COLLECTION_QUERY, METAOBJECTS_QUERY, PAGE_QUERY, PRODUCT_PRICES_QUERY, PRODUCT_QUERY,
    RECOMMENDATIONS_QUERY,
};
use crate::types::{
    CollectionData, MetaobjectsData, NodesData, PageData, ProductData, RecommendationsData,
};

/// Upper bound on ids per `nodes(ids:)` request.
const MAX_NODE_IDS: usize = 250;

impl StorefrontClient {
    /// Loads one page of a collection's products.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no collection has `handle`,
    /// otherwise any transport error from [`StorefrontClient::execute`].
    pub async fn collection(
        &self,
        handle: &str,
        query: &CollectionQuery,
        first: u32,
    ) -> Result<Collection, ClientError> {
        let (sort_key, reverse) = query.sort.sort_key();
        let variables = json!({
            "handle": handle,
            "first": first,
            "after": query.after,
            "sortKey": sort_key,
            "reverse": reverse,
            "filters": query.filters,
        });
        let data: CollectionData = self
            .execute("collection", COLLECTION_QUERY, &variables)
            .await?;
        let wire = data.collection.ok_or_else(|| ClientError::NotFound {
            kind: "collection",
            handle: handle.to_owned(),
        })?;
        Ok(normalize_collection(wire))
    }

    /// Loads a product with its variants.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no product has `handle`, or
    /// [`ClientError::Normalization`] when its price range is invalid.
    pub async fn product(&self, handle: &str) -> Result<Product, ClientError> {
        let data: ProductData = self
            .execute("product", PRODUCT_QUERY, &json!({ "handle": handle }))
            .await?;
        let wire = data.product.ok_or_else(|| ClientError::NotFound {
            kind: "product",
            handle: handle.to_owned(),
        })?;
        normalize_product(wire)
    }

    /// Fetches the price ranges of the given product ids.
    ///
    /// Unknown ids are omitted from the result. An empty `ids` slice makes
    /// no request.
    ///
    /// # Errors
    ///
    /// Any transport error from [`StorefrontClient::execute`].
    pub async fn product_price_ranges(
        &self,
        ids: &[String],
    ) -> Result<Vec<(String, PriceRange)>, ClientError> {
        let mut out = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_NODE_IDS) {
            let data: NodesData = self
                .execute("productPrices", PRODUCT_PRICES_QUERY, &json!({ "ids": chunk }))
                .await?;
            out.extend(normalize_price_nodes(data.nodes));
        }
        Ok(out)
    }

    /// Products the platform recommends alongside `product_id`.
    ///
    /// # Errors
    ///
    /// Any transport error from [`StorefrontClient::execute`].
    pub async fn recommendations(&self, product_id: &str) -> Result<Vec<Product>, ClientError> {
        let data: RecommendationsData = self
            .execute(
                "productRecommendations",
                RECOMMENDATIONS_QUERY,
                &json!({ "productId": product_id }),
            )
            .await?;
        Ok(normalize_products(
            data.product_recommendations.unwrap_or_default(),
        ))
    }

    /// Loads a content page.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no page has `handle`.
    pub async fn page(&self, handle: &str) -> Result<ContentPage, ClientError> {
        let data: PageData = self
            .execute("page", PAGE_QUERY, &json!({ "handle": handle }))
            .await?;
        data.page
            .map(normalize_page)
            .ok_or_else(|| ClientError::NotFound {
                kind: "page",
                handle: handle.to_owned(),
            })
    }

    /// Loads the metaobjects of type `kind` that make up homepage modules.
    ///
    /// # Errors
    ///
    /// Any transport error from [`StorefrontClient::execute`].
    pub async fn marketing_modules(
        &self,
        kind: &str,
        first: u32,
    ) -> Result<Vec<MarketingModule>, ClientError> {
        let data: MetaobjectsData = self
            .execute(
                "metaobjects",
                METAOBJECTS_QUERY,
                &json!({ "type": kind, "first": first }),
            )
            .await?;
        Ok(data
            .metaobjects
            .nodes
            .into_iter()
            .map(normalize_metaobject)
            .collect())
    }
}
