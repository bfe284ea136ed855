//! Raw Storefront GraphQL response shapes.
//!
//! Only the fields the queries in [`crate::queries`] select are modelled.
//! Nullable GraphQL fields are `Option`s; lists the API may return as `null`
//! default to empty.

use serde::{Deserialize, Serialize};

/// `{data, errors}` envelope returned by every GraphQL request.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// `{query, variables}` request body.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMoney {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePriceRange {
    pub min_variant_price: WireMoney,
    pub max_variant_price: WireMoney,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireImage {
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMetafield {
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireVariant {
    pub id: String,
    pub title: String,
    pub sku: Option<String>,
    #[serde(default)]
    pub available_for_sale: bool,
    #[serde(default)]
    pub selected_options: Vec<WireSelectedOption>,
    pub price: WireMoney,
    pub compare_at_price: Option<WireMoney>,
    pub image: Option<WireImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// A connection selected as `{ nodes { ... } pageInfo { ... } }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub nodes: Vec<T>,
    #[serde(default)]
    pub page_info: WirePageInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub description_html: Option<String>,
    pub price_range: WirePriceRange,
    pub featured_image: Option<WireImage>,
    /// `metafields(identifiers:)` returns `null` for each unset identifier.
    #[serde(default)]
    pub metafields: Vec<Option<WireMetafield>>,
    pub variants: Option<Connection<WireVariant>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCollection {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<WireImage>,
    pub products: Connection<WireProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionData {
    pub collection: Option<WireCollection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductData {
    pub product: Option<WireProduct>,
}

/// Entry of `nodes(ids:)` selected with `... on Product { id priceRange }`.
///
/// Ids that resolve to non-product nodes come back as `{}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProductPrice {
    pub id: Option<String>,
    pub price_range: Option<WirePriceRange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodesData {
    #[serde(default)]
    pub nodes: Vec<Option<WireProductPrice>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsData {
    pub product_recommendations: Option<Vec<WireProduct>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSeo {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePage {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub body: String,
    pub body_summary: Option<String>,
    pub seo: Option<WireSeo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageData {
    pub page: Option<WirePage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMetaobjectField {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMetaobject {
    pub id: String,
    pub handle: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub fields: Vec<WireMetaobjectField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetaobjectsData {
    pub metaobjects: Connection<WireMetaobject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMerchandise {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLineCost {
    pub total_amount: Option<WireMoney>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireCartLine {
    pub id: String,
    pub quantity: u32,
    pub merchandise: WireMerchandise,
    pub cost: Option<WireLineCost>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartCost {
    pub subtotal_amount: Option<WireMoney>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCart {
    pub id: String,
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub total_quantity: u32,
    pub cost: Option<WireCartCost>,
    pub lines: Connection<WireCartLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartData {
    pub cart: Option<WireCart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireUserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Payload shared by `cartCreate`, `cartLinesAdd` and `cartLinesUpdate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<WireCart>,
    #[serde(default)]
    pub user_errors: Vec<WireUserError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreateData {
    pub cart_create: Option<CartMutationPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesAddData {
    pub cart_lines_add: Option<CartMutationPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesUpdateData {
    pub cart_lines_update: Option<CartMutationPayload>,
}
