//! Normalized page-level data returned by [`crate::StorefrontClient`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use storefront_core::{Image, Product};

/// Cursor state of a paginated product list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One page of a collection's products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<Image>,
    pub products: Vec<Product>,
    pub page_info: PageInfo,
}

/// A content page (about, shipping policy, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPage {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub body_html: String,
    pub summary: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

/// A homepage marketing module backed by a metaobject.
///
/// `fields` holds the metaobject's non-null field values by key; rendering
/// decides which keys a given `kind` uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingModule {
    pub id: String,
    pub handle: String,
    pub kind: String,
    pub fields: BTreeMap<String, String>,
}

impl MarketingModule {
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}
