use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Metafield namespace used for grouped-product annotations.
pub const GROUPED_NAMESPACE: &str = "custom";
/// Metafield key whose value `"true"` marks an aggregate product.
pub const GROUPED_FLAG_KEY: &str = "grouped_product";
/// Metafield key holding the JSON list of child product ids.
pub const GROUPED_CHILDREN_KEY: &str = "grouped_products";

/// Normalized form of an option name: trimmed and lowercased, so `Color`,
/// ` color` and `COLOR` name the same option.
#[must_use]
pub fn option_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lowest and highest variant price of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

/// A key/value annotation attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    pub value: String,
    /// Platform type name, e.g. `"list.product_reference"`.
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// One option value of a variant, e.g. `Color = Red`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// A purchasable variant of a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Platform global id, e.g. `"gid://shopify/ProductVariant/42"`.
    pub id: String,
    pub title: String,
    pub sku: Option<String>,
    pub selected_options: Vec<SelectedOption>,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub available_for_sale: bool,
    pub image: Option<Image>,
}

impl Variant {
    /// Returns this variant's value for `option_name`, matching the name
    /// case-insensitively.
    #[must_use]
    pub fn option_value(&self, option_name: &str) -> Option<&str> {
        let wanted = option_key(option_name);
        self.selected_options
            .iter()
            .find(|o| option_key(&o.name) == wanted)
            .map(|o| o.value.as_str())
    }

    /// `true` when a compare-at price above the current price is set.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .as_ref()
            .is_some_and(|c| c.cmp_amount(&self.price).is_gt())
    }
}

/// A product as loaded for a collection or product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub description_html: Option<String>,
    pub price_range: PriceRange,
    pub featured_image: Option<Image>,
    pub metafields: Vec<Metafield>,
    /// Set when the `custom.grouped_product` metafield is `"true"`.
    pub is_grouped: bool,
    /// Child product ids from `custom.grouped_products`.
    pub child_product_ids: Vec<String>,
    /// May be empty on collection cards, which do not load variants.
    pub variants: Vec<Variant>,
}

impl Product {
    /// Returns the child product ids when this is a grouped aggregate product.
    ///
    /// A product counts as grouped when it carries the grouped flag or lists
    /// at least one child. A flagged product with no children yields an empty
    /// slice, which resolves to the product's own price.
    #[must_use]
    pub fn grouped_children(&self) -> Option<&[String]> {
        if self.is_grouped || !self.child_product_ids.is_empty() {
            Some(&self.child_product_ids)
        } else {
            None
        }
    }

    /// `true` when at least one loaded variant can be bought.
    #[must_use]
    pub fn has_available_variants(&self) -> bool {
        self.variants.iter().any(|v| v.available_for_sale)
    }
}

/// Compact product card persisted in the wishlist and recently-viewed lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            handle: product.handle.clone(),
            title: product.title.clone(),
            price: Some(product.price_range.min.clone()),
            image_url: product.featured_image.as_ref().map(|i| i.url.clone()),
        }
    }
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
