//! Typed product lists over a [`KeyValueStore`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_core::ProductSummary;

use crate::backend::KeyValueStore;
use crate::error::StoreError;

pub const RECENTLY_VIEWED_KEY: &str = "recently_viewed_products";
pub const WISHLIST_KEY: &str = "wishlist";
pub const RECENTLY_VIEWED_CAP: usize = 30;

/// Version tag written into every list envelope.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    version: u32,
    items: &'a [ProductSummary],
}

#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Envelope(EnvelopeIn),
    Legacy(Vec<Value>),
}

/// Entries that fail to parse are skipped so one bad item does not drop
/// the whole list.
fn parse_items(key: &str, values: Vec<Value>) -> Vec<ProductSummary> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!(key, error = %e, "skipping malformed stored product");
                None
            }
        })
        .collect()
}

/// Decodes a stored list. Returns the items and whether the value was in
/// the legacy bare-array layout.
fn decode(key: &str, raw: &str) -> (Vec<ProductSummary>, bool) {
    match serde_json::from_str::<Stored>(raw) {
        Ok(Stored::Envelope(envelope)) if envelope.version <= SCHEMA_VERSION => {
            (parse_items(key, envelope.items), false)
        }
        Ok(Stored::Envelope(envelope)) => {
            tracing::warn!(
                key,
                version = envelope.version,
                supported = SCHEMA_VERSION,
                "stored list has a newer schema version; treating as empty"
            );
            (Vec::new(), false)
        }
        Ok(Stored::Legacy(values)) => (parse_items(key, values), true),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored list is not valid JSON; treating as empty");
            (Vec::new(), false)
        }
    }
}

fn dedupe_by_id(items: &mut Vec<ProductSummary>) {
    let mut seen = std::collections::HashSet::new();
    items.retain(|item| seen.insert(item.id.clone()));
}

struct ProductList<'a> {
    store: &'a dyn KeyValueStore,
    key: &'static str,
    cap: Option<usize>,
}

impl ProductList<'_> {
    fn load(&self) -> Result<Vec<ProductSummary>, StoreError> {
        let Some(raw) = self.store.get(self.key)? else {
            return Ok(Vec::new());
        };
        let (mut items, legacy) = decode(self.key, &raw);
        dedupe_by_id(&mut items);
        if let Some(cap) = self.cap {
            items.truncate(cap);
        }
        if legacy {
            tracing::info!(
                key = self.key,
                items = items.len(),
                version = SCHEMA_VERSION,
                "migrating legacy stored list"
            );
            self.save(&items)?;
        }
        Ok(items)
    }

    fn save(&self, items: &[ProductSummary]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&EnvelopeOut {
            version: SCHEMA_VERSION,
            items,
        })
        .map_err(|source| StoreError::Encode {
            key: self.key.to_owned(),
            source,
        })?;
        self.store.set(self.key, &raw)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(self.key)
    }
}

/// Products the shopper opened, newest first, at most
/// [`RECENTLY_VIEWED_CAP`] entries.
pub struct RecentlyViewed<'a> {
    list: ProductList<'a>,
}

impl<'a> RecentlyViewed<'a> {
    #[must_use]
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self {
            list: ProductList {
                store,
                key: RECENTLY_VIEWED_KEY,
                cap: Some(RECENTLY_VIEWED_CAP),
            },
        }
    }

    /// # Errors
    ///
    /// Backend failures. Malformed stored data reads as an empty list.
    pub fn list(&self) -> Result<Vec<ProductSummary>, StoreError> {
        self.list.load()
    }

    /// Moves `product` to the front, dropping any older entry with the same
    /// id and the oldest entries beyond the cap. Returns the updated list.
    ///
    /// # Errors
    ///
    /// Backend failures.
    pub fn record(&self, product: ProductSummary) -> Result<Vec<ProductSummary>, StoreError> {
        let mut items = self.list.load()?;
        items.retain(|item| item.id != product.id);
        items.insert(0, product);
        items.truncate(RECENTLY_VIEWED_CAP);
        self.list.save(&items)?;
        Ok(items)
    }

    /// # Errors
    ///
    /// Backend failures.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.list.clear()
    }
}

/// Saved products in the order they were added.
pub struct Wishlist<'a> {
    list: ProductList<'a>,
}

impl<'a> Wishlist<'a> {
    #[must_use]
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self {
            list: ProductList {
                store,
                key: WISHLIST_KEY,
                cap: None,
            },
        }
    }

    /// # Errors
    ///
    /// Backend failures. Malformed stored data reads as an empty list.
    pub fn list(&self) -> Result<Vec<ProductSummary>, StoreError> {
        self.list.load()
    }

    /// # Errors
    ///
    /// Backend failures.
    pub fn contains(&self, product_id: &str) -> Result<bool, StoreError> {
        Ok(self.list.load()?.iter().any(|item| item.id == product_id))
    }

    /// Appends `product` unless its id is already saved. Returns whether the
    /// list changed.
    ///
    /// # Errors
    ///
    /// Backend failures.
    pub fn add(&self, product: ProductSummary) -> Result<bool, StoreError> {
        let mut items = self.list.load()?;
        if items.iter().any(|item| item.id == product.id) {
            return Ok(false);
        }
        items.push(product);
        self.list.save(&items)?;
        Ok(true)
    }

    /// Returns whether an entry was removed.
    ///
    /// # Errors
    ///
    /// Backend failures.
    pub fn remove(&self, product_id: &str) -> Result<bool, StoreError> {
        let mut items = self.list.load()?;
        let before = items.len();
        items.retain(|item| item.id != product_id);
        if items.len() == before {
            return Ok(false);
        }
        self.list.save(&items)?;
        Ok(true)
    }

    /// Adds `product` when absent, removes it otherwise. Returns whether it
    /// is saved afterwards.
    ///
    /// # Errors
    ///
    /// Backend failures.
    pub fn toggle(&self, product: ProductSummary) -> Result<bool, StoreError> {
        if self.remove(&product.id)? {
            Ok(false)
        } else {
            self.add(product)
        }
    }

    /// # Errors
    ///
    /// Backend failures.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.list.clear()
    }
}

#[cfg(test)]
#[path = "lists_test.rs"]
mod tests;
