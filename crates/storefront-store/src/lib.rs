//! Persistent shopper lists: wishlist and recently viewed products.
//!
//! Lists are stored as versioned JSON envelopes in a [`KeyValueStore`].
//! Values written by older builds as bare JSON arrays are migrated on read.

mod backend;
mod error;
mod lists;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use error::StoreError;
pub use lists::{
    RecentlyViewed, Wishlist, RECENTLY_VIEWED_CAP, RECENTLY_VIEWED_KEY, SCHEMA_VERSION,
    WISHLIST_KEY,
};
