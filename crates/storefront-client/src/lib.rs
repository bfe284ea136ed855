pub mod cart_form;
pub mod client;
pub mod error;
pub mod filters;
pub mod model;
pub mod normalize;
pub mod pricing;
pub mod queries;
mod retry;
pub mod types;

pub use cart_form::{CartSubmitter, CART_COOKIE};
pub use client::{ClientOptions, StorefrontClient, ACCESS_TOKEN_HEADER};
pub use error::ClientError;
pub use filters::{CollectionQuery, ProductFilter, SortOrder};
pub use model::{Collection, ContentPage, MarketingModule, PageInfo};
pub use pricing::{GroupPriceResolver, PriceSource, PricedProduct};
