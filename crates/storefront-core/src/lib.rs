//! Domain types and pure decision logic for the headless storefront.

pub mod app_config;
pub mod cart;
pub mod config;
pub mod error;
pub mod money;
pub mod pricing;
pub mod products;
pub mod ui_state;
pub mod variants;

pub use app_config::{AppConfig, Environment};
pub use cart::{
    clamp_quantity, plan_cart_mutations, CartAction, CartLine, CartLineAdd, CartLineIndex,
    CartLineUpdate, CartMutation, CartPlan, CartSnapshot, ExistingLine, StagedLine,
    MIN_LINE_QUANTITY,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use money::Money;
pub use pricing::{aggregate_ranges, resolve_price_display, PriceDisplay};
pub use products::{
    option_key, Image, Metafield, PriceRange, Product, ProductSummary, SelectedOption,
    Variant,
};
pub use ui_state::{Accordion, Disclosure, QuantityState, RowSelection, VariantRow, ViewMode};
pub use variants::{
    option_values, reconcile_selection, select_variants, FilterSelection, OptionValues,
    VariantSelector,
};
