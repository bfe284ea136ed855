//! Wishlist and recently viewed lists kept in the local state directory.

use clap::Subcommand;
use storefront_client::StorefrontClient;
use storefront_core::{AppConfig, ProductSummary};
use storefront_store::{KeyValueStore, RecentlyViewed, Wishlist};

#[derive(Debug, Subcommand)]
pub(crate) enum WishlistCommands {
    /// Save a product by handle
    Add { handle: String },
    /// Remove a product by handle or id
    Remove { handle: String },
    /// List saved products
    List,
    /// Remove every saved product
    Clear,
}

#[derive(Debug, Subcommand)]
pub(crate) enum RecentCommands {
    /// List recently viewed products, newest first
    List,
    /// Forget recently viewed products
    Clear,
}

pub(crate) fn summary_line(summary: &ProductSummary) -> String {
    let price = summary
        .price
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    format!("{:<32} {:<40} {price}", summary.handle, summary.title)
}

fn print_list(items: &[ProductSummary], empty: &str) {
    if items.is_empty() {
        println!("{empty}");
        return;
    }
    for item in items {
        println!("{}", summary_line(item));
    }
}

/// Finds the saved entry a user named by handle or id.
pub(crate) fn find_entry<'a>(items: &'a [ProductSummary], key: &str) -> Option<&'a ProductSummary> {
    items.iter().find(|item| item.handle == key || item.id == key)
}

pub(crate) async fn run_wishlist(
    config: &AppConfig,
    store: &dyn KeyValueStore,
    command: WishlistCommands,
) -> anyhow::Result<()> {
    let wishlist = Wishlist::new(store);
    match command {
        WishlistCommands::Add { handle } => {
            let client = StorefrontClient::from_config(config)?;
            let product = client.product(&handle).await?;
            if wishlist.add(ProductSummary::from(&product))? {
                println!("saved {}", product.handle);
            } else {
                println!("{} is already saved", product.handle);
            }
        }
        WishlistCommands::Remove { handle } => {
            let items = wishlist.list()?;
            match find_entry(&items, &handle) {
                Some(entry) if wishlist.remove(&entry.id)? => println!("removed {}", entry.handle),
                _ => println!("{handle} is not saved"),
            }
        }
        WishlistCommands::List => print_list(&wishlist.list()?, "wishlist is empty"),
        WishlistCommands::Clear => {
            wishlist.clear()?;
            println!("wishlist cleared");
        }
    }
    Ok(())
}

pub(crate) fn run_recent(store: &dyn KeyValueStore, command: &RecentCommands) -> anyhow::Result<()> {
    let recent = RecentlyViewed::new(store);
    match command {
        RecentCommands::List => print_list(&recent.list()?, "nothing viewed yet"),
        RecentCommands::Clear => {
            recent.clear()?;
            println!("recently viewed cleared");
        }
    }
    Ok(())
}
