mod cart;
mod catalog;
mod lists;

use clap::{Parser, Subcommand};
use storefront_client::{ClientOptions, StorefrontClient};
use storefront_store::FileStore;
use tracing_subscriber::EnvFilter;

use crate::cart::CartCommands;
use crate::lists::{RecentCommands, WishlistCommands};

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Headless storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show a product with its price, options and variants
    Product {
        /// Product handle
        handle: String,
        /// Option filter as `Name=Value`; repeat for more values
        #[arg(long = "option", value_name = "NAME=VALUE")]
        options: Vec<String>,
        /// Variant id to select if it is visible
        #[arg(long)]
        variant: Option<String>,
        /// Print page data as JSON
        #[arg(long)]
        json: bool,
    },
    /// List one page of a collection's products
    Collection {
        /// Collection handle
        handle: String,
        /// URL-style filter parameter, e.g. `filter.Color=Red` or `price.max=20`
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
        /// Sort order, e.g. `price-low-high`
        #[arg(long)]
        sort: Option<String>,
        /// Cursor of the page to load
        #[arg(long)]
        after: Option<String>,
        /// Print page data as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stage and submit cart lines
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        command: WishlistCommands,
    },
    /// Show or clear recently viewed products
    Recent {
        #[command(subcommand)]
        command: RecentCommands,
    },
}

/// Splits a `KEY=VALUE` argument.
pub(crate) fn parse_pair(raw: &str) -> anyhow::Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("missing key in '{raw}'");
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = storefront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let store = FileStore::new(&config.state_dir);

    let Some(command) = cli.command else {
        println!("storefront-cli ready for {}", config.store_domain);
        return Ok(());
    };

    match command {
        Commands::Product {
            handle,
            options,
            variant,
            json,
        } => {
            let client = StorefrontClient::from_config(&config)?;
            catalog::run_product(&client, &store, &handle, &options, variant.as_deref(), json)
                .await?;
        }
        Commands::Collection {
            handle,
            filters,
            sort,
            after,
            json,
        } => {
            let client = StorefrontClient::from_config(&config)?;
            let params = catalog::collection_params(&filters, sort, after)?;
            catalog::run_collection(&client, &handle, params, config.page_size, json).await?;
        }
        Commands::Cart { command } => {
            let submitter = storefront_client::CartSubmitter::new(
                &config.cart_endpoint,
                &ClientOptions::from(&config),
            )?;
            cart::run_cart(&submitter, &store, command).await?;
        }
        Commands::Wishlist { command } => {
            lists::run_wishlist(&config, &store, command).await?;
        }
        Commands::Recent { command } => lists::run_recent(&store, &command)?,
    }

    Ok(())
}
