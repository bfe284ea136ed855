//! Cart staging and submission from the command line.

use clap::Subcommand;
use storefront_client::CartSubmitter;
use storefront_core::{plan_cart_mutations, CartLineIndex, CartSnapshot, VariantRow, ViewMode};
use storefront_store::KeyValueStore;

use crate::parse_pair;

/// Store key holding the id of the shopper's cart between runs.
pub(crate) const CART_ID_KEY: &str = "cart";

#[derive(Debug, Subcommand)]
pub(crate) enum CartCommands {
    /// Add variants to the cart, merging with lines already present
    Add {
        /// Lines as `VARIANT_ID=QUANTITY`
        #[arg(value_name = "VARIANT=QTY", required = true)]
        lines: Vec<String>,
    },
    /// Show the current cart
    Show,
}

/// Parses a `VARIANT_ID=QUANTITY` argument.
pub(crate) fn parse_line(raw: &str) -> anyhow::Result<(String, i64)> {
    let (variant_id, quantity) = parse_pair(raw)?;
    let quantity = quantity
        .parse::<i64>()
        .map_err(|e| anyhow::anyhow!("invalid quantity in '{raw}': {e}"))?;
    Ok((variant_id, quantity))
}

pub(crate) fn snapshot_lines(snapshot: &CartSnapshot) -> Vec<String> {
    let mut out = Vec::with_capacity(snapshot.lines.len() + 2);
    for line in &snapshot.lines {
        let total = line
            .total
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        out.push(format!(
            "  {:>3} x {:<40} {total}",
            line.quantity, line.variant_id
        ));
    }
    let subtotal = snapshot
        .subtotal
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    out.push(format!("{} items, subtotal {subtotal}", snapshot.total_quantity));
    if let Some(url) = &snapshot.checkout_url {
        out.push(format!("checkout: {url}"));
    }
    out
}

fn print_snapshot(snapshot: &CartSnapshot) {
    println!("cart {}", snapshot.id);
    for line in snapshot_lines(snapshot) {
        println!("{line}");
    }
}

/// Loads the remembered cart. A cart that can no longer be fetched is
/// forgotten so the next submission starts a new one.
async fn current_cart(
    submitter: &CartSubmitter,
    store: &dyn KeyValueStore,
) -> anyhow::Result<Option<CartSnapshot>> {
    let Some(cart_id) = store.get(CART_ID_KEY)? else {
        return Ok(None);
    };
    match submitter.fetch(&cart_id).await {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(e) => {
            tracing::warn!(cart_id = %cart_id, error = %e, "stored cart unavailable, starting a new one");
            store.remove(CART_ID_KEY)?;
            Ok(None)
        }
    }
}

pub(crate) async fn run_cart(
    submitter: &CartSubmitter,
    store: &dyn KeyValueStore,
    command: CartCommands,
) -> anyhow::Result<()> {
    match command {
        CartCommands::Show => {
            match current_cart(submitter, store).await? {
                Some(snapshot) => print_snapshot(&snapshot),
                None => println!("cart is empty"),
            }
            Ok(())
        }
        CartCommands::Add { lines } => add_lines(submitter, store, &lines).await,
    }
}

async fn add_lines(
    submitter: &CartSubmitter,
    store: &dyn KeyValueStore,
    lines: &[String],
) -> anyhow::Result<()> {
    let mut rows = Vec::with_capacity(lines.len());
    for raw in lines {
        let (variant_id, quantity) = parse_line(raw)?;
        if quantity <= 0 {
            tracing::warn!(variant_id = %variant_id, quantity, "skipping line without a positive quantity");
            continue;
        }
        let mut row = VariantRow::new(variant_id, ViewMode::List);
        row.set_quantity(quantity);
        rows.push(row);
    }
    let staged: Vec<_> = rows.iter_mut().filter_map(VariantRow::submit).collect();
    if staged.is_empty() {
        anyhow::bail!("nothing to add");
    }

    let existing = current_cart(submitter, store).await?;
    let index: CartLineIndex = existing
        .as_ref()
        .map(CartSnapshot::line_index)
        .unwrap_or_default();
    let plan = plan_cart_mutations(&staged, &index);
    tracing::debug!(
        adds = plan.adds.len(),
        updates = plan.updates.len(),
        "planned cart mutations"
    );

    let result = submitter
        .submit_plan(plan, existing.as_ref().map(|c| c.id.as_str()))
        .await;
    for row in &mut rows {
        row.finish(result.is_ok());
    }

    match result? {
        Some(snapshot) => {
            store.set(CART_ID_KEY, &snapshot.id)?;
            print_snapshot(&snapshot);
        }
        None => println!("cart unchanged"),
    }
    Ok(())
}
