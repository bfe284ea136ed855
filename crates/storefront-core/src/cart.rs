//! Cart line reconciliation.
//!
//! Staged quantities from a variant grid or list are turned into the two cart
//! form actions the storefront understands: `LinesAdd` for variants that have
//! no line yet and `LinesUpdate` (keyed by line id) for variants already in
//! the cart. There is no optimistic rollback; the line index is rebuilt from
//! the next cart snapshot.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::Money;

/// Smallest quantity a quantity control can show or a line can carry.
pub const MIN_LINE_QUANTITY: u32 = 1;

/// Clamps a quantity control value to [`MIN_LINE_QUANTITY`].
#[must_use]
pub fn clamp_quantity(requested: i64) -> u32 {
    u32::try_from(requested.max(i64::from(MIN_LINE_QUANTITY))).unwrap_or(u32::MAX)
}

/// A quantity staged client-side for one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedLine {
    pub variant_id: String,
    /// Signed so that out-of-range input can be rejected rather than wrapped.
    pub quantity: i64,
}

impl StagedLine {
    #[must_use]
    pub fn new(variant_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            variant_id: variant_id.into(),
            quantity,
        }
    }
}

/// One line of a server cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Server-assigned line id, e.g. `"gid://shopify/CartLine/abc"`.
    pub id: String,
    pub variant_id: String,
    pub quantity: u32,
    pub total: Option<Money>,
}

/// The cart as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub id: String,
    pub checkout_url: Option<String>,
    pub total_quantity: u32,
    pub subtotal: Option<Money>,
    pub lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// Rebuilds the variant → line lookup from scratch.
    #[must_use]
    pub fn line_index(&self) -> CartLineIndex {
        CartLineIndex::from_lines(&self.lines)
    }
}

/// Line id and quantity of a variant already in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingLine {
    pub line_id: String,
    pub quantity: u32,
}

/// Lookup from variant id to its existing cart line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartLineIndex {
    lines: HashMap<String, ExistingLine>,
}

impl CartLineIndex {
    /// Indexes `lines` by variant id. If a variant appears on several lines
    /// the first one wins.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let mut index = HashMap::with_capacity(lines.len());
        for line in lines {
            index
                .entry(line.variant_id.clone())
                .or_insert_with(|| ExistingLine {
                    line_id: line.id.clone(),
                    quantity: line.quantity,
                });
        }
        Self { lines: index }
    }

    #[must_use]
    pub fn get(&self, variant_id: &str) -> Option<&ExistingLine> {
        self.lines.get(variant_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// `LinesAdd` input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineAdd {
    pub merchandise_id: String,
    pub quantity: u32,
}

/// `LinesUpdate` input line, keyed by cart line id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineUpdate {
    pub id: String,
    pub quantity: u32,
}

/// Cart form action names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    LinesAdd,
    LinesUpdate,
}

impl CartAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CartAction::LinesAdd => "LinesAdd",
            CartAction::LinesUpdate => "LinesUpdate",
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CartAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LinesAdd" => Ok(CartAction::LinesAdd),
            "LinesUpdate" => Ok(CartAction::LinesUpdate),
            other => Err(CoreError::UnknownCartAction(other.to_string())),
        }
    }
}

#[derive(Deserialize)]
struct LinesInputs<T> {
    lines: Vec<T>,
}

/// One cart form submission: an action and its `{"lines": [...]}` inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartMutation {
    LinesAdd(Vec<CartLineAdd>),
    LinesUpdate(Vec<CartLineUpdate>),
}

impl CartMutation {
    #[must_use]
    pub fn action(&self) -> CartAction {
        match self {
            CartMutation::LinesAdd(_) => CartAction::LinesAdd,
            CartMutation::LinesUpdate(_) => CartAction::LinesUpdate,
        }
    }

    /// JSON text of the `inputs` form field.
    #[must_use]
    pub fn inputs_json(&self) -> String {
        let value = match self {
            CartMutation::LinesAdd(lines) => serde_json::json!({ "lines": lines }),
            CartMutation::LinesUpdate(lines) => serde_json::json!({ "lines": lines }),
        };
        value.to_string()
    }

    /// Decodes a submitted `action` / `inputs` pair and re-checks quantities.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UnknownCartAction`] for an unrecognised action name.
    /// - [`CoreError::CartInputs`] when `inputs` is not the expected JSON.
    /// - [`CoreError::InvalidQuantity`] for any line below [`MIN_LINE_QUANTITY`].
    pub fn from_form(action: &str, inputs: &str) -> Result<Self, CoreError> {
        let action: CartAction = action.parse()?;
        let decode_err = |source| CoreError::CartInputs {
            action: action.to_string(),
            source,
        };
        let mutation = match action {
            CartAction::LinesAdd => {
                let parsed: LinesInputs<CartLineAdd> =
                    serde_json::from_str(inputs).map_err(decode_err)?;
                CartMutation::LinesAdd(parsed.lines)
            }
            CartAction::LinesUpdate => {
                let parsed: LinesInputs<CartLineUpdate> =
                    serde_json::from_str(inputs).map_err(decode_err)?;
                CartMutation::LinesUpdate(parsed.lines)
            }
        };
        mutation.validate()?;
        Ok(mutation)
    }

    fn validate(&self) -> Result<(), CoreError> {
        let low = match self {
            CartMutation::LinesAdd(lines) => lines
                .iter()
                .find(|l| l.quantity < MIN_LINE_QUANTITY)
                .map(|l| (l.merchandise_id.clone(), l.quantity)),
            CartMutation::LinesUpdate(lines) => lines
                .iter()
                .find(|l| l.quantity < MIN_LINE_QUANTITY)
                .map(|l| (l.id.clone(), l.quantity)),
        };
        match low {
            Some((target, quantity)) => Err(CoreError::InvalidQuantity {
                target,
                quantity: i64::from(quantity),
            }),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            CartMutation::LinesAdd(lines) => lines.is_empty(),
            CartMutation::LinesUpdate(lines) => lines.is_empty(),
        }
    }
}

/// Adds and updates derived from staged quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartPlan {
    pub adds: Vec<CartLineAdd>,
    pub updates: Vec<CartLineUpdate>,
}

impl CartPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.updates.is_empty()
    }

    /// The non-empty mutations, `LinesAdd` first.
    #[must_use]
    pub fn into_mutations(self) -> Vec<CartMutation> {
        let mut out = Vec::with_capacity(2);
        if !self.adds.is_empty() {
            out.push(CartMutation::LinesAdd(self.adds));
        }
        if !self.updates.is_empty() {
            out.push(CartMutation::LinesUpdate(self.updates));
        }
        out
    }
}

/// Splits staged quantities into adds and updates against `index`.
///
/// - Quantities of zero or below are dropped; they are never sent.
/// - A variant with no existing line becomes a `LinesAdd` entry.
/// - A variant with an existing line becomes a `LinesUpdate` entry keyed by
///   the line id, unless the quantity is unchanged.
/// - If a variant is staged more than once, the last entry wins.
#[must_use]
pub fn plan_cart_mutations(staged: &[StagedLine], index: &CartLineIndex) -> CartPlan {
    let mut latest: Vec<&StagedLine> = Vec::with_capacity(staged.len());
    for line in staged {
        match latest.iter().position(|l| l.variant_id == line.variant_id) {
            Some(pos) => latest[pos] = line,
            None => latest.push(line),
        }
    }

    let mut plan = CartPlan::default();
    for line in latest {
        let quantity = match u32::try_from(line.quantity) {
            Ok(q) if q >= MIN_LINE_QUANTITY => q,
            _ => {
                tracing::debug!(
                    variant_id = %line.variant_id,
                    quantity = line.quantity,
                    "dropping staged line below minimum quantity"
                );
                continue;
            }
        };

        match index.get(&line.variant_id) {
            Some(existing) if existing.quantity == quantity => {}
            Some(existing) => plan.updates.push(CartLineUpdate {
                id: existing.line_id.clone(),
                quantity,
            }),
            None => plan.adds.push(CartLineAdd {
                merchandise_id: line.variant_id.clone(),
                quantity,
            }),
        }
    }
    plan
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
