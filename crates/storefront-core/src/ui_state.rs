//! Explicit state machines for interactive page widgets.

use serde::{Deserialize, Serialize};

use crate::cart::{clamp_quantity, StagedLine};

/// How a variant list is laid out. Only the grid supports row selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Grid,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowSelection {
    Unselected,
    Selected,
}

/// Quantity lifecycle of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "quantity", rename_all = "snake_case")]
pub enum QuantityState {
    Idle,
    Staged(u32),
    Submitted(u32),
}

/// A variant row in a grid or list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRow {
    pub variant_id: String,
    pub mode: ViewMode,
    pub selection: RowSelection,
    pub quantity: QuantityState,
}

impl VariantRow {
    #[must_use]
    pub fn new(variant_id: impl Into<String>, mode: ViewMode) -> Self {
        Self {
            variant_id: variant_id.into(),
            mode,
            selection: RowSelection::Unselected,
            quantity: QuantityState::Idle,
        }
    }

    /// Flips selection in grid view; list view ignores clicks.
    pub fn click(&mut self) {
        if self.mode != ViewMode::Grid {
            return;
        }
        self.selection = match self.selection {
            RowSelection::Unselected => RowSelection::Selected,
            RowSelection::Selected => RowSelection::Unselected,
        };
    }

    /// `+` control. Ignored while a submission is in flight.
    pub fn increment(&mut self) {
        self.quantity = match self.quantity {
            QuantityState::Idle => QuantityState::Staged(1),
            QuantityState::Staged(n) => QuantityState::Staged(n.saturating_add(1)),
            submitted @ QuantityState::Submitted(_) => submitted,
        };
    }

    /// `-` control. Never goes below one; an idle row stays idle.
    pub fn decrement(&mut self) {
        if let QuantityState::Staged(n) = self.quantity {
            self.quantity = QuantityState::Staged(clamp_quantity(i64::from(n) - 1));
        }
    }

    /// Direct numeric input, clamped to at least one.
    pub fn set_quantity(&mut self, requested: i64) {
        if !matches!(self.quantity, QuantityState::Submitted(_)) {
            self.quantity = QuantityState::Staged(clamp_quantity(requested));
        }
    }

    /// "Add to cart": moves a staged quantity to submitted and returns the
    /// line to send. Returns `None` when nothing is staged.
    pub fn submit(&mut self) -> Option<StagedLine> {
        match self.quantity {
            QuantityState::Staged(n) => {
                self.quantity = QuantityState::Submitted(n);
                Some(StagedLine::new(self.variant_id.clone(), i64::from(n)))
            }
            QuantityState::Idle | QuantityState::Submitted(_) => None,
        }
    }

    /// The submission finished. Success resets the row; failure puts the
    /// quantity back to staged so it can be retried.
    pub fn finish(&mut self, succeeded: bool) {
        if let QuantityState::Submitted(n) = self.quantity {
            self.quantity = if succeeded {
                QuantityState::Idle
            } else {
                QuantityState::Staged(n)
            };
        }
    }
}

/// Open/closed state of a single collapsible section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disclosure {
    #[default]
    Closed,
    Open,
}

impl Disclosure {
    pub fn toggle(&mut self) {
        *self = match self {
            Disclosure::Closed => Disclosure::Open,
            Disclosure::Open => Disclosure::Closed,
        };
    }

    #[must_use]
    pub fn is_open(self) -> bool {
        self == Disclosure::Open
    }
}

/// Accordion where at most one of `len` sections is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accordion {
    len: usize,
    open: Option<usize>,
}

impl Accordion {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { len, open: None }
    }

    /// Starts with `index` open, if it exists.
    #[must_use]
    pub fn with_open(len: usize, index: usize) -> Self {
        Self {
            len,
            open: (index < len).then_some(index),
        }
    }

    /// Opens `index` (closing any other), or closes it if already open.
    /// Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    #[must_use]
    pub fn open_section(&self) -> Option<usize> {
        self.open
    }

    #[must_use]
    pub fn state(&self, index: usize) -> Disclosure {
        if self.open == Some(index) {
            Disclosure::Open
        } else {
            Disclosure::Closed
        }
    }
}
