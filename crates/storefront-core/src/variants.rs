//! Option filtering and variant selection for product pages and variant grids.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::products::{option_key, Variant};

/// User-selected option values, keyed by option name.
///
/// Names are stored trimmed and lowercased so `Color`, `color` and ` COLOR`
/// address the same constraint; values are compared exactly. An option with
/// no selected values imposes no constraint, and toggling the last value off
/// removes the option entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    options: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from `(option, value)` pairs, e.g. parsed from a
    /// query string. Repeated options accumulate values.
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        let mut selection = Self::new();
        for (name, value) in pairs {
            selection.insert(name.as_ref(), value);
        }
        selection
    }

    /// Adds `value` under `option`, leaving other values in place.
    pub fn insert(&mut self, option: &str, value: impl Into<String>) {
        self.options
            .entry(option_key(option))
            .or_default()
            .insert(value.into());
    }

    /// Adds `value` if absent, removes it if present.
    ///
    /// Returns `true` when the value is selected after the call.
    pub fn toggle(&mut self, option: &str, value: &str) -> bool {
        let key = option_key(option);
        let values = self.options.entry(key.clone()).or_default();
        let selected = if values.remove(value) {
            false
        } else {
            values.insert(value.to_string());
            true
        };
        if values.is_empty() {
            self.options.remove(&key);
        }
        selected
    }

    /// Removes every constraint on `option`.
    pub fn clear_option(&mut self, option: &str) {
        self.options.remove(&option_key(option));
    }

    pub fn clear(&mut self) {
        self.options.clear();
    }

    #[must_use]
    pub fn values(&self, option: &str) -> Option<&BTreeSet<String>> {
        self.options.get(&option_key(option))
    }

    #[must_use]
    pub fn is_selected(&self, option: &str, value: &str) -> bool {
        self.values(option).is_some_and(|v| v.contains(value))
    }

    /// `true` when no option constrains the result.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.options.values().all(BTreeSet::is_empty)
    }

    /// Constrained options and their accepted values.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.options
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(name, values)| (name.as_str(), values))
    }

    /// AND across options, OR within an option's values. A variant without a
    /// value for a constrained option does not match.
    #[must_use]
    pub fn matches(&self, variant: &Variant) -> bool {
        self.constraints().all(|(option, accepted)| {
            variant
                .option_value(option)
                .is_some_and(|value| accepted.contains(value))
        })
    }
}

/// Returns the variants matching `filter`, in input order.
#[must_use]
pub fn select_variants<'a>(variants: &'a [Variant], filter: &FilterSelection) -> Vec<&'a Variant> {
    variants.iter().filter(|v| filter.matches(v)).collect()
}

/// Applies the selection policy after the visible set changes.
///
/// Keeps `current` when it is still visible, otherwise picks the first
/// visible variant, otherwise clears the selection.
#[must_use]
pub fn reconcile_selection(current: Option<&str>, visible: &[&Variant]) -> Option<String> {
    if let Some(id) = current {
        if visible.iter().any(|v| v.id == id) {
            return Some(id.to_string());
        }
    }
    visible.first().map(|v| v.id.clone())
}

/// Distinct values of one option across a product's variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValues {
    pub name: String,
    pub values: Vec<String>,
}

/// Collects option names and their values in first-seen order, for rendering
/// filter controls.
#[must_use]
pub fn option_values(variants: &[Variant]) -> Vec<OptionValues> {
    let mut out: Vec<OptionValues> = Vec::new();
    for option in variants.iter().flat_map(|v| &v.selected_options) {
        let key = option_key(&option.name);
        let entry = match out.iter().position(|o| option_key(&o.name) == key) {
            Some(idx) => &mut out[idx],
            None => {
                out.push(OptionValues {
                    name: option.name.clone(),
                    values: Vec::new(),
                });
                let last = out.len() - 1;
                &mut out[last]
            }
        };
        if !entry.values.contains(&option.value) {
            entry.values.push(option.value.clone());
        }
    }
    out
}

/// Variant list, active filter and selection for one product view.
///
/// Every mutation re-applies [`reconcile_selection`], so the selection is
/// always either a visible variant or `None`.
#[derive(Debug, Clone)]
pub struct VariantSelector {
    variants: Vec<Variant>,
    filter: FilterSelection,
    selected: Option<String>,
}

impl VariantSelector {
    /// Starts unfiltered with `initial` selected if it names a variant,
    /// otherwise the first variant.
    #[must_use]
    pub fn new(variants: Vec<Variant>, initial: Option<&str>) -> Self {
        Self::with_filter(variants, FilterSelection::new(), initial)
    }

    #[must_use]
    pub fn with_filter(
        variants: Vec<Variant>,
        filter: FilterSelection,
        initial: Option<&str>,
    ) -> Self {
        let mut selector = Self {
            variants,
            filter,
            selected: initial.map(str::to_owned),
        };
        selector.reconcile();
        selector
    }

    fn reconcile(&mut self) {
        let visible = select_variants(&self.variants, &self.filter);
        self.selected = reconcile_selection(self.selected.as_deref(), &visible);
    }

    /// Toggles a filter value and re-applies the selection policy.
    pub fn toggle(&mut self, option: &str, value: &str) -> bool {
        let selected = self.filter.toggle(option, value);
        self.reconcile();
        selected
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.reconcile();
    }

    /// Selects `variant_id` if it is currently visible.
    ///
    /// Returns `false` and leaves the selection untouched otherwise.
    pub fn select(&mut self, variant_id: &str) -> bool {
        if self.visible().iter().any(|v| v.id == variant_id) {
            self.selected = Some(variant_id.to_string());
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&Variant> {
        select_variants(&self.variants, &self.filter)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Variant> {
        let id = self.selected.as_deref()?;
        self.variants.iter().find(|v| v.id == id)
    }

    #[must_use]
    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }
}

#[cfg(test)]
#[path = "variants_test.rs"]
mod tests;
