//! Keyed derived view rebuilt incrementally by fan-out runs.

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

use serde::Serialize;

use crate::domain::Amount;

/// Mapping from parent id to a derived value.
///
/// Entries are merged one key at a time; the map is never wholesale replaced
/// while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregatedViewMap<K: Ord, V> {
    entries: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for AggregatedViewMap<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy + Hash, V: Default> AggregatedViewMap<K, V> {
    /// Keep only `keys`, inserting a default value for any key not yet
    /// present. Existing values are kept until overwritten.
    pub fn align_keys(&mut self, keys: &[K]) {
        let wanted: HashSet<K> = keys.iter().copied().collect();
        self.entries.retain(|key, _| wanted.contains(key));
        for key in keys {
            self.entries.entry(*key).or_default();
        }
    }

    /// Update the value under `key`, inserting a default first if needed.
    /// Other keys are untouched.
    pub fn merge(&mut self, key: K, update: impl FnOnce(&mut V)) {
        update(self.entries.entry(key).or_default());
    }
}

impl<K: Ord, V> AggregatedViewMap<K, V> {
    /// Value under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Sub-fetch issued once per shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShopMetric {
    /// Expense total for the sale date.
    Expense,
    /// Latest sale figure.
    Sale,
}

impl ShopMetric {
    /// Stable lowercase name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Sale => "sale",
        }
    }
}

/// Figures shown per shop on the overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShopFigures {
    /// Expense total for the sale date.
    pub expense: Amount,
    /// Latest sale figure.
    pub sale: Amount,
}

impl ShopFigures {
    /// Overwrite one metric.
    pub fn set(&mut self, metric: ShopMetric, amount: Amount) {
        match metric {
            ShopMetric::Expense => self.expense = amount,
            ShopMetric::Sale => self.sale = amount,
        }
    }
}
