//! Accounting selector tree and the date-range gate in front of it.
//!
//! The tree has three fixed branches: one leaf per visible shop, the
//! warehouse ledger placeholders, and the cumulative "overall" entries.
//! Nothing downstream is requested until both date bounds are chosen.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::resources::Shop;
use super::{Actor, EntityId, visibility};

/// Warehouse ledgers offered as fixed placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseLedger {
    /// Central warehouse stock account.
    Central,
    /// Supplier payables.
    Supplier,
}

impl WarehouseLedger {
    /// Every ledger in display order.
    pub const ALL: [Self; 2] = [Self::Central, Self::Supplier];

    /// Stable key passed downstream.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Central => "central",
            Self::Supplier => "supplier",
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Central => "Central warehouse",
            Self::Supplier => "Supplier ledger",
        }
    }
}

/// Category discriminator for the cumulative entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallCategory {
    /// Aggregate across every shop.
    Shops,
    /// Aggregate across every warehouse ledger.
    Warehouses,
}

impl OverallCategory {
    /// Every category in display order.
    pub const ALL: [Self; 2] = [Self::Shops, Self::Warehouses];

    /// Stable key passed downstream.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Shops => "shops",
            Self::Warehouses => "warehouses",
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shops => "All shops",
            Self::Warehouses => "All warehouses",
        }
    }
}

/// What a selected leaf points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum AccountingTarget {
    /// One shop, by id.
    Shop(EntityId),
    /// One warehouse ledger.
    Warehouse(WarehouseLedger),
    /// A cumulative category rather than an entity.
    Overall(OverallCategory),
}

/// Selectable leaf of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountingLeaf {
    /// Display label.
    pub label: String,
    /// Target resolved on selection.
    pub target: AccountingTarget,
}

/// Top-level branch of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountingBranch {
    /// Display label.
    pub label: &'static str,
    /// Leaves in display order.
    pub leaves: Vec<AccountingLeaf>,
}

/// The three-branch accounting tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountingTree {
    /// Per-shop entries.
    pub shops: AccountingBranch,
    /// Warehouse placeholders.
    pub warehouses: AccountingBranch,
    /// Cumulative entries.
    pub overall: AccountingBranch,
}

impl AccountingTree {
    /// Build the tree for `actor`, listing only shops they may see.
    pub fn build(shops: &[Shop], actor: &Actor) -> Self {
        let shop_leaves = visibility::visible(shops, actor)
            .into_iter()
            .map(|shop| AccountingLeaf {
                label: shop.name,
                target: AccountingTarget::Shop(shop.id),
            })
            .collect();
        let warehouse_leaves = WarehouseLedger::ALL
            .into_iter()
            .map(|ledger| AccountingLeaf {
                label: ledger.label().to_owned(),
                target: AccountingTarget::Warehouse(ledger),
            })
            .collect();
        let overall_leaves = OverallCategory::ALL
            .into_iter()
            .map(|category| AccountingLeaf {
                label: category.label().to_owned(),
                target: AccountingTarget::Overall(category),
            })
            .collect();

        Self {
            shops: AccountingBranch {
                label: "Shops",
                leaves: shop_leaves,
            },
            warehouses: AccountingBranch {
                label: "Warehouses",
                leaves: warehouse_leaves,
            },
            overall: AccountingBranch {
                label: "Overall",
                leaves: overall_leaves,
            },
        }
    }

    /// Branches in display order.
    pub fn branches(&self) -> [&AccountingBranch; 3] {
        [&self.shops, &self.warehouses, &self.overall]
    }

    /// Find the leaf whose target matches `target`.
    pub fn leaf(&self, target: AccountingTarget) -> Option<&AccountingLeaf> {
        self.branches()
            .into_iter()
            .flat_map(|branch| branch.leaves.iter())
            .find(|leaf| leaf.target == target)
    }
}

/// Rejected date-range edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeError {
    /// The start would fall after the end.
    StartAfterEnd {
        /// Proposed or current start.
        from: NaiveDate,
        /// Proposed or current end.
        to: NaiveDate,
    },
}

impl fmt::Display for DateRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartAfterEnd { from, to } => {
                write!(f, "start date {from} falls after end date {to}")
            }
        }
    }
}

impl std::error::Error for DateRangeError {}

/// Closed date range chosen one bound at a time.
///
/// ## Invariants
/// - When both bounds are set, `from <= to`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    /// Start bound.
    pub const fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    /// End bound.
    pub const fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// Set the start bound.
    pub fn set_from(&mut self, from: NaiveDate) -> Result<(), DateRangeError> {
        if let Some(to) = self.to.filter(|to| from > *to) {
            return Err(DateRangeError::StartAfterEnd { from, to });
        }
        self.from = Some(from);
        Ok(())
    }

    /// Set the end bound.
    pub fn set_to(&mut self, to: NaiveDate) -> Result<(), DateRangeError> {
        if let Some(from) = self.from.filter(|from| *from > to) {
            return Err(DateRangeError::StartAfterEnd { from, to });
        }
        self.to = Some(to);
        Ok(())
    }

    /// Both bounds, once chosen.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.from.zip(self.to)
    }

    /// Whether downstream navigation may proceed.
    pub fn is_complete(&self) -> bool {
        self.bounds().is_some()
    }

    /// Resolve a leaf selection, or `None` while a bound is missing.
    pub fn select(&self, leaf: &AccountingLeaf) -> Option<AccountingQuery> {
        let (from, to) = self.bounds()?;
        Some(AccountingQuery {
            target: leaf.target,
            from,
            to,
        })
    }
}

/// Downstream request produced by a complete selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountingQuery {
    /// Entity or category to report on.
    pub target: AccountingTarget,
    /// Inclusive start.
    pub from: NaiveDate,
    /// Inclusive end.
    pub to: NaiveDate,
}
