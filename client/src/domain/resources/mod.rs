//! Resource entities managed by the domain stores.
//!
//! Every resource shares one contract ([`Resource`]) so a single generic store
//! can own the request lifecycle and merge rules for all of them. Identity is
//! the server-assigned [`EntityId`]; no list may hold two entities with the
//! same id.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::EntityId;

mod attendance;
mod expense;
mod sale_sheet;
mod shop;
mod warehouse_payment;

pub use attendance::{Attendance, AttendanceDraft, AttendancePatch, AttendanceStatus};
pub use expense::{Expense, ExpenseDraft, ExpensePatch};
pub use sale_sheet::{SaleSheet, SaleSheetDraft, SaleSheetPatch};
pub use shop::{Shop, ShopDraft, ShopPatch};
pub use warehouse_payment::{WarehousePayment, WarehousePaymentDraft, WarehousePaymentPatch};

/// Discriminator naming each resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Retail shops.
    Shop,
    /// Shop expenses.
    Expense,
    /// Payments booked against warehouse ledgers.
    WarehousePayment,
    /// Staff attendance records.
    Attendance,
    /// Daily sale sheets.
    SaleSheet,
}

impl ResourceKind {
    /// Stable lowercase name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shop => "shop",
            Self::Expense => "expense",
            Self::WarehousePayment => "warehouse_payment",
            Self::Attendance => "attendance",
            Self::SaleSheet => "sale_sheet",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract shared by every remotely managed entity.
pub trait Resource:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Payload submitted by `create`.
    type Draft: Clone + fmt::Debug + Serialize + Send + Sync + 'static;
    /// Payload submitted by `edit`.
    type Patch: Clone + fmt::Debug + Serialize + Send + Sync + 'static;

    /// Resource family.
    const KIND: ResourceKind;

    /// Server-assigned identity.
    fn id(&self) -> EntityId;

    /// Identifier compared against an actor's assigned resources.
    ///
    /// Shop-owned records scope through their shop; everything else scopes
    /// through its own id.
    fn scope_id(&self) -> EntityId {
        self.id()
    }
}
