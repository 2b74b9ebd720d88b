//! Daily sale sheets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind};
use crate::domain::{Amount, EntityId};

/// End-of-day takings for one shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSheet {
    /// Server-assigned id.
    pub id: EntityId,
    /// Shop the takings belong to.
    pub shop_id: EntityId,
    /// Trading date.
    pub sale_date: NaiveDate,
    /// Cash takings.
    #[serde(default)]
    pub cash: Amount,
    /// Card takings.
    #[serde(default)]
    pub card: Amount,
    /// Total takings as reported by the shop.
    pub total: Amount,
}

/// Payload for `POST /sale-sheet/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleSheetDraft {
    /// Shop the takings belong to.
    pub shop_id: EntityId,
    /// Trading date.
    pub sale_date: NaiveDate,
    /// Cash takings.
    pub cash: Amount,
    /// Card takings.
    pub card: Amount,
    /// Total takings.
    pub total: Amount,
}

/// Partial update for `PATCH /sale-sheet/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaleSheetPatch {
    /// Corrected cash takings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash: Option<Amount>,
    /// Corrected card takings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Amount>,
    /// Corrected total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Amount>,
}

impl Resource for SaleSheet {
    type Draft = SaleSheetDraft;
    type Patch = SaleSheetPatch;

    const KIND: ResourceKind = ResourceKind::SaleSheet;

    fn id(&self) -> EntityId {
        self.id
    }

    fn scope_id(&self) -> EntityId {
        self.shop_id
    }
}
