//! Expense records booked against a shop.

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind};
use crate::domain::{Amount, EntityId};

/// An expense paid out of a shop's till.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Server-assigned id.
    pub id: EntityId,
    /// Shop the expense is booked against.
    pub shop_id: EntityId,
    /// Actor who recorded the expense.
    pub user_id: EntityId,
    /// Amount paid.
    pub amount: Amount,
    /// Free-text reason.
    #[serde(default)]
    pub message: String,
}

/// Payload for `POST /expense`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseDraft {
    /// Shop the expense is booked against.
    pub shop_id: EntityId,
    /// Actor recording the expense.
    pub user_id: EntityId,
    /// Amount paid.
    pub amount: Amount,
    /// Free-text reason.
    pub message: String,
}

/// Partial update for `PATCH /expense/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpensePatch {
    /// Corrected amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    /// Corrected reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Resource for Expense {
    type Draft = ExpenseDraft;
    type Patch = ExpensePatch;

    const KIND: ResourceKind = ResourceKind::Expense;

    fn id(&self) -> EntityId {
        self.id
    }

    fn scope_id(&self) -> EntityId {
        self.shop_id
    }
}
