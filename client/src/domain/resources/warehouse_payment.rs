//! Payments booked against warehouse ledgers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind};
use crate::domain::{Amount, EntityId};

/// One payment against a warehouse ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehousePayment {
    /// Server-assigned id.
    pub id: EntityId,
    /// Ledger key, e.g. `central`.
    pub ledger: String,
    /// Amount paid.
    pub amount: Amount,
    /// Calendar date of the payment.
    pub paid_on: NaiveDate,
    /// Optional remark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Payload for `POST /warehouse/payment/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehousePaymentDraft {
    /// Ledger key.
    pub ledger: String,
    /// Amount paid.
    pub amount: Amount,
    /// Calendar date of the payment.
    pub paid_on: NaiveDate,
    /// Optional remark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Partial update for `PATCH /warehouse/payment/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WarehousePaymentPatch {
    /// Corrected amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    /// Corrected date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
    /// Replacement remark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Resource for WarehousePayment {
    type Draft = WarehousePaymentDraft;
    type Patch = WarehousePaymentPatch;

    const KIND: ResourceKind = ResourceKind::WarehousePayment;

    fn id(&self) -> EntityId {
        self.id
    }
}
