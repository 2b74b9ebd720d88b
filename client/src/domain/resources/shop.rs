//! Shop records.

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind};
use crate::domain::EntityId;

/// A retail shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    /// Server-assigned id.
    pub id: EntityId,
    /// Trading name.
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Payload for `POST /shop/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopDraft {
    /// Trading name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Partial update for `PATCH /shop/{id}`; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShopPatch {
    /// New trading name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New street address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// New contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Resource for Shop {
    type Draft = ShopDraft;
    type Patch = ShopPatch;

    const KIND: ResourceKind = ResourceKind::Shop;

    fn id(&self) -> EntityId {
        self.id
    }
}
