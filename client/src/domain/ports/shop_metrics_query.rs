//! Driven port for per-shop figures used by the shop overview.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::RemoteError;
use crate::domain::{Amount, EntityId};

/// Port for `GET /shop/expenses/{shop_id}?sale_date=` and
/// `GET /shop/latest/{shop_id}`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShopMetricsQuery: Send + Sync {
    /// Total expenses booked against `shop_id` on `sale_date`.
    async fn expense_total(
        &self,
        shop_id: EntityId,
        sale_date: NaiveDate,
    ) -> Result<Amount, RemoteError>;

    /// Latest sale figure reported by `shop_id`.
    async fn latest_sale(&self, shop_id: EntityId) -> Result<Amount, RemoteError>;
}

/// Fixture returning zero for every shop; useful for wiring screens before
/// metrics are available.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureShopMetricsQuery;

#[async_trait]
impl ShopMetricsQuery for FixtureShopMetricsQuery {
    async fn expense_total(
        &self,
        _shop_id: EntityId,
        _sale_date: NaiveDate,
    ) -> Result<Amount, RemoteError> {
        Ok(Amount::ZERO)
    }

    async fn latest_sale(&self, _shop_id: EntityId) -> Result<Amount, RemoteError> {
        Ok(Amount::ZERO)
    }
}
