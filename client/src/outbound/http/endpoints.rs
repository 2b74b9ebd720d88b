//! Path table for the remote data service.
//!
//! Paths are relative so they resolve beneath the configured base URL.

use chrono::NaiveDate;

use crate::domain::EntityId;
use crate::domain::resources::ResourceKind;

pub(super) const LOGIN: &str = "user/login";
pub(super) const CURRENT_USER: &str = "user/me";
pub(super) const USERS: &str = "user";

/// Collection and create paths of one resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ResourcePaths {
    collection: &'static str,
    create: &'static str,
}

impl ResourcePaths {
    pub(super) const fn for_kind(kind: ResourceKind) -> Self {
        let (collection, create) = match kind {
            ResourceKind::Shop => ("shop", "shop/create"),
            ResourceKind::Expense => ("expense", "expense"),
            ResourceKind::WarehousePayment => ("warehouse/payment", "warehouse/payment/create"),
            ResourceKind::Attendance => ("attendance", "attendance/create"),
            ResourceKind::SaleSheet => ("sale-sheet", "sale-sheet/create"),
        };
        Self { collection, create }
    }

    pub(super) const fn list(self) -> &'static str {
        self.collection
    }

    pub(super) const fn create(self) -> &'static str {
        self.create
    }

    /// Detail and edit share one path.
    pub(super) fn entity(self, id: EntityId) -> String {
        format!("{}/{id}", self.collection)
    }
}

pub(super) fn shop_expenses(shop_id: EntityId) -> String {
    format!("shop/expenses/{shop_id}")
}

pub(super) fn shop_latest_sale(shop_id: EntityId) -> String {
    format!("shop/latest/{shop_id}")
}

pub(super) fn sale_date_query(sale_date: NaiveDate) -> [(&'static str, String); 1] {
    [("sale_date", sale_date.format("%Y-%m-%d").to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(raw: u64) -> EntityId {
        EntityId::new(raw).expect("id")
    }

    #[rstest]
    #[case(ResourceKind::Shop, "shop", "shop/create", "shop/4")]
    #[case(ResourceKind::Expense, "expense", "expense", "expense/4")]
    #[case(
        ResourceKind::WarehousePayment,
        "warehouse/payment",
        "warehouse/payment/create",
        "warehouse/payment/4"
    )]
    #[case(ResourceKind::Attendance, "attendance", "attendance/create", "attendance/4")]
    #[case(ResourceKind::SaleSheet, "sale-sheet", "sale-sheet/create", "sale-sheet/4")]
    fn resource_paths(
        #[case] kind: ResourceKind,
        #[case] list: &str,
        #[case] create: &str,
        #[case] entity: &str,
    ) {
        let paths = ResourcePaths::for_kind(kind);
        assert_eq!(paths.list(), list);
        assert_eq!(paths.create(), create);
        assert_eq!(paths.entity(id(4)), entity);
    }

    #[test]
    fn metric_paths_embed_the_shop_id() {
        assert_eq!(shop_expenses(id(7)), "shop/expenses/7");
        assert_eq!(shop_latest_sale(id(7)), "shop/latest/7");
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).expect("date");
        assert_eq!(sale_date_query(date), [("sale_date", "2024-01-05".to_owned())]);
    }
}
