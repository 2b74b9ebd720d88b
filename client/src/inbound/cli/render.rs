//! JSON rendering of screen output.

use std::io::Write;

use serde::Serialize;

use super::CliError;
use crate::domain::overview::ShopFiguresMap;
use crate::domain::resources::Shop;
use crate::domain::{Amount, EntityId};

/// Write `value` as pretty JSON followed by a newline.
pub(super) fn write_json<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// One line of the overview screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct OverviewRow {
    pub(super) shop_id: EntityId,
    pub(super) name: String,
    pub(super) expense: Amount,
    pub(super) sale: Amount,
}

/// Join visible shops with their figures, keeping shop order.
pub(super) fn overview_rows(shops: &[Shop], figures: &ShopFiguresMap) -> Vec<OverviewRow> {
    shops
        .iter()
        .map(|shop| {
            let resolved = figures.get(&shop.id).copied().unwrap_or_default();
            OverviewRow {
                shop_id: shop.id,
                name: shop.name.clone(),
                expense: resolved.expense,
                sale: resolved.sale,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::overview::ShopMetric;
    use crate::test_support::{id, shop};

    #[test]
    fn rows_follow_shop_order_and_default_to_zero() {
        let mut figures = ShopFiguresMap::default();
        figures.merge(id(2), |entry| entry.set(ShopMetric::Sale, Amount::new(80)));

        let rows = overview_rows(&[shop(2, "South"), shop(1, "North")], &figures);

        assert_eq!(
            rows,
            vec![
                OverviewRow {
                    shop_id: id(2),
                    name: "South".to_owned(),
                    expense: Amount::ZERO,
                    sale: Amount::new(80),
                },
                OverviewRow {
                    shop_id: id(1),
                    name: "North".to_owned(),
                    expense: Amount::ZERO,
                    sale: Amount::ZERO,
                },
            ]
        );
    }

    #[test]
    fn json_output_ends_with_a_newline() {
        let mut out = Vec::new();
        write_json(&mut out, &overview_rows(&[shop(1, "North")], &ShopFiguresMap::default()))
            .expect("render");

        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.ends_with("}\n]\n"));
        assert!(text.contains("\"shop_id\": 1"));
    }
}
