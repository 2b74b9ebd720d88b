//! Fan-out behaviour of the shop overview.

use std::sync::Arc;

use chrono::{Local, TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{InMemoryTokenStore, MockShopMetricsQuery};
use crate::domain::{Role, SessionToken};
use crate::test_support::{FixedClock, StubShopMetricsQuery, actor, id, shop};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn signed_in(role: Role, assigned: &[u64]) -> SessionContext {
    let session = SessionContext::new(Arc::new(InMemoryTokenStore::default()));
    session.establish(SessionToken::new("tok"), actor(1, role, assigned));
    session
}

fn fixed_clock() -> Arc<dyn Clock> {
    let noon = Utc
        .with_ymd_and_hms(2024, 3, 9, 12, 0, 0)
        .single()
        .expect("valid instant");
    Arc::new(FixedClock(noon))
}

#[fixture]
fn metrics() -> Arc<StubShopMetricsQuery> {
    Arc::new(StubShopMetricsQuery::new())
}

#[rstest]
#[tokio::test]
async fn every_visible_shop_gets_a_key_despite_failures(metrics: Arc<StubShopMetricsQuery>) {
    metrics.set_expense(id(1), Ok(Amount::new(100)));
    metrics.set_sale(id(1), Ok(Amount::new(0)));
    metrics.set_expense(id(2), Ok(Amount::new(0)));
    metrics.set_sale(id(2), Err(RemoteError::transport("reset by peer")));
    let overview = ShopOverview::new(metrics, signed_in(Role::Admin, &[]), fixed_clock());

    let report = overview
        .force_refresh(&[shop(1, "A"), shop(2, "B")])
        .await
        .expect("fan-out");

    assert!(report.is_complete());
    assert_eq!(report.failed, 1);
    let figures = overview.figures();
    assert_eq!(figures.len(), 2);
    assert_eq!(
        figures.get(&id(1)),
        Some(&ShopFigures {
            expense: Amount::new(100),
            sale: Amount::ZERO,
        })
    );
    assert_eq!(figures.get(&id(2)), Some(&ShopFigures::default()));
}

#[rstest]
#[tokio::test]
async fn managers_only_fan_out_over_assigned_shops(metrics: Arc<StubShopMetricsQuery>) {
    let overview = ShopOverview::new(
        Arc::clone(&metrics),
        signed_in(Role::Manager, &[2]),
        fixed_clock(),
    );

    let report = overview
        .force_refresh(&[shop(1, "A"), shop(2, "B"), shop(3, "C")])
        .await
        .expect("fan-out");

    assert_eq!(report.issued, 2);
    assert_eq!(overview.figures().len(), 1);
    assert!(overview.figures().get(&id(2)).is_some());
}

#[rstest]
#[tokio::test]
async fn unchanged_inputs_skip_the_rerun(metrics: Arc<StubShopMetricsQuery>) {
    let overview = ShopOverview::new(metrics, signed_in(Role::Admin, &[]), fixed_clock());
    let shops = [shop(1, "A")];

    assert!(overview.refresh(&shops).await.expect("first run").is_some());
    assert!(overview.refresh(&shops).await.expect("second run").is_none());
    assert!(
        overview
            .refresh(&[shop(1, "A"), shop(2, "B")])
            .await
            .expect("parents changed")
            .is_some()
    );
}

#[rstest]
#[tokio::test]
async fn actor_change_triggers_a_rerun(metrics: Arc<StubShopMetricsQuery>) {
    let session = signed_in(Role::Admin, &[]);
    let overview = ShopOverview::new(metrics, session.clone(), fixed_clock());
    let shops = [shop(1, "A")];
    overview.refresh(&shops).await.expect("first run");

    session.replace_actor(Some(actor(2, Role::Admin, &[])));

    assert!(overview.refresh(&shops).await.expect("rerun").is_some());
}

#[rstest]
#[tokio::test]
async fn departed_shops_are_dropped_from_the_view(metrics: Arc<StubShopMetricsQuery>) {
    let overview = ShopOverview::new(metrics, signed_in(Role::Admin, &[]), fixed_clock());
    overview
        .force_refresh(&[shop(1, "A"), shop(2, "B")])
        .await
        .expect("first run");

    overview
        .force_refresh(&[shop(2, "B")])
        .await
        .expect("second run");

    assert_eq!(overview.figures().len(), 1);
    assert!(overview.figures().get(&id(1)).is_none());
}

#[rstest]
#[tokio::test]
async fn refresh_requires_an_actor(metrics: Arc<StubShopMetricsQuery>) {
    let session = SessionContext::new(Arc::new(InMemoryTokenStore::default()));
    let overview = ShopOverview::new(metrics, session, fixed_clock());

    let outcome = overview.refresh(&[shop(1, "A")]).await;

    assert_eq!(outcome, Err(ActionError::NotAuthenticated));
}

#[tokio::test]
async fn expense_sub_fetch_uses_the_clock_date() {
    let mut clock = MockClock::new();
    let today = Local
        .with_ymd_and_hms(2024, 5, 17, 9, 30, 0)
        .single()
        .expect("valid local instant");
    clock.expect_local().returning(move || today);
    let mut metrics = MockShopMetricsQuery::new();
    metrics
        .expect_expense_total()
        .withf(|shop_id, sale_date| shop_id.get() == 4 && *sale_date == date(2024, 5, 17))
        .times(1)
        .returning(|_, _| Ok(Amount::new(12)));
    metrics
        .expect_latest_sale()
        .times(1)
        .returning(|_| Ok(Amount::new(30)));
    let overview = ShopOverview::new(
        Arc::new(metrics),
        signed_in(Role::Staff, &[]),
        Arc::new(clock),
    );

    overview.force_refresh(&[shop(4, "D")]).await.expect("fan-out");

    assert_eq!(
        overview.figures().get(&id(4)),
        Some(&ShopFigures {
            expense: Amount::new(12),
            sale: Amount::new(30),
        })
    );
}

#[rstest]
#[tokio::test]
async fn pinned_sale_date_overrides_the_clock(metrics: Arc<StubShopMetricsQuery>) {
    let overview = ShopOverview::new(
        Arc::clone(&metrics),
        signed_in(Role::Admin, &[]),
        fixed_clock(),
    )
    .with_sale_date(Some(date(2023, 12, 31)));

    overview.force_refresh(&[shop(1, "A")]).await.expect("fan-out");

    assert_eq!(metrics.requested_dates(), vec![date(2023, 12, 31)]);
}

#[rstest]
#[tokio::test]
async fn teardown_drops_the_figures(metrics: Arc<StubShopMetricsQuery>) {
    let overview = ShopOverview::new(metrics, signed_in(Role::Admin, &[]), fixed_clock());
    overview.force_refresh(&[shop(1, "A")]).await.expect("fan-out");

    overview.teardown();

    assert!(overview.figures().is_empty());
}
