//! Store behaviour observed through the public driving ports.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use shopdesk::domain::overview::{ShopFigures, ShopOverview};
use shopdesk::domain::ports::{
    FixtureShopMetricsQuery, InMemoryTokenStore, ResourceDispatch, ResourceSelectors,
};
use shopdesk::domain::resources::{Expense, ExpenseDraft, ExpensePatch};
use shopdesk::domain::store::ExpenseStore;
use shopdesk::domain::{
    ActionError, Amount, EntityId, Role, SessionContext, SessionToken, StoreSettings,
};
use shopdesk::test_support::{
    FixedClock, GatewayCall, ScriptedResourceGateway, actor, id, shop,
};
use tokio_util::sync::CancellationToken;

type Gateway = ScriptedResourceGateway<Expense>;

struct Harness {
    gateway: Arc<Gateway>,
    session: SessionContext,
    store: Arc<ExpenseStore<Gateway>>,
}

#[fixture]
fn harness() -> Harness {
    let gateway = Arc::new(Gateway::new());
    let session = SessionContext::new(Arc::new(InMemoryTokenStore::default()));
    let store = Arc::new(ExpenseStore::new(
        Arc::clone(&gateway),
        session.clone(),
        StoreSettings::default(),
    ));
    Harness {
        gateway,
        session,
        store,
    }
}

fn expense(raw: u64, shop_id: u64, amount: i64) -> Expense {
    Expense {
        id: id(raw),
        shop_id: id(shop_id),
        user_id: id(1),
        amount: Amount::new(amount),
        message: format!("expense {raw}"),
    }
}

fn ids(expenses: &[Expense]) -> Vec<EntityId> {
    expenses.iter().map(|expense| expense.id).collect()
}

async fn load(harness: &Harness, expenses: Vec<Expense>) {
    harness.gateway.push_list(Ok(expenses));
    harness
        .store
        .fetch_list(&CancellationToken::new())
        .await
        .expect("expense list");
}

#[rstest]
#[case(Role::Manager, vec![id(2), id(5)])]
#[case(Role::Admin, vec![id(1), id(2), id(3), id(4), id(5)])]
#[case(Role::Staff, vec![id(1), id(2), id(3), id(4), id(5)])]
#[tokio::test]
async fn visible_items_follow_the_actor_role(
    harness: Harness,
    #[case] role: Role,
    #[case] expected: Vec<EntityId>,
) {
    let listed = (1..=5).map(|raw| expense(raw * 10, raw, 5)).collect();
    load(&harness, listed).await;
    let viewer = actor(7, role, &[2, 5]);

    let visible = harness.store.visible_items(&viewer);

    let shops: Vec<EntityId> = visible.iter().map(|expense| expense.shop_id).collect();
    assert_eq!(shops, expected);
    assert_eq!(harness.store.items().len(), 5);
}

#[rstest]
#[tokio::test]
async fn create_then_edit_keeps_ids_unique(harness: Harness) {
    load(&harness, vec![expense(1, 1, 10), expense(2, 1, 20)]).await;
    harness.gateway.push_entity(Ok(expense(3, 1, 30)));
    harness.gateway.push_entity(Ok(expense(3, 1, 35)));
    let cancel = CancellationToken::new();

    harness
        .store
        .create(
            ExpenseDraft {
                shop_id: id(1),
                user_id: id(1),
                amount: Amount::new(30),
                message: "float top-up".to_owned(),
            },
            &cancel,
        )
        .await
        .expect("create");
    harness
        .store
        .edit(
            id(3),
            ExpensePatch {
                amount: Some(Amount::new(35)),
                message: None,
            },
            &cancel,
        )
        .await
        .expect("edit");

    let items = harness.store.items();
    assert_eq!(ids(&items), vec![id(1), id(2), id(3)]);
    assert_eq!(items[2].amount, Amount::new(35));
    assert_eq!(
        harness.gateway.calls(),
        vec![GatewayCall::List, GatewayCall::Create, GatewayCall::Edit(id(3))]
    );
}

#[rstest]
#[tokio::test]
async fn sign_out_discards_in_flight_fetches(harness: Harness) {
    load(&harness, vec![expense(1, 1, 10)]).await;
    let reply = harness.gateway.defer_list();
    let store = Arc::clone(&harness.store);
    let pending =
        tokio::spawn(async move { store.fetch_list(&CancellationToken::new()).await });
    while harness.gateway.calls().len() < 2 {
        tokio::task::yield_now().await;
    }

    harness.session.teardown();
    reply
        .send(Ok(vec![expense(9, 1, 90)]))
        .expect("store should still await the reply");
    let outcome = pending.await.expect("dispatch task");

    assert!(matches!(outcome, Err(ActionError::Cancelled)));
    assert_eq!(ids(&harness.store.items()), vec![id(1)]);
    assert!(harness.store.error().is_none());
}

#[rstest]
#[tokio::test]
async fn fixture_metrics_give_every_visible_shop_zero_figures() {
    let session = SessionContext::new(Arc::new(InMemoryTokenStore::default()));
    session.establish(SessionToken::new("tok"), actor(4, Role::Manager, &[1, 3]));
    let noon = Utc
        .with_ymd_and_hms(2024, 3, 9, 12, 0, 0)
        .single()
        .expect("valid instant");
    let overview = ShopOverview::new(
        Arc::new(FixtureShopMetricsQuery),
        session,
        Arc::new(FixedClock(noon)),
    );

    let report = overview
        .force_refresh(&[shop(1, "North"), shop(2, "South"), shop(3, "East")])
        .await
        .expect("fan-out");

    assert_eq!(report.issued, 4);
    assert_eq!(report.failed, 0);
    let figures = overview.figures();
    let keys: Vec<EntityId> = figures.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys, vec![id(1), id(3)]);
    assert!(
        figures
            .iter()
            .all(|(_, value)| *value == ShopFigures::default())
    );
}
