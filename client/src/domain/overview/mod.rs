//! Shop overview: per-shop figures aggregated by a concurrent fan-out.
//!
//! For every shop visible to the current actor, two sub-fetches are issued
//! at once (expense total for the sale date, latest sale). Each completion is
//! merged into the [`AggregatedViewMap`] as it arrives. A failed sub-fetch
//! writes zero for its metric and is not retried.
//!
//! A run is replaced in full when the visible shop ids, the actor, or the
//! sale date change. Starting a run cancels the previous one so its late
//! completions are ignored.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use fanout::{FanOut, FanOutReport};
use mockable::Clock;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::ports::{RemoteError, ShopMetricsQuery};
use crate::domain::resources::Shop;
use crate::domain::{ActionError, ActionResult, Amount, EntityId, SessionContext, visibility};

mod view_map;

pub use view_map::{AggregatedViewMap, ShopFigures, ShopMetric};

/// Overview map keyed by shop id.
pub type ShopFiguresMap = AggregatedViewMap<EntityId, ShopFigures>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunFingerprint {
    parents: Vec<EntityId>,
    actor_epoch: u64,
    sale_date: NaiveDate,
}

struct ActiveRun {
    fingerprint: RunFingerprint,
    cancel: CancellationToken,
}

/// Aggregation engine behind the shop screen.
pub struct ShopOverview<Q> {
    metrics: Arc<Q>,
    session: SessionContext,
    clock: Arc<dyn Clock>,
    sale_date: Option<NaiveDate>,
    view: watch::Sender<ShopFiguresMap>,
    active: Mutex<Option<ActiveRun>>,
}

impl<Q: ShopMetricsQuery> ShopOverview<Q> {
    /// Create an empty overview. The sale date defaults to today according
    /// to `clock`.
    pub fn new(metrics: Arc<Q>, session: SessionContext, clock: Arc<dyn Clock>) -> Self {
        let (view, _) = watch::channel(ShopFiguresMap::default());
        Self {
            metrics,
            session,
            clock,
            sale_date: None,
            view,
            active: Mutex::new(None),
        }
    }

    /// Pin the sale date instead of following the clock.
    #[must_use]
    pub fn with_sale_date(mut self, sale_date: Option<NaiveDate>) -> Self {
        self.sale_date = sale_date;
        self
    }

    /// Date passed to the expense sub-fetch.
    pub fn sale_date(&self) -> NaiveDate {
        self.sale_date
            .unwrap_or_else(|| self.clock.local().date_naive())
    }

    /// Owned copy of the current figures.
    pub fn figures(&self) -> ShopFiguresMap {
        self.view.borrow().clone()
    }

    /// Observe every merged completion.
    pub fn subscribe(&self) -> watch::Receiver<ShopFiguresMap> {
        self.view.subscribe()
    }

    /// Re-run the fan-out when the visible shops, the actor, or the sale date
    /// changed since the last run.
    ///
    /// Returns `Ok(None)` when nothing changed.
    pub async fn refresh(&self, shops: &[Shop]) -> ActionResult<Option<FanOutReport>> {
        self.run(shops, false).await
    }

    /// Re-run the fan-out unconditionally.
    pub async fn force_refresh(&self, shops: &[Shop]) -> ActionResult<FanOutReport> {
        self.run(shops, true)
            .await?
            .ok_or(ActionError::Cancelled)
    }

    /// Cancel the active run and drop every figure.
    pub fn teardown(&self) {
        if let Some(run) = self.lock_active().take() {
            run.cancel.cancel();
        }
        self.view.send_modify(AggregatedViewMap::clear);
    }

    async fn run(&self, shops: &[Shop], force: bool) -> ActionResult<Option<FanOutReport>> {
        let actor = self.session.actor().ok_or(ActionError::NotAuthenticated)?;
        let parents: Vec<EntityId> = visibility::visible(shops, &actor)
            .iter()
            .map(|shop| shop.id)
            .collect();
        let sale_date = self.sale_date();
        let fingerprint = RunFingerprint {
            parents: parents.clone(),
            actor_epoch: self.session.actor_epoch(),
            sale_date,
        };

        let Some(cancel) = self.start_run(fingerprint, force) else {
            debug!("overview unchanged; fan-out skipped");
            return Ok(None);
        };

        self.view.send_modify(|view| view.align_keys(&parents));

        let mut batch: FanOut<'_, (EntityId, ShopMetric), Amount, RemoteError> = FanOut::new();
        for shop_id in &parents {
            batch.push(
                (*shop_id, ShopMetric::Expense),
                self.metrics.expense_total(*shop_id, sale_date),
            );
            batch.push((*shop_id, ShopMetric::Sale), self.metrics.latest_sale(*shop_id));
        }
        debug!(shops = parents.len(), issued = batch.len(), %sale_date, "overview fan-out started");

        let report = batch
            .run(&cancel, |(shop_id, metric), outcome| {
                let amount = outcome.unwrap_or_else(|error| {
                    warn!(%shop_id, metric = metric.as_str(), %error, "sub-fetch failed; using zero");
                    Amount::ZERO
                });
                self.view
                    .send_modify(|view| view.merge(shop_id, |figures| figures.set(metric, amount)));
            })
            .await;

        if report.cancelled {
            warn!(settled = report.settled, issued = report.issued, "overview fan-out cancelled");
            return Err(ActionError::Cancelled);
        }
        debug!(settled = report.settled, failed = report.failed, "overview fan-out finished");
        Ok(Some(report))
    }

    /// Install a new run unless the fingerprint is unchanged, cancelling the
    /// run it replaces.
    fn start_run(&self, fingerprint: RunFingerprint, force: bool) -> Option<CancellationToken> {
        let mut active = self.lock_active();
        if !force
            && active
                .as_ref()
                .is_some_and(|run| run.fingerprint == fingerprint)
        {
            return None;
        }
        let cancel = self.session.cancellation().child_token();
        if let Some(previous) = active.replace(ActiveRun {
            fingerprint,
            cancel: cancel.clone(),
        }) {
            previous.cancel.cancel();
        }
        Some(cancel)
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests;
