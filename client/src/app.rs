//! Composition root: wires settings, the session context, the HTTP adapter,
//! and every store.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::config::{ClientSettings, SettingsError};
use crate::domain::overview::ShopOverview;
use crate::domain::ports::{InMemoryTokenStore, TokenStore};
use crate::domain::store::{
    AttendanceStore, ExpenseStore, SaleSheetStore, ShopStore, WarehousePaymentStore,
};
use crate::domain::{SessionContext, SessionStore};
use crate::outbound::http::{HttpRemote, HttpRemoteBuildError};

/// Failures while assembling the application.
#[derive(Debug, thiserror::Error)]
pub enum AppBuildError {
    /// Settings were present but unusable.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The HTTP adapter could not be built.
    #[error(transparent)]
    Remote(#[from] HttpRemoteBuildError),
}

/// Every store of one client session, sharing one [`SessionContext`].
pub struct ShopdeskApp {
    session: SessionContext,
    session_store: SessionStore<HttpRemote>,
    shops: ShopStore<HttpRemote>,
    expenses: ExpenseStore<HttpRemote>,
    warehouse_payments: WarehousePaymentStore<HttpRemote>,
    attendance: AttendanceStore<HttpRemote>,
    sale_sheets: SaleSheetStore<HttpRemote>,
    overview: ShopOverview<HttpRemote>,
}

impl ShopdeskApp {
    /// Build the application with a process-local token store.
    ///
    /// # Errors
    ///
    /// Returns an error when a setting is invalid or the HTTP client cannot
    /// be built.
    pub fn from_settings(
        settings: &ClientSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppBuildError> {
        Self::with_token_store(settings, clock, Arc::new(InMemoryTokenStore::default()))
    }

    /// Build the application around an existing token store.
    ///
    /// # Errors
    ///
    /// Returns an error when a setting is invalid or the HTTP client cannot
    /// be built.
    pub fn with_token_store(
        settings: &ClientSettings,
        clock: Arc<dyn Clock>,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, AppBuildError> {
        let store_settings = settings.store_settings();
        let sale_date = settings.sale_date()?;
        let remote = Arc::new(HttpRemote::new(
            settings.base_url(),
            settings.request_timeout()?,
            Arc::clone(&tokens),
        )?);
        let session = SessionContext::new(tokens);
        info!(base_url = %remote.base_url(), "client configured");

        Ok(Self {
            session_store: SessionStore::new(
                Arc::clone(&remote),
                session.clone(),
                store_settings.failure_mode,
            ),
            shops: ShopStore::new(Arc::clone(&remote), session.clone(), store_settings),
            expenses: ExpenseStore::new(Arc::clone(&remote), session.clone(), store_settings),
            warehouse_payments: WarehousePaymentStore::new(
                Arc::clone(&remote),
                session.clone(),
                store_settings,
            ),
            attendance: AttendanceStore::new(Arc::clone(&remote), session.clone(), store_settings),
            sale_sheets: SaleSheetStore::new(Arc::clone(&remote), session.clone(), store_settings),
            overview: ShopOverview::new(remote, session.clone(), clock).with_sale_date(sale_date),
            session,
        })
    }

    /// Shared session handle.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Login, profile, and actor directory.
    pub fn session_store(&self) -> &SessionStore<HttpRemote> {
        &self.session_store
    }

    /// Shop store.
    pub fn shops(&self) -> &ShopStore<HttpRemote> {
        &self.shops
    }

    /// Expense store.
    pub fn expenses(&self) -> &ExpenseStore<HttpRemote> {
        &self.expenses
    }

    /// Warehouse payment store.
    pub fn warehouse_payments(&self) -> &WarehousePaymentStore<HttpRemote> {
        &self.warehouse_payments
    }

    /// Attendance store.
    pub fn attendance(&self) -> &AttendanceStore<HttpRemote> {
        &self.attendance
    }

    /// Sale sheet store.
    pub fn sale_sheets(&self) -> &SaleSheetStore<HttpRemote> {
        &self.sale_sheets
    }

    /// Shop overview aggregation.
    pub fn overview(&self) -> &ShopOverview<HttpRemote> {
        &self.overview
    }

    /// Tear the session down: cancel in-flight work, drop derived views,
    /// reset every store, and forget the actor and token.
    pub fn logout(&self) {
        self.overview.teardown();
        self.shops.reset();
        self.expenses.reset();
        self.warehouse_payments.reset();
        self.attendance.reset();
        self.sale_sheets.reset();
        self.session_store.logout();
    }
}
