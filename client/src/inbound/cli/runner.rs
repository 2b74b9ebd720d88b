//! Executes one parsed command against the application.

use std::io::Write;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::render::{overview_rows, write_json};
use super::{Cli, Command};
use crate::app::ShopdeskApp;
use crate::domain::accounting::{AccountingTarget, AccountingTree, DateRange, DateRangeError};
use crate::domain::ports::{ResourceDispatch, ResourceSelectors};
use crate::domain::resources::{ExpenseDraft, Shop};
use crate::domain::{
    ActionError, Actor, Amount, EntityId, LoginCredentials, LoginValidationError, Role,
};

/// Failures reported to the user by the command line.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Credentials were rejected before reaching the service.
    #[error("invalid credentials: {0}")]
    Credentials(#[from] LoginValidationError),
    /// A dispatch failed; `message` is the store's error, shown once.
    #[error("{message}")]
    Action {
        /// Display message.
        message: String,
    },
    /// The chosen date range is inverted.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),
    /// The leaf is not part of this actor's tree.
    #[error("accounting leaf {0:?} is not available to this actor")]
    UnknownLeaf(AccountingTarget),
    /// A leaf was chosen before both dates.
    #[error("choose both --from and --to before selecting a leaf")]
    IncompleteRange,
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    /// Output could not be encoded.
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Prefer the acknowledged store message over the dispatch's own text.
    fn from_action(error: &ActionError, acknowledged: Option<String>) -> Self {
        Self::Action {
            message: acknowledged.unwrap_or_else(|| error.user_message()),
        }
    }
}

/// Runs commands against one [`ShopdeskApp`].
pub struct CliRunner<'a> {
    app: &'a ShopdeskApp,
    cancel: CancellationToken,
}

impl<'a> CliRunner<'a> {
    /// Create a runner for `app`.
    pub fn new(app: &'a ShopdeskApp) -> Self {
        Self {
            app,
            cancel: CancellationToken::new(),
        }
    }

    /// Token cancelling every dispatch issued by this runner.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Sign in, run `cli.command`, render its output, and sign out.
    ///
    /// # Errors
    ///
    /// Returns the first failure; the session is torn down either way.
    pub async fn run(&self, cli: &Cli, out: &mut dyn Write) -> Result<(), CliError> {
        let credentials = LoginCredentials::try_from_parts(&cli.email, &cli.password)?;
        let sessions = self.app.session_store();
        let actor = sessions
            .login(&credentials, &self.cancel)
            .await
            .map_err(|error| CliError::from_action(&error, sessions.acknowledge_error()))?;

        let outcome = self.execute(&cli.command, &actor, out).await;
        self.app.logout();
        outcome
    }

    async fn execute(
        &self,
        command: &Command,
        actor: &Actor,
        out: &mut dyn Write,
    ) -> Result<(), CliError> {
        debug!(?command, "running command");
        match command {
            Command::Login => write_json(out, actor),
            Command::Shops => {
                self.load_shops().await?;
                write_json(out, &self.app.shops().visible_items(actor))
            }
            Command::Overview { .. } => self.overview(actor, out).await,
            Command::Users { role } => self.users(*role, out).await,
            Command::Expense {
                shop,
                amount,
                message,
            } => {
                self.record_expense(actor, *shop, *amount, message, out)
                    .await
            }
            Command::Accounting { from, to, leaf } => {
                let mut range = DateRange::default();
                if let Some(start) = from {
                    range.set_from(*start)?;
                }
                if let Some(end) = to {
                    range.set_to(*end)?;
                }
                self.accounting(actor, range, *leaf, out).await
            }
        }
    }

    async fn load_shops(&self) -> Result<Vec<Shop>, CliError> {
        let shops = self.app.shops();
        shops
            .fetch_list(&self.cancel)
            .await
            .map_err(|error| CliError::from_action(&error, shops.acknowledge_error()))
    }

    async fn overview(&self, actor: &Actor, out: &mut dyn Write) -> Result<(), CliError> {
        self.load_shops().await?;
        let overview = self.app.overview();
        overview
            .refresh(&self.app.shops().items())
            .await
            .map_err(|error| CliError::from_action(&error, None))?;
        let visible = self.app.shops().visible_items(actor);
        write_json(out, &overview_rows(&visible, &overview.figures()))
    }

    async fn users(&self, role: Option<Role>, out: &mut dyn Write) -> Result<(), CliError> {
        let sessions = self.app.session_store();
        let actors = sessions
            .list_actors(role, &self.cancel)
            .await
            .map_err(|error| CliError::from_action(&error, sessions.acknowledge_error()))?;
        write_json(out, &actors)
    }

    async fn record_expense(
        &self,
        actor: &Actor,
        shop_id: EntityId,
        amount: Amount,
        message: &str,
        out: &mut dyn Write,
    ) -> Result<(), CliError> {
        let expenses = self.app.expenses();
        let draft = ExpenseDraft {
            shop_id,
            user_id: actor.id(),
            amount,
            message: message.to_owned(),
        };
        let created = expenses
            .create(draft, &self.cancel)
            .await
            .map_err(|error| CliError::from_action(&error, expenses.acknowledge_error()))?;
        write_json(out, &created)
    }

    async fn accounting(
        &self,
        actor: &Actor,
        range: DateRange,
        leaf: Option<AccountingTarget>,
        out: &mut dyn Write,
    ) -> Result<(), CliError> {
        let shops = self.load_shops().await?;
        let tree = AccountingTree::build(&shops, actor);
        let Some(target) = leaf else {
            return write_json(out, &tree);
        };
        let chosen = tree.leaf(target).ok_or(CliError::UnknownLeaf(target))?;
        let query = range.select(chosen).ok_or(CliError::IncompleteRange)?;
        write_json(out, &query)
    }
}
