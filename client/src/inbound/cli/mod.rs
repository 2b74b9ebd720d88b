//! Command-line presentation adapter.
//!
//! Every command signs in first, performs one screen's worth of dispatches,
//! renders the resulting selectors as JSON, and signs out again.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::accounting::{AccountingTarget, OverallCategory, WarehouseLedger};
use crate::domain::{Amount, EntityId, Role};

mod render;
mod runner;

pub use runner::{CliError, CliRunner};

/// `shopdesk` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shopdesk",
    about = "Inspect and update Shopdesk retail data from the command line",
    version
)]
pub struct Cli {
    /// Account email.
    #[arg(long, env = "SHOPDESK_EMAIL", global = true, default_value = "")]
    pub email: String,
    /// Account password.
    #[arg(
        long,
        env = "SHOPDESK_PASSWORD",
        global = true,
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,
    /// Screen to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Screens available from the command line.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and print the actor.
    Login,
    /// List the shops visible to the actor.
    Shops,
    /// Print expense and sale figures per visible shop.
    Overview {
        /// Sale date for expense totals (`YYYY-MM-DD`); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List actors, optionally filtered by role.
    Users {
        /// Role filter: admin, manager, or staff.
        #[arg(long)]
        role: Option<Role>,
    },
    /// Record an expense against a shop.
    Expense {
        /// Shop id.
        #[arg(long)]
        shop: EntityId,
        /// Amount paid, e.g. `12.75`.
        #[arg(long, allow_negative_numbers = true)]
        amount: Amount,
        /// Reason for the expense.
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Print the accounting tree, or resolve one leaf for a date range.
    Accounting {
        /// Inclusive start date.
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Inclusive end date.
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Leaf as `shop:<id>`, `warehouse:<central|supplier>`, or
        /// `overall:<shops|warehouses>`.
        #[arg(long, value_parser = parse_leaf)]
        leaf: Option<AccountingTarget>,
    },
}

impl Command {
    /// Sale date pinned by the command, if any.
    pub fn sale_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Overview { date } => *date,
            _ => None,
        }
    }
}

fn parse_leaf(raw: &str) -> Result<AccountingTarget, String> {
    let (branch, key) = raw
        .split_once(':')
        .ok_or_else(|| format!("leaf {raw:?} must look like branch:key"))?;
    match (branch.trim(), key.trim()) {
        ("shop", id) => id
            .parse::<EntityId>()
            .map(AccountingTarget::Shop)
            .map_err(|error| error.to_string()),
        ("warehouse", ledger) => WarehouseLedger::ALL
            .into_iter()
            .find(|candidate| candidate.key() == ledger)
            .map(AccountingTarget::Warehouse)
            .ok_or_else(|| format!("unknown warehouse ledger {ledger:?}")),
        ("overall", category) => OverallCategory::ALL
            .into_iter()
            .find(|candidate| candidate.key() == category)
            .map(AccountingTarget::Overall)
            .ok_or_else(|| format!("unknown overall category {category:?}")),
        (other, _) => Err(format!("unknown accounting branch {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("shopdesk").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[rstest]
    fn parses_expense_arguments() {
        let cli = parse(&[
            "--email", "ana@example.com", "--password", "pw", "expense", "--shop", "3",
            "--amount", "-15.25", "--message", "Refund",
        ]);

        assert_eq!(cli.email, "ana@example.com");
        match cli.command {
            Command::Expense {
                shop,
                amount,
                message,
            } => {
                assert_eq!(shop.get(), 3);
                assert_eq!(amount, "-15.25".parse::<Amount>().expect("amount"));
                assert_eq!(message, "Refund");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[rstest]
    fn overview_date_is_exposed() {
        let cli = parse(&["overview", "--date", "2024-03-09"]);
        assert_eq!(cli.command.sale_date(), NaiveDate::from_ymd_opt(2024, 3, 9));
    }

    #[rstest]
    fn role_filter_parses_case_insensitively() {
        let cli = parse(&["users", "--role", "Manager"]);
        assert!(matches!(
            cli.command,
            Command::Users {
                role: Some(Role::Manager)
            }
        ));
    }

    #[rstest]
    #[case("shop:4", AccountingTarget::Shop(EntityId::new(4).expect("id")))]
    #[case("warehouse:supplier", AccountingTarget::Warehouse(WarehouseLedger::Supplier))]
    #[case("overall:warehouses", AccountingTarget::Overall(OverallCategory::Warehouses))]
    fn parses_accounting_leaves(#[case] raw: &str, #[case] expected: AccountingTarget) {
        assert_eq!(parse_leaf(raw), Ok(expected));
    }

    #[rstest]
    #[case("shop")]
    #[case("shop:zero")]
    #[case("warehouse:north")]
    #[case("ledger:central")]
    fn rejects_malformed_leaves(#[case] raw: &str) {
        assert!(parse_leaf(raw).is_err());
    }
}
