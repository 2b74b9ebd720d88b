//! `shopdesk` entry-point: loads settings, signs in, runs one screen.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use shopdesk::inbound::cli::{Cli, CliRunner};
use shopdesk::{ClientSettings, ShopdeskApp};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let mut settings = ClientSettings::load_without_cli().wrap_err("load settings")?;
    if let Some(date) = cli.command.sale_date() {
        settings.sale_date = Some(date.format("%Y-%m-%d").to_string());
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    let _runtime_guard = runtime.enter();
    let app = ShopdeskApp::from_settings(&settings, Arc::new(DefaultClock))
        .wrap_err("configure client")?;
    let runner = CliRunner::new(&app);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    runtime
        .block_on(runner.run(&cli, &mut out))
        .map_err(|error| eyre!(error))
}
