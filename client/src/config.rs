//! Client configuration loaded via OrthoConfig.
//!
//! Values come from configuration files and `SHOPDESK_*` environment
//! variables. Command-line arguments are parsed separately by the CLI.

use std::ffi::OsString;
use std::time::Duration;

use chrono::NaiveDate;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{FailureMode, MutationOrdering, StoreSettings};

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading or interpreting settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The configuration sources could not be merged.
    #[error("failed to load configuration: {0}")]
    Load(String),
    /// `sale_date` was not an ISO-8601 calendar date.
    #[error("invalid sale_date {value:?}: {reason}")]
    InvalidSaleDate {
        /// Configured text.
        value: String,
        /// Parser detail.
        reason: String,
    },
    /// `request_timeout_secs` was zero.
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Settings for the remote service and store behaviour.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHOPDESK")]
pub struct ClientSettings {
    /// Base URL of the remote data service.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Keep failed actions in the `failed` status instead of returning to
    /// `idle`.
    #[ortho_config(default = false)]
    pub retain_failed_status: bool,
    /// Discard completions older than one already applied to the same entity.
    #[ortho_config(default = false)]
    pub reject_stale_mutations: bool,
    /// Fixed sale date for the shop overview (`YYYY-MM-DD`).
    pub sale_date: Option<String>,
}

impl ClientSettings {
    /// Load from files and the environment only.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when a source cannot be read or merged.
    pub fn load_without_cli() -> Result<Self, SettingsError> {
        Self::load_from_iter([OsString::from("shopdesk")])
            .map_err(|error| SettingsError::Load(error.to_string()))
    }

    /// Configured base URL, falling back to the local default.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero timeout.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
        {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Store behaviour switches.
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            failure_mode: if self.retain_failed_status {
                FailureMode::Retain
            } else {
                FailureMode::ResetToIdle
            },
            ordering: if self.reject_stale_mutations {
                MutationOrdering::RejectStale
            } else {
                MutationOrdering::LastResolvedWins
            },
        }
    }

    /// Parsed sale date override.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidSaleDate`] when the value is not a
    /// `YYYY-MM-DD` date.
    pub fn sale_date(&self) -> Result<Option<NaiveDate>, SettingsError> {
        self.sale_date
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|error| {
                    SettingsError::InvalidSaleDate {
                        value: raw.to_owned(),
                        reason: error.to_string(),
                    }
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 5] = [
        "SHOPDESK_BASE_URL",
        "SHOPDESK_REQUEST_TIMEOUT_SECS",
        "SHOPDESK_RETAIN_FAILED_STATUS",
        "SHOPDESK_REJECT_STALE_MUTATIONS",
        "SHOPDESK_SALE_DATE",
    ];

    fn cleared_except(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = ClientSettings::load_without_cli().expect("config should load");

        assert_eq!(settings.base_url(), DEFAULT_BASE_URL);
        assert_eq!(
            settings.request_timeout(),
            Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        );
        assert_eq!(settings.store_settings(), StoreSettings::default());
        assert_eq!(settings.sale_date(), Ok(None));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("SHOPDESK_BASE_URL", "https://shops.example.com/api"),
            ("SHOPDESK_REQUEST_TIMEOUT_SECS", "5"),
            ("SHOPDESK_RETAIN_FAILED_STATUS", "true"),
            ("SHOPDESK_REJECT_STALE_MUTATIONS", "true"),
            ("SHOPDESK_SALE_DATE", "2024-02-29"),
        ]));

        let settings = ClientSettings::load_without_cli().expect("config should load");

        assert_eq!(settings.base_url(), "https://shops.example.com/api");
        assert_eq!(settings.request_timeout(), Ok(Duration::from_secs(5)));
        assert_eq!(
            settings.store_settings(),
            StoreSettings {
                failure_mode: FailureMode::Retain,
                ordering: MutationOrdering::RejectStale,
            }
        );
        assert_eq!(settings.sale_date(), Ok(NaiveDate::from_ymd_opt(2024, 2, 29)));
    }

    #[rstest]
    #[case("29/02/2024")]
    #[case("2024-02-30")]
    fn malformed_sale_dates_are_rejected(#[case] raw: &str) {
        let _guard = lock_env(cleared_except(&[("SHOPDESK_SALE_DATE", raw)]));

        let settings = ClientSettings::load_without_cli().expect("config should load");

        assert!(matches!(
            settings.sale_date(),
            Err(SettingsError::InvalidSaleDate { .. })
        ));
    }

    #[rstest]
    fn zero_timeout_is_rejected() {
        let _guard = lock_env(cleared_except(&[("SHOPDESK_REQUEST_TIMEOUT_SECS", "0")]));

        let settings = ClientSettings::load_without_cli().expect("config should load");

        assert_eq!(settings.request_timeout(), Err(SettingsError::ZeroTimeout));
    }
}
