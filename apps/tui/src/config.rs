use crate::coverage::{ReasonTable, ThresholdTable};
use crate::domain::ThresholdScheme;
use crate::route::RouteDefaults;
use color_eyre::eyre::{eyre, WrapErr};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://namibia.api.mspray.onalabs.org";
pub const DEFAULT_DISTRICT: &str = "Chienge";
pub const DEFAULT_LOG_FILE: &str = "spray-dashboard.log";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_url: String,
    pub route: RouteDefaults,
    pub initial_fragment: Option<String>,
    pub spray_date: Option<String>,
    pub scheme: ThresholdScheme,
    pub thresholds: ThresholdTable,
    pub custom_thresholds: bool,
    pub reasons: ReasonTable,
    pub request_timeout: Duration,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            route: RouteDefaults {
                district: DEFAULT_DISTRICT.to_string(),
                target_area: None,
            },
            initial_fragment: None,
            spray_date: None,
            scheme: ThresholdScheme::default(),
            thresholds: ThresholdTable::default(),
            custom_thresholds: false,
            reasons: ReasonTable::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            debug: false,
        }
    }
}

impl DashboardConfig {
    /// Builds the configuration from a variable lookup, so tests can feed
    /// values without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> color_eyre::eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let scheme = match var("COVERAGE_SCHEME") {
            Some(value) => ThresholdScheme::parse(&value)
                .ok_or_else(|| eyre!("Unknown COVERAGE_SCHEME: {value}"))?,
            None => defaults.scheme,
        };

        let (thresholds, custom_thresholds) = match var("COVERAGE_THRESHOLDS") {
            Some(value) => (
                ThresholdTable::parse(&value).wrap_err("Invalid COVERAGE_THRESHOLDS")?,
                true,
            ),
            None => (ThresholdTable::for_scheme(scheme), false),
        };

        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(
                value
                    .parse()
                    .wrap_err_with(|| format!("Invalid REQUEST_TIMEOUT_SECS: {value}"))?,
            ),
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_url: var("SPRAY_API_URL").unwrap_or(defaults.api_url),
            route: RouteDefaults {
                district: var("DEFAULT_DISTRICT").unwrap_or(defaults.route.district),
                target_area: var("DEFAULT_TARGET_AREA"),
            },
            initial_fragment: var("SPRAY_ROUTE"),
            spray_date: var("SPRAY_DATE"),
            scheme,
            thresholds,
            custom_thresholds,
            reasons: var("REASON_CODES").map_or(defaults.reasons, |v| ReasonTable::parse(&v)),
            request_timeout,
            log_file: var("SPRAY_LOG_FILE").map_or(defaults.log_file, PathBuf::from),
            debug: var("DEBUG").is_some_and(|v| v != "0" && !v.eq_ignore_ascii_case("false")),
        })
    }

    /// Switches scheme. An explicitly configured threshold table stays put.
    pub fn set_scheme(&mut self, scheme: ThresholdScheme) {
        self.scheme = scheme;
        if !self.custom_thresholds {
            self.thresholds = ThresholdTable::for_scheme(scheme);
        }
    }
}

/// Initializes the application configuration from `.env` and the process
/// environment.
pub fn init_app_config() -> color_eyre::eyre::Result<DashboardConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    DashboardConfig::from_lookup(|key| env::var(key).ok())
}
