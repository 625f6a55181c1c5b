//! Runtime configuration: endpoint, credentials, timing.
//!
//! Values come from `QUICKRESEARCH_*` environment variables; the CLI layers
//! its flags on top with [`Config::override_with`].

use std::num::NonZeroUsize;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::consts::{DEFAULT_BASE_URL, DEFAULT_FETCH_DELAY, DEFAULT_TIMEOUT};

pub const ENV_TOKEN: &str = "QUICKRESEARCH_TOKEN";
pub const ENV_APP_ID: &str = "QUICKRESEARCH_APP_ID";
pub const ENV_BASE_URL: &str = "QUICKRESEARCH_BASE_URL";
pub const ENV_FETCH_DELAY_MS: &str = "QUICKRESEARCH_FETCH_DELAY_MS";
pub const ENV_LOG_CAPACITY: &str = "QUICKRESEARCH_LOG_CAPACITY";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub token: String,
    pub app_id: String,
    pub fetch_delay: Duration,
    /// Newest entries kept in the audit log; `None` keeps everything.
    pub log_capacity: Option<NonZeroUsize>,
    pub timeout: Duration,
}

/// Values supplied on the command line. `None` leaves the env value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub app_id: Option<String>,
    pub fetch_delay_ms: Option<u64>,
    pub log_capacity: Option<NonZeroUsize>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Defaults for everything except the credentials.
    pub fn new(token: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            app_id: app_id.into(),
            fetch_delay: DEFAULT_FETCH_DELAY,
            log_capacity: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build from the process environment, then apply CLI overrides.
    pub fn load(overrides: Overrides) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Build from an arbitrary key lookup. Overrides win over lookup values.
    pub fn from_lookup<F>(lookup: F, overrides: Overrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = overrides.token.clone().or_else(|| get(ENV_TOKEN));
        let app_id = overrides.app_id.clone().or_else(|| get(ENV_APP_ID));
        let (Some(token), Some(app_id)) = (token, app_id) else {
            bail!("missing credentials: set {ENV_TOKEN} and {ENV_APP_ID} (or pass --token / --app-id)");
        };

        let mut config = Self::new(token, app_id);

        if let Some(url) = get(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(ms) = get(ENV_FETCH_DELAY_MS) {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("invalid {ENV_FETCH_DELAY_MS}: {ms:?}"))?;
            config.fetch_delay = Duration::from_millis(ms);
        }
        if let Some(cap) = get(ENV_LOG_CAPACITY) {
            let cap: NonZeroUsize = cap
                .trim()
                .parse()
                .with_context(|| format!("invalid {ENV_LOG_CAPACITY} (must be at least 1): {cap:?}"))?;
            config.log_capacity = Some(cap);
        }

        config.override_with(overrides);
        Ok(config)
    }

    /// Apply CLI values on top of this config.
    pub fn override_with(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.base_url {
            self.base_url = url;
        }
        if let Some(token) = overrides.token {
            self.token = token;
        }
        if let Some(app_id) = overrides.app_id {
            self.app_id = app_id;
        }
        if let Some(ms) = overrides.fetch_delay_ms {
            self.fetch_delay = Duration::from_millis(ms);
        }
        if let Some(cap) = overrides.log_capacity {
            self.log_capacity = Some(cap);
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
    }
}
