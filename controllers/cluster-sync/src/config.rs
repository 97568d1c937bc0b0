//! Controller configuration loaded from environment variables.

use crate::backoff::{ItemBackoff, RequeuePolicy, TokenBucket};
use crate::error::ControllerError;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_NETBOX_URL: &str = "http://netbox.netbox:80";
const DEFAULT_EXPECTED_PLATFORM: &str = "vmware-esxi";
const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 300;
const DEFAULT_RATE_LIMIT_BURST: u32 = 100;
const DEFAULT_RATE_LIMIT_QPS: f64 = 10.0;
const DEFAULT_BACKOFF_BASE_MS: u64 = 5;
const DEFAULT_BACKOFF_MAX_SECS: u64 = 1000;

/// Runtime configuration, built once at startup and handed to the controller
#[derive(Clone)]
pub struct Config {
    pub netbox_url: String,
    pub netbox_token: String,
    /// `None` watches every namespace
    pub namespace: Option<String>,
    pub expected_platform: String,
    /// Restricts listed devices to this role when set
    pub device_role: Option<String>,
    pub reconcile_interval: Duration,
    pub rate_limit_burst: u32,
    pub rate_limit_qps: f64,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    pub dry_run: bool,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let netbox_token = get("NETBOX_TOKEN").ok_or_else(|| {
            ControllerError::InvalidConfig("NETBOX_TOKEN environment variable is required".to_string())
        })?;

        let reconcile_interval = Duration::from_secs(parse_or(
            &get,
            "RECONCILE_INTERVAL_SECS",
            DEFAULT_RECONCILE_INTERVAL_SECS,
        )?);
        if reconcile_interval.is_zero() {
            return Err(ControllerError::InvalidConfig(
                "RECONCILE_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let rate_limit_burst = parse_or(&get, "RATE_LIMIT_BURST", DEFAULT_RATE_LIMIT_BURST)?;
        if rate_limit_burst == 0 {
            return Err(ControllerError::InvalidConfig(
                "RATE_LIMIT_BURST must be at least 1".to_string(),
            ));
        }

        let rate_limit_qps = parse_or(&get, "RATE_LIMIT_QPS", DEFAULT_RATE_LIMIT_QPS)?;
        if !rate_limit_qps.is_finite() || rate_limit_qps <= 0.0 {
            return Err(ControllerError::InvalidConfig(format!(
                "RATE_LIMIT_QPS must be a positive number, got {}",
                rate_limit_qps
            )));
        }

        let backoff_base = Duration::from_millis(parse_or(&get, "BACKOFF_BASE_MS", DEFAULT_BACKOFF_BASE_MS)?);
        let backoff_max = Duration::from_secs(parse_or(&get, "BACKOFF_MAX_SECS", DEFAULT_BACKOFF_MAX_SECS)?);
        if backoff_base.is_zero() || backoff_base > backoff_max {
            return Err(ControllerError::InvalidConfig(format!(
                "backoff base ({:?}) must be non-zero and not exceed backoff max ({:?})",
                backoff_base, backoff_max
            )));
        }

        let dry_run = match get("DRY_RUN").map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("false") | Some("0") | Some("no") => false,
            Some("true") | Some("1") | Some("yes") => true,
            Some(other) => {
                return Err(ControllerError::InvalidConfig(format!(
                    "DRY_RUN must be true or false, got '{}'",
                    other
                )));
            }
        };

        Ok(Self {
            netbox_url: get("NETBOX_URL").unwrap_or_else(|| DEFAULT_NETBOX_URL.to_string()),
            netbox_token,
            namespace: get("WATCH_NAMESPACE"),
            expected_platform: get("EXPECTED_PLATFORM").unwrap_or_else(|| DEFAULT_EXPECTED_PLATFORM.to_string()),
            device_role: get("DEVICE_ROLE"),
            reconcile_interval,
            rate_limit_burst,
            rate_limit_qps,
            backoff_base,
            backoff_max,
            dry_run,
        })
    }

    /// Requeue policy for failing resources
    pub fn requeue_policy(&self) -> RequeuePolicy {
        RequeuePolicy::new(
            ItemBackoff::new(self.backoff_base, self.backoff_max),
            TokenBucket::new(self.rate_limit_burst, self.rate_limit_qps),
        )
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ControllerError>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e| {
            ControllerError::InvalidConfig(format!("{} has invalid value '{}': {}", key, raw, e))
        }),
    }
}

// Keeps the token out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("netbox_url", &self.netbox_url)
            .field("netbox_token", &"<redacted>")
            .field("namespace", &self.namespace)
            .field("expected_platform", &self.expected_platform)
            .field("device_role", &self.device_role)
            .field("reconcile_interval", &self.reconcile_interval)
            .field("rate_limit_burst", &self.rate_limit_burst)
            .field("rate_limit_qps", &self.rate_limit_qps)
            .field("backoff_base", &self.backoff_base)
            .field("backoff_max", &self.backoff_max)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
