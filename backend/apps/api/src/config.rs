//! API configuration
//!
//! Loaded from the environment (after `.env`), with defaults for local
//! development.

use anyhow::Context;
use platform::rate_limit::SweepConfig;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
/// Upper bound for sweep settings (one year)
const MAX_SWEEP_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `API_BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `FRONTEND_ORIGINS`, comma separated
    pub frontend_origins: Vec<String>,
    /// `RATE_LIMIT_SWEEP_INTERVAL_SECS` / `RATE_LIMIT_SWEEP_MAX_AGE_SECS`
    pub sweep: SweepConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 31113)),
            frontend_origins: split_origins(DEFAULT_FRONTEND_ORIGINS),
            sweep: SweepConfig::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = lookup("API_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("API_BIND_ADDR must be a socket address")?;

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .map(|origins| split_origins(&origins))
            .unwrap_or(defaults.frontend_origins);

        let interval = secs_var(&lookup, "RATE_LIMIT_SWEEP_INTERVAL_SECS")?
            .unwrap_or(defaults.sweep.interval);
        let max_age = secs_var(&lookup, "RATE_LIMIT_SWEEP_MAX_AGE_SECS")?
            .unwrap_or(defaults.sweep.max_age);

        if interval.is_zero() {
            anyhow::bail!("RATE_LIMIT_SWEEP_INTERVAL_SECS must be greater than zero");
        }

        Ok(Self {
            bind_addr,
            frontend_origins,
            sweep: SweepConfig { interval, max_age },
        })
    }
}

fn secs_var(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> anyhow::Result<Option<Duration>> {
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{name} must be a whole number of seconds"))
                .and_then(|secs| {
                    if secs > MAX_SWEEP_SECS {
                        anyhow::bail!("{name} must be at most {MAX_SWEEP_SECS} seconds");
                    }
                    Ok(Duration::from_secs(secs))
                })
        })
        .transpose()
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}
