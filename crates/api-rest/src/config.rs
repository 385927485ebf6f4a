//! REST server configuration.
//!
//! Resolved once at startup from environment variables. Blank values are treated as unset.

use crate::rate_limit::RateLimitConfig;
use anyhow::Context;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Server configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: String,
    pub public_dir: PathBuf,
    pub rate_limit: RateLimitConfig,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Environment Variables
    /// - `CONFESS_REST_ADDR`: full bind address, overrides `PORT`
    /// - `PORT`: port to bind on all interfaces (default: 3000)
    /// - `PUBLIC_DIR`: directory of mini-app assets (default: "public")
    /// - `RATE_LIMIT_MAX`: submissions allowed per client per window (default: 30)
    /// - `RATE_LIMIT_WINDOW_SECS`: rate limit window in seconds (default: 900)
    /// - `TRUST_PROXY`: take the client address from `X-Forwarded-For` (default: false)
    ///
    /// # Errors
    /// Returns an error if any variable is present but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let addr = match get("CONFESS_REST_ADDR") {
            Some(addr) => addr,
            None => {
                let port = match get("PORT") {
                    Some(port) => port
                        .trim()
                        .parse::<u16>()
                        .with_context(|| format!("invalid PORT: {port}"))?,
                    None => DEFAULT_PORT,
                };
                format!("0.0.0.0:{port}")
            }
        };

        let public_dir = get("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR));

        let defaults = RateLimitConfig::default();

        let max_requests = match get("RATE_LIMIT_MAX") {
            Some(value) => value
                .trim()
                .parse::<NonZeroU32>()
                .with_context(|| format!("RATE_LIMIT_MAX must be a positive integer: {value}"))?,
            None => defaults.max_requests,
        };

        let window = match get("RATE_LIMIT_WINDOW_SECS") {
            Some(value) => {
                let secs = value.trim().parse::<u64>().with_context(|| {
                    format!("RATE_LIMIT_WINDOW_SECS must be a positive integer: {value}")
                })?;
                if secs == 0 {
                    anyhow::bail!("RATE_LIMIT_WINDOW_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => defaults.window,
        };

        let trust_proxy = match get("TRUST_PROXY") {
            Some(value) => parse_flag(&value)
                .with_context(|| format!("TRUST_PROXY must be true or false: {value}"))?,
            None => defaults.trust_proxy,
        };

        Ok(Self {
            addr,
            public_dir,
            rate_limit: RateLimitConfig {
                max_requests,
                window,
                trust_proxy,
            },
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
