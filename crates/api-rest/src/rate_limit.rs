//! Per-client rate limiting for the submission endpoint.
//!
//! Uses a `governor` keyed token bucket: each client address may burst up to `max_requests`
//! submissions, and the bucket refills evenly over `window`.

use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{clock::Clock, clock::DefaultClock, DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Requests allowed per client inside one window.
    pub max_requests: NonZeroU32,
    pub window: Duration,
    /// Trust the first `X-Forwarded-For` entry as the client address.
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: NonZeroU32::new(30).unwrap_or(NonZeroU32::MIN),
            window: Duration::from_secs(15 * 60),
            trust_proxy: false,
        }
    }
}

/// Rate limiter keyed by client IP address.
pub struct ClientRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    clock: DefaultClock,
    trust_proxy: bool,
}

impl ClientRateLimiter {
    /// # Errors
    /// Returns an error if the window is too short to spread `max_requests` across it.
    pub fn new(cfg: &RateLimitConfig) -> anyhow::Result<Self> {
        let period = cfg.window / cfg.max_requests.get();
        let quota = Quota::with_period(period)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "rate limit window {:?} is too short for {} requests",
                    cfg.window,
                    cfg.max_requests
                )
            })?
            .allow_burst(cfg.max_requests);

        Ok(Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            trust_proxy: cfg.trust_proxy,
        })
    }

    /// Records one request from `ip`.
    ///
    /// Returns how long the client must wait when it is over its limit.
    pub fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        self.limiter
            .check_key(&ip)
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Resolves the address a request should be accounted against.
    ///
    /// Requests without a known peer share the unspecified address bucket.
    pub fn client_ip(&self, req: &Request) -> IpAddr {
        if self.trust_proxy {
            let forwarded = req
                .headers()
                .get(FORWARDED_FOR)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .and_then(|value| value.trim().parse::<IpAddr>().ok());
            if let Some(ip) = forwarded {
                return ip;
            }
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }

    /// Number of client buckets currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Drops buckets that have fully refilled.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Periodically prunes idle buckets so memory stays bounded by active clients.
    pub fn spawn_pruner(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                limiter.prune();
                tracing::debug!(clients = limiter.tracked_clients(), "pruned rate limiter");
            }
        })
    }
}

/// axum middleware rejecting requests from clients over their limit.
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<ClientRateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let ip = limiter.client_ip(&req);
    match limiter.check(ip) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(%ip, ?retry_after, "rate limit exceeded");
            ApiError::RateLimited { retry_after }.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http;

    fn limiter(max: u32, trust_proxy: bool) -> ClientRateLimiter {
        ClientRateLimiter::new(&RateLimitConfig {
            max_requests: NonZeroU32::new(max).unwrap(),
            window: Duration::from_secs(60),
            trust_proxy,
        })
        .expect("limiter should build")
    }

    fn request_with_forwarded(value: &str) -> Request {
        http::Request::builder()
            .uri("/api/confessions")
            .header(FORWARDED_FOR, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn allows_burst_then_blocks() {
        let limiter = limiter(2, false);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();

        assert!(limiter.check(ip).is_ok());
        assert!(limiter.check(ip).is_ok());

        let wait = limiter.check(ip).expect_err("third request should be limited");
        assert!(wait <= Duration::from_secs(30));
    }

    #[test]
    fn clients_are_limited_independently() {
        let limiter = limiter(1, false);
        let first: IpAddr = "10.0.0.1".parse().unwrap();
        let second: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check(first).is_ok());
        assert!(limiter.check(first).is_err());
        assert!(limiter.check(second).is_ok());
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn forwarded_header_used_only_when_trusted() {
        let req = request_with_forwarded("203.0.113.7, 10.0.0.1");

        let trusted = limiter(1, true);
        assert_eq!(
            trusted.client_ip(&req),
            "203.0.113.7".parse::<IpAddr>().unwrap()
        );

        let untrusted = limiter(1, false);
        assert_eq!(
            untrusted.client_ip(&req),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }

    #[test]
    fn connect_info_is_used_when_present() {
        let mut req = request_with_forwarded("not an ip");
        let peer: SocketAddr = "192.0.2.4:5555".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));

        let trusted = limiter(1, true);
        assert_eq!(trusted.client_ip(&req), peer.ip());
    }

    #[test]
    fn window_too_short_for_quota_is_rejected() {
        let cfg = RateLimitConfig {
            max_requests: NonZeroU32::new(u32::MAX).unwrap(),
            window: Duration::from_nanos(1),
            trust_proxy: false,
        };
        assert!(ClientRateLimiter::new(&cfg).is_err());
    }
}
