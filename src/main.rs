use api_rest::ServerConfig;
use confess_core::{CoreConfig, blocklist_from_env_value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the confession relay
///
/// Serves the mini-app and the `POST /api/confessions` endpoint.
///
/// # Environment Variables
/// - `PORT` / `CONFESS_REST_ADDR`: bind address (default: "0.0.0.0:3000")
/// - `PUBLIC_DIR`: mini-app asset directory (default: "public")
/// - `RATE_LIMIT_MAX`, `RATE_LIMIT_WINDOW_SECS`: per-client submission quota (default: 30 per 900s)
/// - `TRUST_PROXY`: use `X-Forwarded-For` for the client address
/// - `CONFESS_BLOCKLIST`: comma-separated moderation terms replacing the built-in list
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any environment variable is malformed, or
/// - the HTTP server fails to start or while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("confess=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_cfg = ServerConfig::from_env()?;
    let blocklist = blocklist_from_env_value(std::env::var("CONFESS_BLOCKLIST").ok())?;
    tracing::info!("++ Moderation blocklist has {} terms", blocklist.terms().len());
    let core_cfg = CoreConfig::new(blocklist);

    tracing::info!("++ Starting confession relay on {}", server_cfg.addr);

    api_rest::serve(server_cfg, core_cfg).await
}
