//! HTTP routes: the submission endpoint, health check, static mini-app assets and OpenAPI docs.

use crate::error::{panic_response, ApiError};
use crate::rate_limit::{enforce_rate_limit, ClientRateLimiter};
use api_shared::{ConfessionReq, ConfessionRes, ErrorRes, HealthRes, HealthService, ModerationRes};
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::{Json, Redirect},
    routing::{get, post},
    Router,
};
use confess_core::{ModerationResult, SubmissionService, LOG_PREVIEW_CHARS};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// Path the mini-app is served under.
pub const MINIAPP_PATH: &str = "/miniapp";

/// Application state for the REST API server
#[derive(Clone)]
pub struct AppState {
    pub submissions: SubmissionService,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, submit_confession),
    components(schemas(HealthRes, ConfessionReq, ConfessionRes, ModerationRes, ErrorRes))
)]
pub struct ApiDoc;

/// Builds the full application router.
///
/// Only the submission endpoint is rate limited. Static assets come from `public_dir`, with
/// `public_dir/.well-known` additionally exposed at `/.well-known` for the app manifest.
pub fn router(state: AppState, limiter: Arc<ClientRateLimiter>, public_dir: &Path) -> Router {
    let confessions = Router::new()
        .route("/api/confessions", post(submit_confession))
        .route_layer(middleware::from_fn_with_state(limiter, enforce_rate_limit));

    Router::new()
        .route("/", get(redirect_to_miniapp))
        .route("/health", get(health))
        .merge(confessions)
        .nest_service(MINIAPP_PATH, ServeDir::new(public_dir))
        .nest_service("/.well-known", ServeDir::new(public_dir.join(".well-known")))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(http_trace_layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Request tracing at INFO: one span per request and one event per response.
fn http_trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for load balancers and uptime monitors.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

async fn redirect_to_miniapp() -> Redirect {
    Redirect::temporary(&format!("{MINIAPP_PATH}/"))
}

#[utoipa::path(
    post,
    path = "/api/confessions",
    request_body = ConfessionReq,
    responses(
        (status = 201, description = "Confession accepted", body = ConfessionRes),
        (status = 400, description = "Content missing, too long, or rejected by moderation", body = ErrorRes),
        (status = 429, description = "Too many submissions from this client", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Submit a confession
///
/// Validates and moderates the submission. Nothing is stored: an accepted submission is logged
/// and acknowledged.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the body is not a JSON object of the expected shape,
/// - `content` is missing, blank or longer than 1000 characters, or
/// - moderation rejects the content.
///
/// Returns `500 Internal Server Error` if the moderation backend fails.
#[axum::debug_handler]
async fn submit_confession(
    State(state): State<AppState>,
    payload: Result<Json<ConfessionReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ConfessionRes>), ApiError> {
    let Json(req) = payload?;

    let accepted = match state
        .submissions
        .submit(
            req.content.as_deref().unwrap_or_default(),
            req.image.as_deref(),
        )
        .await
    {
        Ok(accepted) => accepted,
        Err(e) => {
            if e.is_client_fault() {
                tracing::info!("Confession refused: {}", e);
            }
            return Err(e.into());
        }
    };

    let submission_id = Uuid::new_v4();
    tracing::info!(
        %submission_id,
        preview = accepted.submission.preview(LOG_PREVIEW_CHARS),
        image = ?accepted.submission.image(),
        moderation = ?accepted.moderation,
        "New confession"
    );

    Ok((
        StatusCode::CREATED,
        Json(ConfessionRes {
            ok: true,
            moderation: moderation_res(accepted.moderation),
        }),
    ))
}

// Helper function
fn moderation_res(result: ModerationResult) -> ModerationRes {
    match result {
        ModerationResult::Accept { score } => ModerationRes::Accept { score },
        ModerationResult::Reject { reason } => ModerationRes::Reject { reason },
    }
}
