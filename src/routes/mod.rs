// ============================================================================
// Axum Routes Module
// ============================================================================
//
// Every protected route resolves the session, validates its input, forwards
// exactly one upstream operation and projects the result.
//
// Structure:
// - mod.rs: Main router assembly and middleware
// - sessions.rs: Login, logout and the current session
// - projects.rs: Projects, service creation and template deploys
// - services.rs: Service lookup and deletion
// - deployments.rs: Deployment removal, logs, cancel and restart
// - github.rs: GitHub repos and writable scopes
// - templates.rs: Template catalogue
// - health.rs: Liveness endpoint
// - extractors.rs: Custom Axum extractors (session, UUID path, bodies)
// - middleware.rs: Request logging, security headers
//
// ============================================================================

mod deployments;
mod extractors;
mod github;
mod health;
mod middleware;
mod projects;
mod services;
mod sessions;
mod templates;

use axum::{
    Router,
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header::HOST, request::Parts},
    response::IntoResponse,
    routing::{delete, get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{CORS_MAX_AGE_SECS, Config};
use crate::context::AppContext;

pub use extractors::{Session, UuidPath, ValidForm, ValidJson};

/// Create the main application router with all routes
pub fn create_router(app_context: Arc<AppContext>) -> Router {
    // Every path also answers unmatched methods with the plain 404
    let router = Router::new()
        // Sessions
        .route(
            "/sessions",
            post(sessions::create_session)
                .get(sessions::get_session)
                .fallback(not_found),
        )
        .route(
            "/sessions/destroy",
            get(sessions::destroy).fallback(not_found),
        )
        // Projects
        .route(
            "/projects",
            post(projects::create_project).fallback(not_found),
        )
        .route(
            "/projects/:id",
            get(projects::get_project).fallback(not_found),
        )
        .route(
            "/project/:id/services",
            post(projects::create_service).fallback(not_found),
        )
        .route(
            "/project/:id/deploy-template",
            post(projects::deploy_template).fallback(not_found),
        )
        // GitHub
        .route(
            "/github/repos",
            get(github::list_repos).fallback(not_found),
        )
        .route(
            "/github/scopes",
            get(github::list_scopes).fallback(not_found),
        )
        // Templates
        .route(
            "/templates",
            get(templates::list_templates).fallback(not_found),
        )
        // Services
        .route(
            "/services/:id",
            get(services::get_service)
                .delete(services::delete_service)
                .fallback(not_found),
        )
        // Deployments
        .route(
            "/deployments/:id",
            delete(deployments::remove_deployment).fallback(not_found),
        )
        .route(
            "/deployments/:id/logs",
            get(deployments::deployment_logs).fallback(not_found),
        )
        .route(
            "/deployments/:id/cancel",
            post(deployments::cancel_deployment).fallback(not_found),
        )
        .route(
            "/deployments/:id/restart",
            post(deployments::restart_deployment).fallback(not_found),
        )
        // Health
        .route("/healthz", get(health::healthz).fallback(not_found))
        .fallback(not_found);

    // Request logging is a development aid only
    let router = if app_context.config.environment.is_development() {
        router.layer(axum::middleware::from_fn(middleware::request_logging))
    } else {
        router
    };

    router
        // Apply middleware (order matters - last added runs first)
        .layer(
            ServiceBuilder::new()
                // Tracing layer (outermost - runs first)
                .layer(TraceLayer::new_for_http())
                // Security headers
                .layer(axum::middleware::from_fn(middleware::add_security_headers))
                // CORS (answers preflights before routing)
                .layer(cors_layer(&app_context.config))
                .into_inner(),
        )
        .with_state(app_context)
}

/// CORS for the dashboard origin, with credentials
fn cors_layer(config: &Config) -> CorsLayer {
    let dashboard_origin = config.dashboard_origin();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| origin.as_bytes() == dashboard_origin.as_bytes(),
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(CORS_MAX_AGE_SECS))
}

/// Fallback for undeclared paths
async fn not_found(uri: Uri, headers: HeaderMap) -> impl IntoResponse {
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    (
        StatusCode::NOT_FOUND,
        format!("Not found: http://{}{}", host, uri),
    )
}
