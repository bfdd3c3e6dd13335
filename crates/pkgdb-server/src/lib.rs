pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::{middleware, Router};
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Lifecycle transitions
        .route("/api/package/orphan/", post(routes::packages::orphan))
        .route("/api/package/unorphan/", post(routes::packages::unorphan))
        .route("/api/package/retire/", post(routes::packages::retire))
        .route("/api/package/unretire/", post(routes::packages::unretire))
        // Info
        .route("/api/package/{name}/", get(routes::packages::get_package))
        .layer(middleware::from_fn(auth::caller_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the API server on a pre-bound listener.
///
/// The caller binds so it can read the actual port before starting (useful
/// when `port = 0` and the OS picks a free port).
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("pkgdb API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
