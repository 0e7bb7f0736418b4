pub mod embed;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use rdm_core::config::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Regions
        .route("/api/regions", get(routes::regions::get_regions))
        .route("/api/refresh", post(routes::refresh::post_refresh))
        .route("/api/snapshot", get(routes::snapshot::get_snapshot))
        // Config
        .route("/api/config", get(routes::config::get_config))
        .fallback(embed::static_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the status page server on a pre-bound listener.
///
/// The caller binds so it can read the actual port before starting (useful
/// when `port = 0` and the OS picks a free port). Also starts the background
/// poller, which stops when the server does.
pub async fn serve_on(
    config: Config,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let device = config.device.url.clone();
    let app_state = AppState::new(config)?;
    let poller = app_state.spawn_poller();
    let app = build_router(app_state);

    tracing::info!(%device, "RDM status page listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        let _ = open::that(&url);
    }

    let result = axum::serve(listener, app).await;
    poller.abort();
    result?;
    Ok(())
}
