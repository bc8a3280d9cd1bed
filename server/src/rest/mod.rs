use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use drowsy_dashboard_shared::config::{DashboardConfig, CONFIG_PATH};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{config::Configuration, error::ServerError};

#[derive(Clone)]
struct AppState {
    dashboard: Arc<DashboardConfig>,
}

pub(crate) fn router(config: &Configuration) -> Router {
    let app_state = AppState {
        dashboard: Arc::new(config.dashboard.clone()),
    };

    // unknown paths fall back to index.html so client side routes survive a reload
    let app = ServeDir::new(&config.dist_dir)
        .fallback(ServeFile::new(config.dist_dir.join("index.html")));

    let router = Router::new().route(CONFIG_PATH, get(dashboard_config));
    let router = match &config.sounds_dir {
        Some(sounds_dir) => router.nest_service(
            &config.dashboard.sounds_path,
            ServeDir::new(sounds_dir),
        ),
        None => router,
    };

    router
        .fallback_service(app)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub(crate) async fn serve_dashboard(config: &Configuration) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .map_err(|source| ServerError::Bind {
            address: config.listen,
            source,
        })?;
    tracing::info!(
        "serving {} on http://{}",
        config.dist_dir.display(),
        config.listen
    );
    axum::serve(listener, router(config))
        .await
        .map_err(ServerError::Serve)
}

async fn dashboard_config(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(state.dashboard.as_ref().clone()),
    )
}
