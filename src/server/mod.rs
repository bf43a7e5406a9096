mod handlers;

use crate::{config::Config, media::MediaResolver};
use anyhow::{Context, Result};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::{path::PathBuf, sync::Arc};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<MediaResolver>,
    pub static_dir: PathBuf,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/okhk", get(handlers::api))
        .fallback(handlers::root)
        .with_state(state)
        .layer(middleware::from_fn(preflight))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Answers every `OPTIONS` request with an empty 200.
async fn preflight(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(req).await
}

pub async fn run(config: &Config, resolver: MediaResolver) -> Result<()> {
    let state = AppState {
        resolver: Arc::new(resolver),
        static_dir: config.server.static_dir.clone(),
    };
    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);
    info!("Serving static files from {}", config.server.static_dir.display());
    if !config.server.static_dir.is_dir() {
        warn!(
            "Static directory {} not found relative to {}, the front page will 404",
            config.server.static_dir.display(),
            std::env::current_dir()
                .map(|d| d.display().to_string())
                .unwrap_or_default()
        );
    }

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
