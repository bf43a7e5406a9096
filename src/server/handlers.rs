use super::AppState;
use crate::media::{find_link, normalize_link};
use axum::{
    extract::{Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use percent_encoding::percent_decode_str;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::{error, info};

const GALLERY_HINT: &str =
    "Could not resolve a watermark-free video from this link, it may be an image post. Use the full parser on the home page instead.";

/// `GET /api/okhk?url=<text>[&data]`
pub async fn api(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    // first occurrence wins for repeated keys
    let raw_input = match params.iter().find(|(k, _)| k == "url") {
        Some((_, raw)) if !raw.is_empty() => raw,
        _ => return (StatusCode::BAD_REQUEST, "Missing 'url' parameter").into_response(),
    };

    let Some(link) = find_link(raw_input) else {
        info!("No douyin link in input: raw_input='{}'", raw_input);
        return (
            StatusCode::BAD_REQUEST,
            "No valid douyin link found in the input",
        )
            .into_response();
    };

    info!(
        "Received request: raw_input='{}', extracted_url='{}'",
        raw_input, link
    );

    if params.iter().any(|(k, _)| k == "data") {
        match state.resolver.record(link).await {
            Ok(record) => (
                [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
                Json(record),
            )
                .into_response(),
            Err(e) => {
                error!(
                    "Failed to parse record: raw_input='{}', extracted_url='{}': {:#}",
                    raw_input, link, e
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to parse: {:#}", e),
                )
                    .into_response()
            }
        }
    } else {
        match state.resolver.video_url(link).await {
            Ok(url) => (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                url,
            )
                .into_response(),
            Err(e) => {
                error!(
                    "Failed to parse video url: raw_input='{}', extracted_url='{}': {:#}",
                    raw_input, link, e
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to resolve the video url, use the 'data' parameter to get image posts.",
                )
                    .into_response()
            }
        }
    }
}

/// Redirects `/<share link>` straight to the video, otherwise serves the front page.
pub async fn root(State(state): State<AppState>, req: Request) -> Response {
    // share text pasted into the address bar arrives percent-encoded
    let path = percent_decode_str(req.uri().path())
        .decode_utf8_lossy()
        .into_owned();

    let Some(link) = normalize_link(&path) else {
        return match ServeDir::new(&state.static_dir).oneshot(req).await {
            Ok(res) => res.into_response(),
            Err(never) => match never {},
        };
    };

    info!("Detected link in path: {}", link);

    match state.resolver.video_url(&link).await {
        Ok(url) => {
            info!("Redirecting to: {}", url);
            (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
        }
        Err(e) => {
            error!(
                "Failed to resolve path link: raw_input='{}', extracted_url='{}': {:#}",
                path, link, e
            );
            (StatusCode::NOT_FOUND, GALLERY_HINT).into_response()
        }
    }
}
