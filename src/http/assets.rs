//! Bundled web UI assets, embedded into the binary at build time.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;
use tracing::debug;

#[derive(RustEmbed)]
#[folder = "web/"]
struct WebAssets;

/// Serve an embedded asset by relative path with the given content type.
/// A missing asset is a plain-text 404, never a handler failure.
pub fn serve(path: &str, content_type: &'static str) -> Response {
    match WebAssets::get(path) {
        Some(content) => (
            [(header::CONTENT_TYPE, content_type)],
            content.data.into_owned(),
        )
            .into_response(),
        None => {
            debug!(asset = path, "asset not bundled");
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/plain")],
                "File not found",
            )
                .into_response()
        }
    }
}
