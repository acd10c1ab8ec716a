//! Configuration API handlers.
//!
//! All state lives in the store: every request re-reads or re-writes it, so
//! the handlers hold nothing across requests and concurrent requests
//! serialize through the book. A save triggers the worker restart
//! asynchronously; the response never waits on it.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use futures_util::StreamExt;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::server::AppState;
use crate::store::settings::{self, ForwarderSettings};
use crate::system::{battery, info};
use crate::workers;

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<ForwarderSettings> {
    Json(ForwarderSettings::load(&state.book))
}

/// POST /api/config
///
/// Received → Validated → Persisted → RestartTriggered(async) → ResponseSent.
/// Restart completion is only observable by polling /api/info.
pub async fn save_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<Value>> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .ok_or(Error::MissingContentLength)?;
    let declared: usize = declared
        .to_str()
        .ok()
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| Error::SaveConfig("unreadable content-length header".to_string()))?;
    if declared > state.max_body_bytes {
        return Err(Error::BodyTooLarge(declared));
    }

    let bytes = read_exact_body(body, declared).await?;
    let settings: ForwarderSettings = serde_json::from_slice(&bytes)
        .map_err(|e| Error::SaveConfig(e.to_string()))?;

    settings.save(&state.book);
    Arc::clone(&state.supervisor).apply_desired_state(workers::desired_state(&settings));
    debug!("configuration saved, worker restart triggered");

    Ok(Json(json!({
        "message": "Configuration saved successfully! Services restarting..."
    })))
}

/// Read exactly `expected` bytes of body. The declared length is the
/// contract: fewer delivered bytes (truncated upload, dropped connection)
/// or more both fail the request with the observed count.
async fn read_exact_body(body: Body, expected: usize) -> Result<Vec<u8>> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::with_capacity(expected);

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                buf.extend_from_slice(&chunk);
                if buf.len() > expected {
                    break;
                }
            }
            Err(e) => {
                debug!(error = %e, "request body ended early");
                return Err(Error::IncompleteBody {
                    expected,
                    got: buf.len(),
                });
            }
        }
    }

    if buf.len() != expected {
        return Err(Error::IncompleteBody {
            expected,
            got: buf.len(),
        });
    }
    Ok(buf)
}

/// System information returned by /api/info. The platform field keeps the
/// wire name the bundled UI has always used.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub service_running: bool,
    #[serde(rename = "androidVersion")]
    pub os_version: String,
    pub app_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<u8>,
}

/// GET /api/info
pub async fn get_info(State(state): State<AppState>) -> Json<SystemInfo> {
    Json(SystemInfo {
        service_running: settings::initialized(&state.book),
        os_version: info::platform_version(),
        app_version: info::app_version().to_string(),
        battery_level: battery::read_battery().and_then(|reading| reading.percent()),
    })
}

/// GET /api/test
// TODO: wire this to telegram::BotClient::get_me once the test-result UX
// in the web UI is settled.
pub async fn test_connection() -> Json<Value> {
    Json(json!({ "message": "Connection test not implemented yet" }))
}
