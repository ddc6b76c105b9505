// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Stateless HTTP pass-through to the rendering backend, plus the health
//! endpoint. Bypasses session state entirely.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::kroki::{RenderClient, RenderOutcome, PROXY_TIMEOUT};

#[derive(Clone)]
pub struct ProxyState {
    render_client: Arc<RenderClient>,
    timeout: Duration,
}

impl ProxyState {
    pub fn new(render_client: Arc<RenderClient>) -> Self {
        Self { render_client, timeout: PROXY_TIMEOUT }
    }

    /// Overrides the fixed proxy timeout (tests exercise the timeout path
    /// without waiting out the default).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Builds the proxy router: `POST /api/render/{engine}/{format}` and
/// `GET /health`. Truncated render paths answer 400 before any backend call.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/render", post(missing_segments))
        .route("/api/render/{engine}", post(missing_segments))
        .route("/api/render/{engine}/{format}", post(render))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn missing_segments() -> Response {
    error_response(StatusCode::BAD_REQUEST, "invalid path, expected /api/render/{engine}/{format}")
}

async fn render(
    State(state): State<ProxyState>,
    Path((engine, format)): Path<(String, String)>,
    code: String,
) -> Response {
    if code.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "diagram code must not be empty");
    }

    let outcome = state.render_client.render(&engine, &format, &code, state.timeout).await;
    match outcome {
        RenderOutcome::Success { content } => {
            let content_type = if format == "svg" {
                "image/svg+xml".to_owned()
            } else {
                format!("image/{format}")
            };
            ([(header::CONTENT_TYPE, content_type)], content).into_response()
        }
        failure => {
            let status = StatusCode::from_u16(failure.http_status())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            error_response(status, failure.error_message().unwrap_or_default())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests;
