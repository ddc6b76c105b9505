// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-process stub backends for render tests: real axum servers on ephemeral
//! ports, no mock-server dependency.

use std::time::Duration;

use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::routing::post;
use axum::Router;

/// Serves `router` on an ephemeral port and returns its base URL.
pub(crate) async fn spawn(router: Router) -> String {
    let listener =
        tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// Backend that answers every render with 200 and `body`.
pub(crate) fn ok_backend(body: &'static str) -> Router {
    Router::new().route("/{engine}/{format}", post(move || async move { body }))
}

/// Backend that rejects every render with `status` and `body`.
pub(crate) fn error_backend(status: u16, body: &'static str) -> Router {
    let status = StatusCode::from_u16(status).expect("stub status");
    Router::new().route("/{engine}/{format}", post(move || async move { (status, body) }))
}

/// Backend that sleeps for `delay` before answering 200 with `body`.
pub(crate) fn slow_backend(delay: Duration, body: &'static str) -> Router {
    Router::new().route(
        "/{engine}/{format}",
        post(move || async move {
            tokio::time::sleep(delay).await;
            body
        }),
    )
}

/// Backend that replays `responses` in order, one per request.
pub(crate) fn sequence_backend(responses: Vec<(u16, &'static str)>) -> Router {
    let responses = std::sync::Arc::new(std::sync::Mutex::new(
        responses.into_iter().collect::<std::collections::VecDeque<_>>(),
    ));
    Router::new().route(
        "/{engine}/{format}",
        post(move || {
            let responses = responses.clone();
            async move {
                let (status, body) =
                    responses.lock().expect("stub lock").pop_front().expect("stub response left");
                (StatusCode::from_u16(status).expect("stub status"), body)
            }
        }),
    )
}

/// One request as seen by a [`recording_backend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedRequest {
    pub(crate) path: String,
    pub(crate) content_type: String,
    pub(crate) body: String,
}

/// Backend that records each request and answers 200 with `body`.
pub(crate) fn recording_backend(
    body: &'static str,
) -> (Router, tokio::sync::mpsc::UnboundedReceiver<RecordedRequest>) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let router = Router::new().route(
        "/{engine}/{format}",
        post(move |uri: Uri, headers: HeaderMap, request_body: String| async move {
            let content_type = headers
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_owned();
            let _ = tx.send(RecordedRequest {
                path: uri.path().to_owned(),
                content_type,
                body: request_body,
            });
            body
        }),
    );
    (router, rx)
}
