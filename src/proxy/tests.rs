// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::*;
use crate::kroki::stub::{error_backend, ok_backend, slow_backend, spawn};

async fn spawn_proxy_against(backend: Router) -> String {
    let backend_url = spawn(backend).await;
    let state = ProxyState::new(Arc::new(RenderClient::new(backend_url)));
    spawn(router(state)).await
}

#[tokio::test]
async fn health_reports_healthy() {
    let proxy_url = spawn_proxy_against(ok_backend("<svg/>")).await;

    let response =
        reqwest::get(format!("{proxy_url}/health")).await.expect("health request");
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("health body");
    assert_eq!(body, serde_json::json!({ "status": "healthy" }));
}

#[tokio::test]
async fn successful_render_passes_through_with_svg_content_type() {
    let proxy_url = spawn_proxy_against(ok_backend("<svg>OK</svg>")).await;

    let response = reqwest::Client::new()
        .post(format!("{proxy_url}/api/render/mermaid/svg"))
        .body("flowchart TD; A-->B")
        .send()
        .await
        .expect("render request");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers().get("content-type").and_then(|v| v.to_str().ok()),
        Some("image/svg+xml")
    );
    assert_eq!(response.text().await.expect("body"), "<svg>OK</svg>");
}

#[tokio::test]
async fn non_svg_formats_get_an_image_content_type() {
    let proxy_url = spawn_proxy_against(ok_backend("png-bytes")).await;

    let response = reqwest::Client::new()
        .post(format!("{proxy_url}/api/render/mermaid/png"))
        .body("flowchart TD; A-->B")
        .send()
        .await
        .expect("render request");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers().get("content-type").and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
}

#[tokio::test]
async fn empty_body_is_rejected_before_any_backend_call() {
    // The backend would answer 200; a 400 proves it was never consulted.
    let proxy_url = spawn_proxy_against(ok_backend("<svg/>")).await;

    let response = reqwest::Client::new()
        .post(format!("{proxy_url}/api/render/mermaid/svg"))
        .body("")
        .send()
        .await
        .expect("render request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("error body");
    assert!(body["error"].as_str().is_some_and(|m| m.contains("empty")));
}

#[tokio::test]
async fn truncated_render_paths_answer_400() {
    let proxy_url = spawn_proxy_against(ok_backend("<svg/>")).await;
    let client = reqwest::Client::new();

    for path in ["/api/render", "/api/render/mermaid"] {
        let response = client
            .post(format!("{proxy_url}{path}"))
            .body("flowchart TD; A-->B")
            .send()
            .await
            .expect("render request");
        assert_eq!(response.status().as_u16(), 400, "path {path}");

        let body: serde_json::Value = response.json().await.expect("error body");
        assert!(body["error"].as_str().is_some_and(|m| m.contains("expected")), "path {path}");
    }
}

#[tokio::test]
async fn validation_failure_passes_the_backend_status_through() {
    let proxy_url = spawn_proxy_against(error_backend(500, "bad node")).await;

    let response = reqwest::Client::new()
        .post(format!("{proxy_url}/api/render/mermaid/svg"))
        .body("flowchart TD; A-->")
        .send()
        .await
        .expect("render request");

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.expect("error body");
    assert_eq!(body, serde_json::json!({ "error": "bad node" }));
}

#[tokio::test]
async fn backend_timeout_maps_to_504_with_guidance() {
    let backend_url = spawn(slow_backend(Duration::from_secs(5), "<svg/>")).await;
    let state = ProxyState::new(Arc::new(RenderClient::new(backend_url)))
        .with_timeout(Duration::from_millis(100));
    let proxy_url = spawn(router(state)).await;

    let response = reqwest::Client::new()
        .post(format!("{proxy_url}/api/render/mermaid/svg"))
        .body("flowchart TD; A-->B")
        .send()
        .await
        .expect("render request");

    assert_eq!(response.status().as_u16(), 504);
    let body: serde_json::Value = response.json().await.expect("error body");
    assert!(body["error"].as_str().is_some_and(|m| m.contains("simplify the diagram")));
}

#[tokio::test]
async fn backend_outage_maps_to_502() {
    let listener =
        tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.expect("bind probe listener");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);

    let state = ProxyState::new(Arc::new(RenderClient::new(format!("http://{addr}"))));
    let proxy_url = spawn(router(state)).await;

    let response = reqwest::Client::new()
        .post(format!("{proxy_url}/api/render/mermaid/svg"))
        .body("flowchart TD; A-->B")
        .send()
        .await
        .expect("render request");

    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.expect("error body");
    assert!(body["error"].as_str().is_some_and(|m| m.starts_with("network error:")));
}
