// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Unified client for Kroki-compatible rendering backends.
//!
//! Every render request goes through [`RenderClient::render`], which posts the
//! diagram source as plain text to `{base_url}/{engine}/{format}` and classifies
//! the result into a [`RenderOutcome`]. The client holds no session state and is
//! safe to share across concurrent sessions.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

/// Default timeout for interactive (agent tool) renders.
pub const INTERACTIVE_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for the stateless HTTP proxy.
pub const PROXY_TIMEOUT: Duration = Duration::from_secs(30);

/// Remediation guidance returned for timed-out renders.
pub const TIMEOUT_GUIDANCE: &str = "rendering timed out - simplify the diagram or retry later";

// Backend error text is kept verbatim in outcomes; only log lines are capped.
const LOG_MESSAGE_LIMIT: usize = 200;

/// Classified result of one render attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Backend returned 200; `content` is the rendered artifact bytes.
    Success { content: Vec<u8> },
    /// Backend rejected the diagram source with a non-200 status.
    ValidationFailure { status: u16, message: String },
    /// The call exceeded the caller-supplied timeout.
    Timeout { message: String },
    /// Network-level failure before any backend response.
    TransportFailure { message: String },
}

impl RenderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Outcome kind label used in structured log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::ValidationFailure { .. } => "validation_failure",
            Self::Timeout { .. } => "timeout",
            Self::TransportFailure { .. } => "transport_failure",
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::ValidationFailure { message, .. }
            | Self::Timeout { message }
            | Self::TransportFailure { message } => Some(message),
        }
    }

    /// HTTP status the proxy surface reports for this outcome. Validation
    /// failures pass the backend's original status through.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Success { .. } => 200,
            Self::ValidationFailure { status, .. } => *status,
            Self::Timeout { .. } => 504,
            Self::TransportFailure { .. } => 502,
        }
    }
}

/// Stateless render client for one backend base URL.
#[derive(Debug, Clone)]
pub struct RenderClient {
    http: reqwest::Client,
    base_url: String,
}

impl RenderClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http: reqwest::Client::new(), base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submits `code` for rendering and classifies the result.
    ///
    /// Never returns an error: every failure mode is folded into a
    /// [`RenderOutcome`] variant. Emits one structured log event per call.
    pub async fn render(
        &self,
        engine: &str,
        format: &str,
        code: &str,
        timeout: Duration,
    ) -> RenderOutcome {
        let url = format!("{}/{engine}/{format}", self.base_url);
        let result = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "text/plain")
            .timeout(timeout)
            .body(code.to_owned())
            .send()
            .await;

        let outcome = match result {
            Ok(response) if response.status() == StatusCode::OK => match response.bytes().await {
                Ok(bytes) => RenderOutcome::Success { content: bytes.to_vec() },
                Err(err) => classify_request_error(err),
            },
            Ok(response) => {
                let status = response.status().as_u16();
                let message = response.text().await.unwrap_or_default();
                RenderOutcome::ValidationFailure { status, message }
            }
            Err(err) => classify_request_error(err),
        };

        log_outcome(engine, format, code.len(), &outcome);
        outcome
    }
}

fn classify_request_error(err: reqwest::Error) -> RenderOutcome {
    if err.is_timeout() {
        RenderOutcome::Timeout { message: TIMEOUT_GUIDANCE.to_owned() }
    } else {
        RenderOutcome::TransportFailure { message: format!("network error: {err}") }
    }
}

fn log_outcome(engine: &str, format: &str, input_bytes: usize, outcome: &RenderOutcome) {
    match outcome {
        RenderOutcome::Success { content } => tracing::info!(
            engine,
            format,
            input_bytes,
            output_bytes = content.len(),
            outcome = outcome.kind(),
            "kroki render succeeded"
        ),
        RenderOutcome::ValidationFailure { status, message } => tracing::warn!(
            engine,
            format,
            input_bytes,
            status,
            outcome = outcome.kind(),
            error = truncate_for_log(message),
            "kroki render rejected"
        ),
        RenderOutcome::Timeout { .. } => tracing::warn!(
            engine,
            format,
            input_bytes,
            outcome = outcome.kind(),
            "kroki render timed out"
        ),
        RenderOutcome::TransportFailure { message } => tracing::error!(
            engine,
            format,
            input_bytes,
            outcome = outcome.kind(),
            error = truncate_for_log(message),
            "kroki render transport failure"
        ),
    }
}

fn truncate_for_log(message: &str) -> &str {
    message
        .char_indices()
        .nth(LOG_MESSAGE_LIMIT)
        .map(|(index, _)| &message[..index])
        .unwrap_or(message)
}

#[cfg(test)]
pub(crate) mod stub;
