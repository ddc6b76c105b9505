// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::kroki::RenderOutcome;

/// Mutable per-session record of the diagram being built and the outcome of
/// the last render attempt.
///
/// `rendered_content` is sticky: it only ever changes on a successful render,
/// so a failing correction loop never regresses the caller to an empty visual
/// state. `error_message` and `retry_count` move together: the message is set
/// iff at least one failure has occurred since the last success.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramSession {
    engine: String,
    diagram_name: String,
    diagram_code: String,
    rendered_content: Option<Vec<u8>>,
    error_message: Option<String>,
    is_loading: bool,
    retry_count: u32,
    last_modified: f64,
    request_seq: u64,
}

/// Tag for one in-flight submission. An outcome applied with a stale ticket
/// (the session has moved on, or the submission was superseded) is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket(u64);

impl Default for DiagramSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramSession {
    pub fn new() -> Self {
        Self {
            engine: String::new(),
            diagram_name: String::new(),
            diagram_code: String::new(),
            rendered_content: None,
            error_message: None,
            is_loading: false,
            retry_count: 0,
            last_modified: now_unix_seconds(),
            request_seq: 0,
        }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn diagram_name(&self) -> &str {
        &self.diagram_name
    }

    pub fn set_diagram_name(&mut self, diagram_name: impl Into<String>) {
        self.diagram_name = diagram_name.into();
        self.touch();
    }

    pub fn diagram_code(&self) -> &str {
        &self.diagram_code
    }

    /// Content of the last successful render; never cleared by a failure.
    pub fn rendered_content(&self) -> Option<&[u8]> {
        self.rendered_content.as_deref()
    }

    /// Message from the most recent failed attempt; cleared on success.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// True strictly between submission and outcome arrival.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Consecutive failures since the last success.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Unix seconds of the last mutation; monotonically non-decreasing.
    pub fn last_modified(&self) -> f64 {
        self.last_modified
    }

    /// Transition 1: record a submission and mark the session loading.
    ///
    /// Leaves `rendered_content`, `error_message` and `retry_count` untouched;
    /// those belong to [`Self::apply_outcome`]. The caller must ensure no other
    /// submission is in flight for this session.
    pub fn begin_submit(&mut self, engine: impl Into<String>, code: impl Into<String>) -> RenderTicket {
        self.engine = engine.into();
        self.diagram_code = code.into();
        self.is_loading = true;
        self.request_seq += 1;
        self.touch();
        RenderTicket(self.request_seq)
    }

    /// Transition 2: fold a render outcome back into the session.
    ///
    /// Returns false (and mutates nothing) when `ticket` does not match the
    /// submission currently in flight. This is the sole writer of
    /// `rendered_content`, `error_message` and `retry_count`.
    pub fn apply_outcome(&mut self, ticket: RenderTicket, outcome: RenderOutcome) -> bool {
        if !self.is_loading || ticket.0 != self.request_seq {
            return false;
        }

        match outcome {
            RenderOutcome::Success { content } => {
                self.rendered_content = Some(content);
                self.error_message = None;
                self.retry_count = 0;
            }
            failure => {
                self.error_message = failure.error_message().map(str::to_owned);
                self.retry_count += 1;
            }
        }

        self.is_loading = false;
        self.touch();
        true
    }

    fn touch(&mut self) {
        let now = now_unix_seconds();
        if now > self.last_modified {
            self.last_modified = now;
        }
    }
}

fn now_unix_seconds() -> f64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO).as_secs_f64()
}
