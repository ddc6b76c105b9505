// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::DiagramSession;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EngineSummary {
    pub engine: String,
    pub description: String,
    pub docs_url: String,
    pub diagram_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyntaxEnginesResponse {
    pub engines: Vec<EngineSummary>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SyntaxGetParams {
    pub engine: String,
    pub diagram_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyntaxRuleset {
    pub engine: String,
    pub diagram_type: String,
    pub description: String,
    pub use_cases: Vec<String>,
    pub syntax_rules: String,
    pub examples: Vec<String>,
}

/// Result of `syntax.get`. Exactly one of `ruleset` or `error` is set; misses
/// are ordinary tool results carrying the valid alternatives, so the calling
/// agent can self-correct without a failed call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyntaxGetResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruleset: Option<SyntaxRuleset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_engines: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_types: Option<Vec<String>>,
}

impl SyntaxGetResponse {
    pub fn ruleset(ruleset: SyntaxRuleset) -> Self {
        Self { ruleset: Some(ruleset), error: None, supported_engines: None, supported_types: None }
    }

    pub fn unknown_engine(error: String, supported_engines: Vec<String>) -> Self {
        Self {
            ruleset: None,
            error: Some(error),
            supported_engines: Some(supported_engines),
            supported_types: None,
        }
    }

    pub fn unknown_type(error: String, supported_types: Vec<String>) -> Self {
        Self {
            ruleset: None,
            error: Some(error),
            supported_engines: None,
            supported_types: Some(supported_types),
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DiagramRenderParams {
    pub engine: String,
    pub code: String,
    pub diagram_name: Option<String>,
}

/// Immutable snapshot of the session state, returned by `diagram.state` and
/// after every `diagram.render`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramStateResponse {
    pub engine: String,
    pub diagram_name: String,
    pub diagram_code: String,
    pub rendered_content: Option<String>,
    pub error_message: Option<String>,
    pub is_loading: bool,
    pub retry_count: u32,
    pub last_modified: f64,
}

impl DiagramStateResponse {
    pub fn from_session(session: &DiagramSession) -> Self {
        Self {
            engine: session.engine().to_owned(),
            diagram_name: session.diagram_name().to_owned(),
            diagram_code: session.diagram_code().to_owned(),
            rendered_content: session
                .rendered_content()
                .map(|content| String::from_utf8_lossy(content).into_owned()),
            error_message: session.error_message().map(str::to_owned),
            is_loading: session.is_loading(),
            retry_count: session.retry_count(),
            last_modified: session.last_modified(),
        }
    }
}
