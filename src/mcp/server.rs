// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use tokio::sync::Mutex;

use crate::kroki::{RenderClient, INTERACTIVE_TIMEOUT};
use crate::model::DiagramSession;
use crate::syntax::{LookupError, SyntaxLibrary};

use super::types::*;

/// One MCP session: exclusive diagram state plus the shared knowledge base and
/// render client. The streamable-HTTP transport constructs a fresh instance per
/// session; stdio mode serves a single one.
#[derive(Clone)]
pub struct NaiadMcp {
    session: Arc<Mutex<DiagramSession>>,
    library: Arc<SyntaxLibrary>,
    render_client: Arc<RenderClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NaiadMcp {
    pub fn new(library: Arc<SyntaxLibrary>, render_client: Arc<RenderClient>) -> Self {
        Self {
            session: Arc::new(Mutex::new(DiagramSession::new())),
            library,
            render_client,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// List every configured engine with its diagram types; start here, then
    /// fetch the ruleset for your pick with `syntax.get`.
    #[tool(name = "syntax.engines")]
    async fn syntax_engines(&self) -> Result<Json<SyntaxEnginesResponse>, ErrorData> {
        let engines = self
            .library
            .engines()
            .iter()
            .map(|(key, entry)| EngineSummary {
                engine: key.clone(),
                description: entry.description().to_owned(),
                docs_url: entry.docs_url().to_owned(),
                diagram_types: entry.type_names(),
            })
            .collect::<Vec<_>>();

        Ok(Json(SyntaxEnginesResponse { engines }))
    }

    /// Fetch the syntax ruleset for one (engine, diagram type); call before
    /// generating code. A miss returns the valid alternatives instead of an
    /// error so you can pick again.
    #[tool(name = "syntax.get")]
    async fn syntax_get(
        &self,
        params: Parameters<SyntaxGetParams>,
    ) -> Result<Json<SyntaxGetResponse>, ErrorData> {
        let SyntaxGetParams { engine, diagram_type } = params.0;

        let response = match self.library.diagram_type(&engine, &diagram_type) {
            Ok(ruleset) => SyntaxGetResponse::ruleset(SyntaxRuleset {
                engine: engine.to_lowercase(),
                diagram_type: diagram_type.to_lowercase(),
                description: ruleset.description().to_owned(),
                use_cases: ruleset.use_cases().to_vec(),
                syntax_rules: ruleset.syntax_rules().to_owned(),
                examples: ruleset.examples().to_vec(),
            }),
            Err(err) => {
                let error = err.to_string();
                match err {
                    LookupError::UnknownEngine { supported_engines, .. } => {
                        SyntaxGetResponse::unknown_engine(error, supported_engines)
                    }
                    LookupError::UnknownType { supported_types, .. } => {
                        SyntaxGetResponse::unknown_type(error, supported_types)
                    }
                }
            }
        };

        Ok(Json(response))
    }

    /// Read the current session state snapshot; never mutates. Use before
    /// modifying an existing diagram or to re-read an earlier render error.
    #[tool(name = "diagram.state")]
    async fn diagram_state(&self) -> Result<Json<DiagramStateResponse>, ErrorData> {
        let session = self.session.lock().await;
        Ok(Json(DiagramStateResponse::from_session(&session)))
    }

    /// Submit diagram code for rendering and return the updated state. On
    /// failure, fix the code using `error_message` and call again; the last
    /// successful `rendered_content` stays available throughout.
    #[tool(name = "diagram.render")]
    async fn diagram_render(
        &self,
        params: Parameters<DiagramRenderParams>,
    ) -> Result<Json<DiagramStateResponse>, ErrorData> {
        let DiagramRenderParams { engine, code, diagram_name } = params.0;

        let ticket = {
            let mut session = self.session.lock().await;
            if session.is_loading() {
                return Err(ErrorData::invalid_request(
                    "a render is already in flight for this session",
                    Some(serde_json::json!({ "engine": session.engine() })),
                ));
            }
            if let Some(diagram_name) = diagram_name {
                session.set_diagram_name(diagram_name);
            }
            session.begin_submit(&engine, &code)
        };

        // The session lock is not held across the backend call; readers see
        // is_loading until the outcome lands.
        let outcome = self.render_client.render(&engine, "svg", &code, INTERACTIVE_TIMEOUT).await;

        let mut session = self.session.lock().await;
        session.apply_outcome(ticket, outcome);
        Ok(Json(DiagramStateResponse::from_session(&session)))
    }
}

#[tool_handler]
impl ServerHandler for NaiadMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Naiad diagram render server (tools: syntax.engines, syntax.get, diagram.state, diagram.render). Fetch the syntax ruleset before generating code; submit code with diagram.render; on failure, correct the code using the returned error_message and render again."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
