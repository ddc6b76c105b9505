// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Naiad CLI entrypoint.
//!
//! By default this serves MCP over streamable HTTP at `http://0.0.0.0:<port>/mcp`
//! alongside the render proxy (`POST /api/render/{engine}/{format}`) and
//! `GET /health`.
//!
//! Use `--mcp` to run the MCP server over stdio instead (intended for tool
//! integrations).

use std::error::Error;
use std::sync::Arc;

use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--port <port>] [--kroki-url <url>] [--syntax-dir <dir>]\n  {program} --mcp [--kroki-url <url>] [--syntax-dir <dir>]\n\nHTTP mode (default) serves MCP over streamable HTTP at `http://0.0.0.0:<port>/mcp`,\nthe render proxy at `POST /api/render/{{engine}}/{{format}}` and `GET /health`.\n--mcp runs the MCP server over stdio instead (intended for tool integrations).\n\nFlags override the environment (PORT, KROKI_BASE_URL, NAIAD_SYNTAX_DIR, ENV)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    mcp: bool,
    port: Option<u16>,
    kroki_url: Option<String>,
    syntax_dir: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mcp" => {
                if options.mcp {
                    return Err(());
                }
                options.mcp = true;
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            "--kroki-url" => {
                if options.kroki_url.is_some() {
                    return Err(());
                }
                let url = args.next().ok_or(())?;
                options.kroki_url = Some(url);
            }
            "--syntax-dir" => {
                if options.syntax_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.syntax_dir = Some(dir);
            }
            _ => return Err(()),
        }
    }

    if options.mcp && options.port.is_some() {
        return Err(());
    }

    Ok(options)
}

// Logs go to stderr; in --mcp mode stdout carries the JSON-RPC stream.
fn build_subscriber() -> Result<impl tracing::Subscriber + Send + Sync, Box<dyn Error>> {
    Ok(tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .finish())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "naiad".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        tracing::subscriber::set_global_default(build_subscriber()?)?;

        let config = naiad::config::ServerConfig::from_env();
        let port = options.port.unwrap_or(config.port);
        let environment = config.environment;
        let kroki_base_url = options.kroki_url.unwrap_or(config.kroki_base_url);
        let syntax_dir = options.syntax_dir.unwrap_or(config.syntax_dir);

        let library = Arc::new(naiad::syntax::SyntaxLibrary::load(&syntax_dir)?);
        let render_client = Arc::new(naiad::kroki::RenderClient::new(kroki_base_url));

        if options.mcp {
            let mcp = naiad::mcp::NaiadMcp::new(library, render_client);
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(mcp.serve_stdio())?;
            return Ok(());
        }

        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;

            let http_config = StreamableHttpServerConfig {
                stateful_mode: true,
                ..StreamableHttpServerConfig::default()
            };
            let session_manager = Arc::new(LocalSessionManager::default());
            let mcp_service = {
                let library = library.clone();
                let render_client = render_client.clone();
                // Each streamable-HTTP session gets its own NaiadMcp, i.e. its
                // own DiagramSession; the library and client are shared.
                StreamableHttpService::new(
                    move || Ok(naiad::mcp::NaiadMcp::new(library.clone(), render_client.clone())),
                    session_manager,
                    http_config,
                )
            };

            let proxy_state = naiad::proxy::ProxyState::new(render_client.clone());
            let router = naiad::proxy::router(proxy_state).nest_service("/mcp", mcp_service);

            tracing::info!(
                port,
                environment = environment.as_str(),
                kroki_base_url = render_client.base_url(),
                engines = library.engine_names().len(),
                "naiad listening"
            );

            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("naiad: {err}");
        std::process::exit(1);
    }
}
