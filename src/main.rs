use actix_web::{App, HttpServer, middleware, web};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use filedesk::app::{AppState, configure_routes};
use filedesk::config::ServiceConfig;
use filedesk::lifecycle::RESTART_EXIT_CODE;
use filedesk::logging::init_logging;
use filedesk::mcp::transport::StdioTransport;

/// Local file desk: browse, edit and run commands in one directory over
/// HTTP or MCP.
#[derive(Parser)]
#[command(name = "filedesk", version, about)]
struct Cli {
    /// JSON config file (defaults to ./filedesk.json when present)
    #[arg(long, env = "FILEDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory every path is resolved against
    #[arg(long)]
    base_dir: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// HTTP server with REST API, web UI and the /mcp endpoint (default)
    Serve,
    /// MCP over newline-delimited JSON-RPC on stdin/stdout
    Stdio,
}

fn load_config(cli: &Cli) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    let mut config = ServiceConfig::load(cli.config.as_deref())?;
    config.apply_env()?;

    if let Some(base_dir) = &cli.base_dir {
        config.base_dir = base_dir.clone();
    }
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    Ok(config)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let mode = cli.mode.unwrap_or(Mode::Serve);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Held until exit so the file writer flushes.
    let log_guard = init_logging(config.log_dir.as_deref(), mode == Mode::Stdio);

    let state = match AppState::build(&config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };
    let restart = state.restart.clone();

    match mode {
        Mode::Stdio => {
            info!("Starting MCP stdio server");
            let mut transport = StdioTransport::stdio();
            if let Err(e) = state.server.serve(&mut transport).await {
                error!("MCP stdio server failed: {}", e);
            }
        }
        Mode::Serve => {
            let (host, port) = config.bind_address();
            info!("Starting server at http://{}:{}", host, port);

            let app_state = state.clone();
            let server = HttpServer::new(move || {
                App::new()
                    .app_data(app_state.clone())
                    .wrap(middleware::Logger::default())
                    .configure(configure_routes)
            })
            .bind((host, port))?
            .run();

            let handle = server.handle();
            let watcher = restart.clone();
            actix_web::rt::spawn(async move {
                watcher.requested().await;
                info!("Stopping HTTP server for restart");
                handle.stop(true).await;
            });

            server.await?;
        }
    }

    if restart.is_requested() {
        info!("Exiting with code {} for restart", RESTART_EXIT_CODE);
        drop(log_guard);
        std::process::exit(RESTART_EXIT_CODE);
    }

    info!("Server stopped");
    Ok(())
}
