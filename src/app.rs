use actix_files::NamedFile;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::command::CommandRunner;
use crate::config::ServiceConfig;
use crate::file_handlers;
use crate::lifecycle::RestartSignal;
use crate::mcp::MCPServer;
use crate::mcp::errors::MCPError;
use crate::mcp::tools::command::RunCommandTool;
use crate::mcp::tools::filesystem::{
    DeletePathTool, ListFilesTool, ListProjectsTool, ReadFileTool, WriteFileTool,
};
use crate::mcp::tools::lifecycle::RebootServerTool;
use crate::mcp::tools::{ExecutionContext, ToolCategory, ToolRegistry};
use crate::mcp_handlers;
use crate::stats::StatsRecorder;
use crate::workspace::{PathPolicy, Workspace, WorkspaceError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("failed to register tools: {0}")]
    Tools(#[from] MCPError),
}

/// Services shared by every adapter
pub struct AppState {
    pub workspace: Arc<Workspace>,
    pub stats: Arc<StatsRecorder>,
    pub restart: RestartSignal,
    pub server: Arc<MCPServer>,
    pub frontend_dir: PathBuf,
}

impl AppState {
    pub async fn build(config: &ServiceConfig) -> Result<Self, StartupError> {
        let workspace = Arc::new(Workspace::new(&config.base_dir, config.path_policy)?);
        let commands = Arc::new(CommandRunner::new(
            config.commands_enabled,
            config.command_timeout(),
        ));
        let stats = Arc::new(StatsRecorder::new());
        let restart = RestartSignal::new();

        let registry = Arc::new(ToolRegistry::new());
        register_builtin_tools(&registry).await?;

        let context = ExecutionContext::new(
            workspace.clone(),
            commands,
            restart.clone(),
            stats.clone(),
        );

        info!(
            "Serving {} ({:?} paths)",
            workspace.base_dir().display(),
            workspace.policy()
        );
        if workspace.policy() == PathPolicy::Unrestricted {
            warn!("Path policy is unrestricted: '..' and absolute paths reach outside the base directory");
        }
        let shell_tools = registry.tools_in_category(ToolCategory::Shell).await;
        if config.commands_enabled {
            warn!(
                "Shell tools enabled ({}): any caller can run commands as this user",
                shell_tools.join(", ")
            );
        } else {
            info!("Shell tools disabled: {}", shell_tools.join(", "));
        }

        Ok(Self {
            workspace,
            stats,
            restart,
            server: Arc::new(MCPServer::new(registry, context)),
            frontend_dir: config.frontend_dir.clone(),
        })
    }
}

async fn register_builtin_tools(registry: &ToolRegistry) -> Result<(), MCPError> {
    registry.register_tool(Box::new(ListProjectsTool)).await?;
    registry.register_tool(Box::new(ListFilesTool)).await?;
    registry.register_tool(Box::new(ReadFileTool)).await?;
    registry.register_tool(Box::new(WriteFileTool)).await?;
    registry.register_tool(Box::new(DeletePathTool)).await?;
    registry.register_tool(Box::new(RunCommandTool)).await?;
    registry.register_tool(Box::new(RebootServerTool)).await?;

    info!("Registered {} built-in tools", registry.list_tools().await.len());
    Ok(())
}

/// Mount every route. The raw-file route must be registered before the
/// catch-all `{path}` routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(file_handlers::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(file_handlers::query_error_handler))
        .route("/", web::get().to(index_page))
        .route("/files", web::get().to(files_page))
        .route("/monitor", web::get().to(monitor_page))
        .route("/mcp", web::post().to(mcp_handlers::mcp_endpoint))
        .route("/mcp-status", web::get().to(mcp_handlers::mcp_status))
        .service(
            web::scope("/api")
                .route("/projects", web::get().to(file_handlers::list_projects))
                .route("/files", web::get().to(file_handlers::list_files))
                .route("/files", web::post().to(file_handlers::write_file))
                .route("/files/raw/{path:.*}", web::get().to(file_handlers::raw_file))
                .route("/files/{path:.*}", web::get().to(file_handlers::read_file))
                .route("/files/{path:.*}", web::delete().to(file_handlers::delete_path)),
        );
}

async fn serve_page(req: &HttpRequest, state: &AppState, page: &str) -> HttpResponse {
    let path = state.frontend_dir.join(page);
    match NamedFile::open_async(&path).await {
        Ok(file) => file.into_response(req),
        Err(e) => {
            warn!("Missing page {}: {}", path.display(), e);
            HttpResponse::NotFound().body(format!("page not found: {}", page))
        }
    }
}

async fn index_page(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    serve_page(&req, &state, "index.html").await
}

async fn files_page(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    serve_page(&req, &state, "files.html").await
}

async fn monitor_page(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    serve_page(&req, &state, "monitor.html").await
}
