use actix_files::NamedFile;
use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::app::AppState;
use crate::models::{ErrorBody, ErrorKind, FileContent, ProjectListing};
use crate::workspace::WorkspaceError;

/// Query of `GET /api/files`. The web UI lists one level at a time, so the
/// defaults here are shallower than the tool's.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesQuery {
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default = "default_max_depth", alias = "max_depth")]
    pub max_depth: usize,
}

fn default_path() -> String {
    ".".to_string()
}

fn default_max_depth() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct WriteFileRequest {
    pub path: String,
    pub content: String,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound | ErrorKind::UnknownTool => StatusCode::NOT_FOUND,
        ErrorKind::OutsideRoot | ErrorKind::PermissionDenied | ErrorKind::CommandDisabled => {
            StatusCode::FORBIDDEN
        }
        ErrorKind::InvalidParams
        | ErrorKind::NotADirectory
        | ErrorKind::NotAFile
        | ErrorKind::InvalidEncoding => StatusCode::BAD_REQUEST,
        ErrorKind::DirectoryNotEmpty => StatusCode::CONFLICT,
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Io | ErrorKind::CommandFailed | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: WorkspaceError) -> HttpResponse {
    let kind = error.kind();
    let status = status_for(kind);
    if status.is_server_error() {
        warn!("Request failed: {}", error);
    } else {
        debug!("Request rejected: {}", error);
    }
    HttpResponse::build(status).json(ErrorBody::new(kind, error.to_string()))
}

fn invalid_input(message: String) -> HttpResponse {
    debug!("Rejected request input: {}", message);
    HttpResponse::BadRequest().json(ErrorBody::new(ErrorKind::InvalidParams, message))
}

/// Malformed JSON bodies get the same error body as every other failure.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = invalid_input(err.to_string());
    InternalError::from_response(err, response).into()
}

/// Malformed query strings get the same error body as every other failure.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = invalid_input(err.to_string());
    InternalError::from_response(err, response).into()
}

// GET /api/projects
pub async fn list_projects(state: web::Data<AppState>) -> impl Responder {
    state.stats.record_tool_call("list-projects");
    match state.workspace.list_projects().await {
        Ok(projects) => HttpResponse::Ok().json(ProjectListing { projects }),
        Err(e) => error_response(e),
    }
}

// GET /api/files?path=.&recursive=false&maxDepth=1
pub async fn list_files(
    state: web::Data<AppState>,
    query: web::Query<ListFilesQuery>,
) -> impl Responder {
    state.stats.record_tool_call("list-files");
    match state
        .workspace
        .list_files(&query.path, query.recursive, query.max_depth)
        .await
    {
        Ok(listing) => HttpResponse::Ok().json(listing),
        Err(e) => error_response(e),
    }
}

// GET /api/files/{path}
pub async fn read_file(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    state.stats.record_tool_call("read-file");
    match state.workspace.read_file(&path).await {
        Ok(content) => HttpResponse::Ok().json(FileContent { content }),
        Err(e) => error_response(e),
    }
}

// GET /api/files/raw/{path}
pub async fn raw_file(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let resolved = match state.workspace.resolve_file(&path).await {
        Ok(resolved) => resolved,
        Err(e) => return error_response(e),
    };

    match NamedFile::open_async(&resolved).await {
        Ok(file) => {
            let mime = mime_guess::from_path(&resolved).first_or_octet_stream();
            file.set_content_type(mime).into_response(&req)
        }
        Err(e) => error_response(WorkspaceError::Io {
            path: path.into_inner(),
            source: e,
        }),
    }
}

// POST /api/files
pub async fn write_file(
    state: web::Data<AppState>,
    body: web::Json<WriteFileRequest>,
) -> impl Responder {
    state.stats.record_tool_call("write-file");
    match state.workspace.write_file(&body.path, &body.content).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(e),
    }
}

// DELETE /api/files/{path}
pub async fn delete_path(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    state.stats.record_tool_call("delete-path");
    match state.workspace.delete_path(&path).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(e),
    }
}
