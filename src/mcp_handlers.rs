use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::web::Bytes;
use actix_web::{HttpResponse, Responder, web};
use futures::stream;
use tracing::{debug, error};

use crate::app::AppState;
use crate::mcp::MCPServer;
use crate::mcp::protocol::{MCPMessage, MessageParser};

/// Frame one JSON-RPC reply as a server-sent event.
fn sse_frame(message: &MCPMessage) -> Bytes {
    let json = match MessageParser::serialize_message(message) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize MCP reply: {}", e);
            br#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"failed to serialize reply"}}"#
                .to_vec()
        }
    };

    let mut frame = Vec::with_capacity(json.len() + 8);
    frame.extend_from_slice(b"data: ");
    frame.extend_from_slice(&json);
    frame.extend_from_slice(b"\n\n");
    Bytes::from(frame)
}

// POST /mcp: one JSON-RPC message in, its reply streamed back as a single SSE frame.
pub async fn mcp_endpoint(state: web::Data<AppState>, body: Bytes) -> impl Responder {
    let reply = match MessageParser::parse_message(&body) {
        Ok(message) => state.server.handle_message(message).await,
        Err(e) => {
            debug!("Rejecting malformed MCP message: {}", e);
            Some(MCPServer::parse_failure(e))
        }
    };

    let Some(reply) = reply else {
        // Notifications get no reply.
        return HttpResponse::Accepted().finish();
    };

    let frames = vec![Ok::<Bytes, actix_web::Error>(sse_frame(&reply))];
    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .streaming(stream::iter(frames))
}

// GET /mcp-status
pub async fn mcp_status(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.stats.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::configure_routes;
    use crate::config::ServiceConfig;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use tempfile::TempDir;

    async fn state_for(dir: &TempDir) -> web::Data<AppState> {
        let config = ServiceConfig {
            base_dir: dir.path().to_path_buf(),
            ..ServiceConfig::default()
        };
        web::Data::new(AppState::build(&config).await.unwrap())
    }

    fn parse_sse(body: &[u8]) -> Value {
        let text = std::str::from_utf8(body).unwrap();
        let payload = text
            .strip_prefix("data: ")
            .and_then(|rest| rest.strip_suffix("\n\n"))
            .unwrap();
        serde_json::from_str(payload).unwrap()
    }

    #[actix_web::test]
    async fn test_mcp_list_files_over_sse() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();
        let state = state_for(&dir).await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "list-files", "arguments": {"path": "."}}
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/event-stream"
        );

        let reply = parse_sse(&test::read_body(resp).await);
        assert_eq!(reply["id"], 1);
        assert_eq!(reply["result"]["structuredContent"]["totalSize"], 5);
    }

    #[actix_web::test]
    async fn test_malformed_body_gets_parse_error() {
        let dir = TempDir::new().unwrap();
        let state = state_for(&dir).await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_payload("{not json")
            .to_request();
        let reply = parse_sse(&test::call_and_read_body(&app, req).await);
        assert_eq!(reply["error"]["code"], -32700);
        assert_eq!(reply["id"], Value::Null);
    }

    #[actix_web::test]
    async fn test_notification_is_accepted_without_body() {
        let dir = TempDir::new().unwrap();
        let state = state_for(&dir).await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_json(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    #[actix_web::test]
    async fn test_status_counts_tool_calls_from_both_adapters() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();
        let state = state_for(&dir).await;
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/api/files/a.txt").to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_json(json!({
                "jsonrpc": "2.0",
                "id": "x",
                "method": "read-file",
                "params": {"path": "a.txt"}
            }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/mcp-status").to_request();
        let status: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(status["status"], "running");
        assert_eq!(status["requests_received"], 2);
        assert_eq!(status["last_request"], "read-file");
        assert_eq!(status["tool_calls"]["read-file"], 2);
        assert!(status["uptime_seconds"].as_i64().unwrap() >= 0);
    }
}
