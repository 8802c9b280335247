/// Model Context Protocol (MCP) implementation
///
/// JSON-RPC 2.0 messages, the tool registry and the dispatcher that serves
/// them over HTTP (`/mcp`) or newline-delimited stdio.
pub mod errors;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

// Re-export core types for easier access
pub use self::{server::MCPServer, tools::MCPTool, transport::MCPTransport};

/// MCP Protocol version implemented by this server
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server information
pub const SERVER_NAME: &str = "filedesk";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
