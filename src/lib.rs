// This file exposes the modules as public modules in the crate

pub mod app;
pub mod command;
pub mod config;
pub mod file_handlers;
pub mod lifecycle;
pub mod logging;
pub mod mcp;
pub mod mcp_handlers;
pub mod models;
pub mod stats;
pub mod workspace;
