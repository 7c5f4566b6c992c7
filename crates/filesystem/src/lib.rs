//! MCP server exposing file tools confined to a single allowed root.
//!
//! Caller paths are resolved lexically against the root by [`validate`];
//! anything that would land outside it is refused before any I/O happens.
//! The operations live in [`ops`] and are registered as tools in [`tools`].

use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool_handler,
};
pub mod config;
pub mod error;
pub mod ops;
pub mod tools;
pub mod validate;

pub use config::AllowedRoot;
pub use error::FsError;
pub use ops::FileAccess;

/// MCP server whose file tools never leave the allowed root.
#[derive(Debug, Clone)]
pub struct FilesystemServer {
    pub(crate) access: FileAccess,
    pub(crate) tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for FilesystemServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sandbox-fs".into(),
                title: Some("Sandboxed Filesystem MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "File and directory tools confined to one allowed root. Paths are relative to that root."
                    .into(),
            ),
        }
    }
}
