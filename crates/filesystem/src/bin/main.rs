//! Binary entry point for the sandbox-fs MCP server.

use clap::Parser;
use rmcp::ServiceExt;
use sandbox_fs::{AllowedRoot, FilesystemServer, config::ALLOWED_ROOT_ENV};
use std::path::PathBuf;

/// Sandboxed filesystem MCP server, file tools confined to one directory.
#[derive(Parser)]
#[command(name = "sandbox-fs", version, about)]
struct Cli {
    /// Directory every operation is confined to. Defaults to the working
    /// directory at the time of each call.
    #[arg(long, env = ALLOWED_ROOT_ENV)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }
    let cli = Cli::parse();
    let root = AllowedRoot::from_option(cli.root);
    tracing::info!(?root, "starting sandbox-fs");

    let server = FilesystemServer::new(root);
    let transport = rmcp::transport::stdio();
    server
        .serve(transport)
        .await
        .expect("failed to start server")
        .waiting()
        .await
        .expect("server error");
}
