//! Tool registrations for the sandboxed filesystem server.
//!
//! Each tool forwards to [`FileAccess`](crate::ops::FileAccess) and renders
//! the outcome as JSON: the success payload, or `{"error": "..."}` flagged as
//! a tool error.

use crate::FilesystemServer;
use crate::config::AllowedRoot;
use crate::error::FsError;
use crate::ops::{
    EditFileRequest, FileAccess, MakeDirRequest, OpenFileRequest, ReadFileRequest,
};
use rmcp::{handler::server::wrapper::Parameters, tool, tool_router};
use serde::Serialize;

#[tool_router]
impl FilesystemServer {
    /// Create a new filesystem server confined to `root`.
    pub fn new(root: AllowedRoot) -> Self {
        Self {
            access: FileAccess::new(root),
            tool_router: Self::tool_router(),
        }
    }

    /// Read the complete contents of a file.
    #[tool(description = "Open and read a file. Expects a path relative to the allowed root")]
    async fn open_file(
        &self,
        Parameters(params): Parameters<OpenFileRequest>,
    ) -> Result<String, String> {
        respond(self.access.open_file(params).await)
    }

    /// Read a byte range of a file.
    #[tool(
        description = "Read a portion of a file: up to `length` bytes starting at byte `offset` (default 0)"
    )]
    async fn read_file(
        &self,
        Parameters(params): Parameters<ReadFileRequest>,
    ) -> Result<String, String> {
        respond(self.access.read_file(params).await)
    }

    /// Overwrite a whole file or a byte range of it.
    #[tool(
        description = "Edit or replace part or all of a file. Offset 0 (default) replaces the whole file; any other offset overwrites bytes in place"
    )]
    async fn edit_file(
        &self,
        Parameters(params): Parameters<EditFileRequest>,
    ) -> Result<String, String> {
        respond(self.access.edit_file(params).await)
    }

    /// List the entries of the allowed root.
    #[tool(description = "List files and directories in the allowed root. Directories end with '/'")]
    async fn list_allowed_dir(&self) -> Result<String, String> {
        respond(self.access.list_allowed_dir().await)
    }

    /// Create a directory and its parents.
    #[tool(description = "Create a new directory, including missing parent directories")]
    async fn make_dir(
        &self,
        Parameters(params): Parameters<MakeDirRequest>,
    ) -> Result<String, String> {
        respond(self.access.make_dir(params).await)
    }
}

/// Render an operation outcome as a success payload or an `error` object.
fn respond<T: Serialize>(result: Result<T, FsError>) -> Result<String, String> {
    match result {
        Ok(payload) => serde_json::to_string(&payload).map_err(|e| error_json(&e.to_string())),
        Err(e) => Err(error_json(&e.to_string())),
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

#[cfg(test)]
mod tests {
    use crate::FilesystemServer;
    use crate::config::AllowedRoot;
    use crate::ops::{EditFileRequest, MakeDirRequest, OpenFileRequest, ReadFileRequest};
    use rmcp::handler::server::wrapper::Parameters;
    use serde_json::{Value, json};
    use std::fs;

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).expect("tool output should be JSON")
    }

    fn server() -> (tempfile::TempDir, FilesystemServer) {
        let tmp = tempfile::tempdir().unwrap();
        let server = FilesystemServer::new(AllowedRoot::fixed(tmp.path()));
        (tmp, server)
    }

    #[tokio::test]
    async fn open_file_returns_content_field() {
        let (tmp, server) = server();
        fs::write(tmp.path().join("foo.txt"), "hello world").unwrap();
        let result = server
            .open_file(Parameters(OpenFileRequest {
                path: Some("foo.txt".into()),
            }))
            .await;
        let text = result.expect("should succeed");
        assert_eq!(parse(&text), json!({ "content": "hello world" }));
    }

    #[tokio::test]
    async fn denied_path_returns_error_field_only() {
        let (_tmp, server) = server();
        let result = server
            .open_file(Parameters(OpenFileRequest {
                path: Some("../foo.txt".into()),
            }))
            .await;
        let body = parse(&result.unwrap_err());
        assert_eq!(body, json!({ "error": "access denied" }));
    }

    #[tokio::test]
    async fn missing_fields_are_reported_not_rejected() {
        let (_tmp, server) = server();
        let params: ReadFileRequest = serde_json::from_value(json!({ "path": "foo.txt" })).unwrap();
        let result = server.read_file(Parameters(params)).await;
        let body = parse(&result.unwrap_err());
        assert_eq!(body["error"], "missing required field 'length'");

        let params: EditFileRequest = serde_json::from_value(json!({ "path": "foo.txt" })).unwrap();
        let result = server.edit_file(Parameters(params)).await;
        let body = parse(&result.unwrap_err());
        assert_eq!(body["error"], "missing required field 'content'");

        let params: MakeDirRequest = serde_json::from_value(json!({})).unwrap();
        let result = server.make_dir(Parameters(params)).await;
        let body = parse(&result.unwrap_err());
        assert_eq!(body["error"], "missing required field 'path'");
    }

    #[tokio::test]
    async fn edit_then_read_range() {
        let (tmp, server) = server();
        let params: EditFileRequest =
            serde_json::from_value(json!({ "path": "log.txt", "content": "abcdefg" })).unwrap();
        let text = server.edit_file(Parameters(params)).await.unwrap();
        assert_eq!(parse(&text), json!({ "success": true }));

        let params: EditFileRequest = serde_json::from_value(
            json!({ "path": "log.txt", "content": "ZZZ", "offset": 2 }),
        )
        .unwrap();
        server.edit_file(Parameters(params)).await.unwrap();
        assert_eq!(
            fs::read_to_string(tmp.path().join("log.txt")).unwrap(),
            "abZZZfg"
        );

        let params: ReadFileRequest = serde_json::from_value(
            json!({ "path": "log.txt", "offset": 1, "length": 3 }),
        )
        .unwrap();
        let text = server.read_file(Parameters(params)).await.unwrap();
        assert_eq!(parse(&text), json!({ "content": "bZZ" }));
    }

    #[tokio::test]
    async fn io_error_message_is_surfaced() {
        let (_tmp, server) = server();
        let result = server
            .open_file(Parameters(OpenFileRequest {
                path: Some("missing.txt".into()),
            }))
            .await;
        let body = parse(&result.unwrap_err());
        let message = body["error"].as_str().unwrap();
        #[cfg(unix)]
        assert!(message.contains("No such file or directory"), "{message}");
        assert!(!message.is_empty());
        assert!(body.get("content").is_none());
    }

    #[tokio::test]
    async fn list_and_make_dir() {
        let (tmp, server) = server();
        fs::write(tmp.path().join("a.txt"), "1").unwrap();
        let params: MakeDirRequest =
            serde_json::from_value(json!({ "path": "newdir/subdir" })).unwrap();
        let text = server.make_dir(Parameters(params)).await.unwrap();
        assert_eq!(parse(&text), json!({ "success": true }));

        let text = server.list_allowed_dir().await.unwrap();
        let body = parse(&text);
        let mut files: Vec<&str> = body["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        files.sort();
        assert_eq!(files, ["a.txt", "newdir/"]);
    }
}
