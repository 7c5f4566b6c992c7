//! The file operations, each confined to the allowed root.
//!
//! Offsets and lengths are measured in bytes. Range reads decode the
//! extracted byte span as UTF-8 after reading it, so a span that splits a
//! multi-byte character is reported as an I/O error.

use crate::config::AllowedRoot;
use crate::error::FsError;
use crate::validate::resolve_path;
use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use std::io::{self, SeekFrom};
use std::path::PathBuf;
use tokio::fs::{DirEntry, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, warn};

/// Parameters for reading a whole file.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct OpenFileRequest {
    /// Path of the file, relative to the allowed root.
    pub path: Option<String>,
}

/// Parameters for reading a byte range of a file.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ReadFileRequest {
    /// Path of the file, relative to the allowed root.
    pub path: Option<String>,
    /// Byte offset to start reading at. Defaults to 0.
    pub offset: Option<u64>,
    /// Maximum number of bytes to read.
    pub length: Option<u64>,
}

/// Parameters for overwriting a file or a byte range of it.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct EditFileRequest {
    /// Path of the file, relative to the allowed root.
    pub path: Option<String>,
    /// Text to write. May be empty.
    pub content: Option<String>,
    /// Byte offset to write at. 0 replaces the whole file.
    pub offset: Option<u64>,
}

/// Parameters for creating a directory.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct MakeDirRequest {
    /// Path of the directory, relative to the allowed root.
    pub path: Option<String>,
}

/// Text read from a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    pub content: String,
}

/// Entries of the allowed root. Directories carry a trailing `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub files: Vec<String>,
}

/// Acknowledgement of a completed write or mkdir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    const OK: Self = Self { success: true };
}

/// File operations confined to one allowed root.
///
/// Holds no state besides the root, so a handle for a different root is a
/// cheap [`FileAccess::new`] away.
#[derive(Debug, Clone, Default)]
pub struct FileAccess {
    root: AllowedRoot,
}

impl FileAccess {
    /// Create a service confined to `root`.
    pub fn new(root: AllowedRoot) -> Self {
        Self { root }
    }

    /// Read the complete contents of a text file.
    pub async fn open_file(&self, req: OpenFileRequest) -> Result<FileContent, FsError> {
        let path = required(req.path, "path")?;
        let target = self.resolve(&path)?;
        debug!(path = %path, "open_file");

        let content = tokio::fs::read_to_string(&target).await?;
        Ok(FileContent { content })
    }

    /// Read up to `length` bytes starting at `offset`.
    ///
    /// Returns fewer bytes when end-of-file comes first, and an empty string
    /// when `offset` is at or past the end.
    pub async fn read_file(&self, req: ReadFileRequest) -> Result<FileContent, FsError> {
        let path = required(req.path, "path")?;
        let length = required(req.length, "length")?;
        let offset = req.offset.unwrap_or(0);
        let target = self.resolve(&path)?;
        debug!(path = %path, offset, length, "read_file");

        let mut file = File::open(&target).await?;
        file.seek(SeekFrom::Start(offset)).await?;
        let mut buf = Vec::new();
        file.take(length).read_to_end(&mut buf).await?;

        let content =
            String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(FileContent { content })
    }

    /// Replace a file, or overwrite bytes in place.
    ///
    /// With offset 0 the file is created or truncated and `content` becomes
    /// its entire contents. Any other offset requires an existing file; the
    /// UTF-8 bytes of `content` overwrite the same number of bytes at that
    /// position and nothing else changes. Writing past end-of-file leaves
    /// whatever gap the filesystem produces (zeros on POSIX).
    pub async fn edit_file(&self, req: EditFileRequest) -> Result<Success, FsError> {
        let path = required(req.path, "path")?;
        let content = required(req.content, "content")?;
        let offset = req.offset.unwrap_or(0);
        let target = self.resolve(&path)?;
        debug!(path = %path, offset, bytes = content.len(), "edit_file");

        if offset == 0 {
            tokio::fs::write(&target, content).await?;
            return Ok(Success::OK);
        }

        let mut file = OpenOptions::new().read(true).write(true).open(&target).await?;
        file.seek(SeekFrom::Start(offset)).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(Success::OK)
    }

    /// List the direct entries of the allowed root, in enumeration order.
    ///
    /// Names that are not valid UTF-8 are rendered lossily (U+FFFD for the
    /// invalid bytes) and logged at `warn`.
    pub async fn list_allowed_dir(&self) -> Result<Listing, FsError> {
        let root = self.root.resolve()?;
        debug!(root = %root.display(), "list_allowed_dir");

        let mut files = Vec::new();
        let mut read_dir = tokio::fs::read_dir(&root).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(name = ?raw, "directory entry name is not valid UTF-8");
                    raw.to_string_lossy().into_owned()
                }
            };
            if is_dir(&entry).await? {
                files.push(format!("{name}/"));
            } else {
                files.push(name);
            }
        }
        Ok(Listing { files })
    }

    /// Create a directory and any missing parents.
    pub async fn make_dir(&self, req: MakeDirRequest) -> Result<Success, FsError> {
        let path = required(req.path, "path")?;
        let target = self.resolve(&path)?;
        debug!(path = %path, "make_dir");

        tokio::fs::create_dir_all(&target).await?;
        Ok(Success::OK)
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FsError> {
        let root = self.root.resolve()?;
        resolve_path(&root, path).inspect_err(|_| warn!(path, "path escapes allowed root"))
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, FsError> {
    value.ok_or(FsError::MissingField(field))
}

/// Symlinks count as directories when their target is one.
async fn is_dir(entry: &DirEntry) -> io::Result<bool> {
    let file_type = entry.file_type().await?;
    if file_type.is_symlink() {
        return Ok(tokio::fs::metadata(entry.path())
            .await
            .is_ok_and(|meta| meta.is_dir()));
    }
    Ok(file_type.is_dir())
}
