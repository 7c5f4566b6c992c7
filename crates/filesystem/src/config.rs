//! Allowed-root configuration.
//!
//! The root is injected into [`FileAccess`](crate::ops::FileAccess) at
//! construction; only the binary reads the environment.

use crate::validate::normalize_lexical;
use std::path::PathBuf;

/// Environment variable naming the allowed root directory.
pub const ALLOWED_ROOT_ENV: &str = "MCP_ALLOWED_ROOT";

/// Serializes tests that read or change the process working directory.
#[cfg(test)]
pub(crate) static CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// The directory every file operation is confined to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowedRoot {
    /// A directory supplied by configuration.
    Fixed(PathBuf),
    /// The process working directory, looked up again on every call.
    #[default]
    WorkingDir,
}

impl AllowedRoot {
    /// A root fixed at `dir`.
    pub fn fixed(dir: impl Into<PathBuf>) -> Self {
        Self::Fixed(dir.into())
    }

    /// Use `dir` when configured and non-empty, the working directory otherwise.
    pub fn from_option(dir: Option<PathBuf>) -> Self {
        match dir {
            Some(dir) if !dir.as_os_str().is_empty() => Self::Fixed(dir),
            _ => Self::WorkingDir,
        }
    }

    /// Resolve to an absolute, lexically normalized directory.
    ///
    /// Relative fixed roots are anchored at the current working directory.
    pub fn resolve(&self) -> std::io::Result<PathBuf> {
        let dir = match self {
            Self::Fixed(dir) if dir.is_absolute() => dir.clone(),
            Self::Fixed(dir) => std::env::current_dir()?.join(dir),
            Self::WorkingDir => std::env::current_dir()?,
        };
        Ok(normalize_lexical(&dir))
    }
}
