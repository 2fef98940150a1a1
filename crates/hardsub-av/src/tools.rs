//! Locating ffmpeg and ffprobe.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Tools a batch run needs.
pub const REQUIRED_TOOLS: &[&str] = &["ffmpeg", "ffprobe"];

/// Availability of an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub available: bool,
    /// First line of the tool's `-version` output.
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

/// Check a tool, preferring `configured` when it exists.
///
/// # Example
///
/// ```no_run
/// use hardsub_av::check_tool;
///
/// let info = check_tool("ffprobe", None);
/// if info.available {
///     println!("ffprobe version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str, configured: Option<&Path>) -> ToolInfo {
    let Ok(path) = tool_path(name, configured) else {
        return ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        };
    };

    // Both tools print their version banner for `-version`.
    let version = Command::new(&path)
        .arg("-version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| {
            String::from_utf8_lossy(&o.stdout)
                .lines()
                .next()
                .map(|s| s.to_string())
        });

    ToolInfo {
        name: name.to_string(),
        available: version.is_some(),
        version,
        path: Some(path),
    }
}

/// Check ffmpeg and ffprobe.
pub fn check_tools(paths: &ToolPaths) -> Vec<ToolInfo> {
    vec![
        check_tool("ffmpeg", paths.ffmpeg.as_deref()),
        check_tool("ffprobe", paths.ffprobe.as_deref()),
    ]
}

/// Require that a tool is on `PATH`, returning its location.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Resolve a tool, using `configured` if that file exists and falling back
/// to a `PATH` lookup otherwise.
pub fn tool_path(name: &str, configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(
            "Configured {} path {:?} does not exist, searching PATH",
            name,
            path
        );
    }

    require_tool(name)
}

/// Optional tool overrides, usually from configuration.
#[derive(Debug, Clone, Default)]
pub struct ToolPaths {
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
}

/// Locations of both tools for a batch run.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Toolchain {
    /// Locate both tools. A tool that cannot be found is kept under its bare
    /// name, so running it fails with [`Error::ToolNotFound`] for each file
    /// instead of before the batch starts.
    pub fn locate(paths: &ToolPaths) -> Self {
        Self {
            ffmpeg: locate_tool("ffmpeg", paths.ffmpeg.as_deref()),
            ffprobe: locate_tool("ffprobe", paths.ffprobe.as_deref()),
        }
    }
}

fn locate_tool(name: &str, configured: Option<&Path>) -> PathBuf {
    tool_path(name, configured).unwrap_or_else(|e| {
        tracing::warn!("{}; files that need {} will fail", e, name);
        PathBuf::from(name)
    })
}
