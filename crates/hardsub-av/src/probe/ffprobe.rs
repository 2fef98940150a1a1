//! FFprobe-based stream probing.

use super::types::StreamDescriptor;
use super::Prober;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Stream fields and tags requested from ffprobe.
const SHOW_ENTRIES: &str = "stream=codec_type,codec_name,channels:stream_tags=language,title";

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<StreamDescriptor>,
}

/// A prober backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: PathBuf,
}

impl FfprobeProber {
    /// Create a new prober using the given ffprobe path.
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Arguments passed to ffprobe for `path`.
    fn args(path: &Path) -> Vec<String> {
        vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-i".into(),
            path.to_string_lossy().into_owned(),
            "-show_entries".into(),
            SHOW_ENTRIES.into(),
            "-of".into(),
            "json".into(),
        ]
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl Prober for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<Vec<StreamDescriptor>> {
        tracing::debug!("Probing {:?} with {:?}", path, self.ffprobe_path);

        let output = Command::new(&self.ffprobe_path)
            .args(Self::args(path))
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found("ffprobe")
                } else {
                    Error::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool_failed(
                "ffprobe",
                format!("probe failed with {}: {}", output.status, stderr.trim()),
            ));
        }

        let json_str = String::from_utf8(output.stdout)
            .map_err(|e| Error::parse_error("ffprobe", format!("Invalid UTF-8: {}", e)))?;

        parse_ffprobe_output(&json_str)
    }
}

/// Parse ffprobe's JSON document into descriptors, keeping stream order.
pub fn parse_ffprobe_output(json: &str) -> Result<Vec<StreamDescriptor>> {
    let output: FfprobeOutput = serde_json::from_str(json)?;
    Ok(output.streams)
}
