//! Encoder invocation.

use crate::flags::{render, Flag};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Leading ffmpeg options: quiet banner, warnings only, but keep the
/// periodic status line so the operator sees progress.
const GLOBAL_ARGS: &[&str] = &["-hide_banner", "-loglevel", "warning", "-stats"];

/// One encode: input, flags and output, run from `working_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob {
    /// Directory the encoder runs in; `input` is resolved against it.
    pub working_dir: PathBuf,
    pub input: PathBuf,
    /// Video, audio and filter flags in that order.
    pub flags: Vec<Flag>,
    pub output: PathBuf,
}

impl EncodeJob {
    /// Arguments after the program name.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = GLOBAL_ARGS.iter().map(|s| s.to_string()).collect();
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().into_owned());
        args.extend(render(&self.flags));
        args.push(self.output.to_string_lossy().into_owned());
        args
    }

    /// The full invocation, for diagnostics.
    pub fn command_line(&self, program: &Path) -> Vec<String> {
        let mut line = vec![program.to_string_lossy().into_owned()];
        line.extend(self.args());
        line
    }
}

/// Result of an encoder run that did start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStatus {
    Success,
    /// Non-zero exit. `None` when the process was killed by a signal.
    Failed(Option<i32>),
}

impl EncodeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, EncodeStatus::Success)
    }
}

/// Something that can run an [`EncodeJob`].
pub trait Encoder {
    /// Run the job to completion. `Err` means the encoder could not be
    /// started at all.
    fn encode(&self, job: &EncodeJob) -> Result<EncodeStatus>;

    /// The invocation that `encode` runs, for reporting failures.
    fn describe(&self, job: &EncodeJob) -> Vec<String>;

    /// Whether the input must be staged under a filter-safe name first.
    /// Encoders that never read the input can skip the rename.
    fn needs_staging(&self) -> bool {
        true
    }
}

impl<E: Encoder + ?Sized> Encoder for &E {
    fn encode(&self, job: &EncodeJob) -> Result<EncodeStatus> {
        (**self).encode(job)
    }

    fn describe(&self, job: &EncodeJob) -> Vec<String> {
        (**self).describe(job)
    }

    fn needs_staging(&self) -> bool {
        (**self).needs_staging()
    }
}

/// Runs the `ffmpeg` CLI with inherited stdout/stderr.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg_path: PathBuf,
}

impl FfmpegEncoder {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Encoder for FfmpegEncoder {
    fn encode(&self, job: &EncodeJob) -> Result<EncodeStatus> {
        tracing::debug!("Running {:?}", self.describe(job));

        let status = Command::new(&self.ffmpeg_path)
            .args(job.args())
            .current_dir(&job.working_dir)
            .status()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found("ffmpeg")
                } else {
                    Error::Io(e)
                }
            })?;

        if status.success() {
            Ok(EncodeStatus::Success)
        } else {
            Ok(EncodeStatus::Failed(status.code()))
        }
    }

    fn describe(&self, job: &EncodeJob) -> Vec<String> {
        job.command_line(&self.ffmpeg_path)
    }
}

/// Prints the invocation instead of running it.
#[derive(Debug, Clone)]
pub struct DryRunEncoder {
    ffmpeg_path: PathBuf,
}

impl DryRunEncoder {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

impl Encoder for DryRunEncoder {
    fn encode(&self, job: &EncodeJob) -> Result<EncodeStatus> {
        println!("[DRY RUN] {}", self.describe(job).join(" "));
        Ok(EncodeStatus::Success)
    }

    fn describe(&self, job: &EncodeJob) -> Vec<String> {
        job.command_line(&self.ffmpeg_path)
    }

    fn needs_staging(&self) -> bool {
        false
    }
}
