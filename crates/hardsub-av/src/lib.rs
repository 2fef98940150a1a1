//! # hardsub-av
//!
//! External tool plumbing for hardsub.
//!
//! This crate provides:
//! - Stream probing via ffprobe ([`probe::FfprobeProber`])
//! - Typed ffmpeg flags and subtitle burn-in filter graphs ([`flags`])
//! - Encoder invocation ([`encode::FfmpegEncoder`])
//! - Filter-safe staging of input files ([`StagedInput`])
//! - Tool discovery ([`tools`])
//!
//! ## Example
//!
//! ```no_run
//! use hardsub_av::probe::{FfprobeProber, Prober};
//!
//! let streams = FfprobeProber::default().probe("/path/to/video.mkv".as_ref())?;
//! for stream in &streams {
//!     println!("{} {}", stream.codec_type, stream.codec_name);
//! }
//! # Ok::<(), hardsub_av::Error>(())
//! ```

pub mod encode;
mod error;
pub mod flags;
pub mod probe;
pub mod selection;
pub mod staging;
pub mod tools;

// Re-exports
pub use encode::{DryRunEncoder, EncodeJob, EncodeStatus, Encoder, FfmpegEncoder};
pub use error::{Error, Result};
pub use flags::{AudioSettings, Flag, FlagBuilder, VideoSettings};
pub use probe::{CodecType, FfprobeProber, Prober, StreamDescriptor, StreamTags};
pub use selection::{AudioChoice, SubtitleChoice, TrackSelection};
pub use staging::StagedInput;
pub use tools::{check_tool, check_tools, require_tool, ToolInfo, ToolPaths, Toolchain};
