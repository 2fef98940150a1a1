//! Stream probing.
//!
//! The [`Prober`] trait is the seam the batch planner consumes; the
//! [`FfprobeProber`] backend shells out to the ffprobe CLI and parses its
//! JSON output.

mod ffprobe;
mod types;

pub use ffprobe::{parse_ffprobe_output, FfprobeProber};
pub use types::*;

use crate::Result;
use std::path::Path;

/// A media file prober returning per-stream metadata.
pub trait Prober {
    /// Probe the file at `path`.
    ///
    /// Descriptors are returned in the container's stream order, which is
    /// the order operator choices index into.
    fn probe(&self, path: &Path) -> Result<Vec<StreamDescriptor>>;
}

impl<P: Prober + ?Sized> Prober for &P {
    fn probe(&self, path: &Path) -> Result<Vec<StreamDescriptor>> {
        (**self).probe(path)
    }
}
