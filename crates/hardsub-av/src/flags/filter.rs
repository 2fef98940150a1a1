//! Filter graphs for subtitle burn-in.

use crate::selection::SubtitleChoice;
use std::fmt;

/// Subtitle codecs that carry bitmaps rather than text. These have to be
/// composited with `overlay`; the `subtitles` filter only renders text.
pub const PICTURE_SUBTITLE_CODECS: &[&str] = &[
    "dvd_subtitle",
    "hdmv_pgs_subtitle",
    "dvb_subtitle",
    "xsub",
];

/// Label of the burned-in video before scaling.
const BURNED: &str = "burned";

/// Label of the graph's final video output.
pub const VIDEO_OUT: &str = "v";

/// How subtitles get into the picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleBurn {
    /// No subtitles; video passes through untouched.
    Passthrough,
    /// Composite a picture-based subtitle stream over the video.
    Overlay { index: usize },
    /// Render a text subtitle stream. The filter opens the container itself,
    /// so it needs the source path rather than a demuxed stream.
    Text { source: String, index: usize },
}

impl SubtitleBurn {
    /// Pick the burn strategy for a subtitle choice read from `source`.
    pub fn for_choice(choice: Option<&SubtitleChoice>, source: &str) -> Self {
        match choice {
            None => SubtitleBurn::Passthrough,
            Some(c) if is_picture_subtitle(&c.codec) => SubtitleBurn::Overlay { index: c.index },
            Some(c) => SubtitleBurn::Text {
                source: source.to_string(),
                index: c.index,
            },
        }
    }
}

/// Whether `codec` is a bitmap subtitle format.
pub fn is_picture_subtitle(codec: &str) -> bool {
    PICTURE_SUBTITLE_CODECS.contains(&codec)
}

/// A complete `-filter_complex` graph: subtitle stage, then a downscale to
/// at most `max_height` lines with the width kept a multiple of 16.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGraph {
    pub burn: SubtitleBurn,
    pub max_height: u32,
}

impl FilterGraph {
    pub fn new(burn: SubtitleBurn, max_height: u32) -> Self {
        Self { burn, max_height }
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.burn {
            SubtitleBurn::Passthrough => write!(f, "[0:v]null[{BURNED}];")?,
            SubtitleBurn::Overlay { index } => {
                write!(f, "[0:v][0:s:{index}]overlay[{BURNED}];")?
            }
            SubtitleBurn::Text { source, index } => {
                write!(f, "[0:v]subtitles={source}:si={index}[{BURNED}];")?
            }
        }
        write!(
            f,
            "[{BURNED}]scale=-16:'min({},ih)'[{VIDEO_OUT}]",
            self.max_height
        )
    }
}
