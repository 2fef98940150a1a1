//! Resolved track choices shared by the resolver and the flag builder.

use serde::{Deserialize, Serialize};

/// The audio stream chosen for a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioChoice {
    /// Position among the file's audio streams (`0:a:<index>`).
    pub index: usize,
    /// Codec name as reported by the prober; empty when the operator picked
    /// a position that does not exist.
    pub codec: String,
    pub channels: Option<u32>,
}

/// The subtitle stream chosen for a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleChoice {
    /// Position among the file's subtitle streams (`0:s:<index>`).
    pub index: usize,
    pub codec: String,
}

/// Audio and subtitle choice for one series. `None` means the series has
/// no stream of that kind and the output carries none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSelection {
    pub audio: Option<AudioChoice>,
    pub subtitle: Option<SubtitleChoice>,
}

impl TrackSelection {
    /// Codec name of the audio choice, or "none".
    pub fn audio_codec(&self) -> &str {
        self.audio.as_ref().map_or("none", |a| a.codec.as_str())
    }

    /// Codec name of the subtitle choice, or "none".
    pub fn subtitle_codec(&self) -> &str {
        self.subtitle.as_ref().map_or("none", |s| s.codec.as_str())
    }
}
