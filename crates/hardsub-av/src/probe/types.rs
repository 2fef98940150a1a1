//! Stream descriptor types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of elementary stream inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    /// Data, attachment and anything else ffprobe may report.
    #[serde(other)]
    Other,
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CodecType::Video => "video",
            CodecType::Audio => "audio",
            CodecType::Subtitle => "subtitle",
            CodecType::Other => "other",
        };
        f.write_str(s)
    }
}

/// Optional stream tags. Missing tags stay `None` here; display defaults
/// are applied by whoever renders them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Metadata for one stream, in the order the prober reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub codec_type: CodecType,
    /// ffprobe codec name (e.g. "aac", "subrip", "hdmv_pgs_subtitle").
    #[serde(default)]
    pub codec_name: String,
    /// Channel count, only reported for audio streams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(default)]
    pub tags: StreamTags,
}

impl StreamDescriptor {
    /// Build an audio descriptor.
    pub fn audio(codec: impl Into<String>, channels: u32) -> Self {
        Self {
            codec_type: CodecType::Audio,
            codec_name: codec.into(),
            channels: Some(channels),
            tags: StreamTags::default(),
        }
    }

    /// Build a subtitle descriptor.
    pub fn subtitle(codec: impl Into<String>) -> Self {
        Self {
            codec_type: CodecType::Subtitle,
            codec_name: codec.into(),
            channels: None,
            tags: StreamTags::default(),
        }
    }

    /// Build a video descriptor.
    pub fn video(codec: impl Into<String>) -> Self {
        Self {
            codec_type: CodecType::Video,
            codec_name: codec.into(),
            channels: None,
            tags: StreamTags::default(),
        }
    }

    /// Set the title tag.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.tags.title = Some(title.into());
        self
    }

    /// Set the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.tags.language = Some(language.into());
        self
    }

    /// Title tag, or "No Title" when absent.
    pub fn display_title(&self) -> &str {
        self.tags.title.as_deref().unwrap_or("No Title")
    }

    /// Language tag, or "Unknown" when absent.
    pub fn display_language(&self) -> &str {
        self.tags.language.as_deref().unwrap_or("Unknown")
    }
}
