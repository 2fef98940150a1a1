//! Typed ffmpeg flags.
//!
//! Each concern (video, audio, filter) produces an ordered list of [`Flag`]
//! tokens. They are turned into argv strings once, by [`render`], when the
//! encoder is invoked.

mod filter;

pub use filter::{
    is_picture_subtitle, FilterGraph, SubtitleBurn, PICTURE_SUBTITLE_CODECS, VIDEO_OUT,
};

use crate::selection::{AudioChoice, SubtitleChoice};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio codec selection for the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCodec {
    /// Remux the source stream as-is.
    Copy,
    /// Re-encode with the named ffmpeg encoder.
    Encode(String),
}

/// Target of a `-map` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamMap {
    /// The n-th audio stream of the first input.
    Audio(usize),
    /// A labelled filter graph output.
    Label(String),
}

impl fmt::Display for StreamMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamMap::Audio(index) => write!(f, "0:a:{index}"),
            StreamMap::Label(label) => write!(f, "[{label}]"),
        }
    }
}

/// One ffmpeg option together with its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flag {
    VideoCodec(String),
    Profile(String),
    Preset(String),
    Crf(u8),
    Tune(String),
    BFrames(u32),
    AqMode(u8),
    PixelFormat(String),
    AudioCodec(AudioCodec),
    AudioBitrate(String),
    AudioChannels(u32),
    Map(StreamMap),
    FilterComplex(FilterGraph),
}

impl Flag {
    /// Append this flag's argv tokens.
    pub fn push_args(&self, args: &mut Vec<String>) {
        let (name, value) = match self {
            Flag::VideoCodec(c) => ("-c:v", c.clone()),
            Flag::Profile(p) => ("-profile:v", p.clone()),
            Flag::Preset(p) => ("-preset:v", p.clone()),
            Flag::Crf(crf) => ("-crf", crf.to_string()),
            Flag::Tune(t) => ("-tune", t.clone()),
            Flag::BFrames(n) => ("-bf", n.to_string()),
            Flag::AqMode(m) => ("-aq-mode", m.to_string()),
            Flag::PixelFormat(p) => ("-pix_fmt", p.clone()),
            Flag::AudioCodec(AudioCodec::Copy) => ("-c:a", "copy".to_string()),
            Flag::AudioCodec(AudioCodec::Encode(c)) => ("-c:a", c.clone()),
            Flag::AudioBitrate(b) => ("-b:a", b.clone()),
            Flag::AudioChannels(n) => ("-ac", n.to_string()),
            Flag::Map(target) => ("-map", target.to_string()),
            Flag::FilterComplex(graph) => ("-filter_complex", graph.to_string()),
        };
        args.push(name.to_string());
        args.push(value);
    }
}

/// Render flags to argv strings, preserving order.
pub fn render(flags: &[Flag]) -> Vec<String> {
    let mut args = Vec::with_capacity(flags.len() * 2);
    for flag in flags {
        flag.push_args(&mut args);
    }
    args
}

/// Video encoder settings. Defaults target broadly compatible H.264 tuned
/// for animated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub codec: String,
    pub profile: String,
    pub preset: String,
    pub crf: u8,
    /// Content tuning hint; `None` omits `-tune`.
    pub tune: Option<String>,
    pub bframes: u32,
    pub aq_mode: u8,
    pub pix_fmt: String,
    /// Output height cap. Sources shorter than this are never upscaled.
    pub max_height: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            profile: "main".to_string(),
            preset: "veryslow".to_string(),
            crf: 18,
            tune: Some("animation".to_string()),
            bframes: 16,
            aq_mode: 2,
            pix_fmt: "yuv420p".to_string(),
            max_height: 720,
        }
    }
}

/// Audio re-encode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub codec: String,
    pub bitrate: String,
    pub channels: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            codec: "aac".to_string(),
            bitrate: "192k".to_string(),
            channels: 2,
        }
    }
}

/// Maps resolved track choices to encoder flags. All mappings are total.
#[derive(Debug, Clone, Default)]
pub struct FlagBuilder {
    video: VideoSettings,
    audio: AudioSettings,
}

impl FlagBuilder {
    pub fn new(video: VideoSettings, audio: AudioSettings) -> Self {
        Self { video, audio }
    }

    /// The fixed video encoder flags.
    pub fn video_flags(&self) -> Vec<Flag> {
        let v = &self.video;
        let mut flags = vec![
            Flag::VideoCodec(v.codec.clone()),
            Flag::Profile(v.profile.clone()),
            Flag::Preset(v.preset.clone()),
            Flag::Crf(v.crf),
        ];
        if let Some(tune) = &v.tune {
            flags.push(Flag::Tune(tune.clone()));
        }
        flags.extend([
            Flag::BFrames(v.bframes),
            Flag::AqMode(v.aq_mode),
            Flag::PixelFormat(v.pix_fmt.clone()),
        ]);
        flags
    }

    /// Audio flags: stream copy when the source already matches the target
    /// codec and channel layout, re-encode otherwise, nothing without audio.
    pub fn audio_flags(&self, choice: Option<&AudioChoice>) -> Vec<Flag> {
        let Some(choice) = choice else {
            return Vec::new();
        };
        let map = Flag::Map(StreamMap::Audio(choice.index));

        if choice.codec == self.audio.codec && choice.channels == Some(self.audio.channels) {
            return vec![Flag::AudioCodec(AudioCodec::Copy), map];
        }

        vec![
            Flag::AudioCodec(AudioCodec::Encode(self.audio.codec.clone())),
            Flag::AudioBitrate(self.audio.bitrate.clone()),
            Flag::AudioChannels(self.audio.channels),
            map,
        ]
    }

    /// Filter graph and output mapping. `source` is the path the text
    /// subtitle filter reads from.
    pub fn filter_flags(&self, choice: Option<&SubtitleChoice>, source: &str) -> Vec<Flag> {
        let graph = FilterGraph::new(
            SubtitleBurn::for_choice(choice, source),
            self.video.max_height,
        );
        vec![
            Flag::FilterComplex(graph),
            Flag::Map(StreamMap::Label(VIDEO_OUT.to_string())),
        ]
    }
}
