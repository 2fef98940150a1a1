use hardsub_av::{AudioSettings, ToolPaths, VideoSettings};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Output directory, relative to the input directory unless absolute.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Input file extensions, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub video: VideoSettings,

    #[serde(default)]
    pub audio: AudioSettings,

    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("hardsubbed")
}

fn default_extensions() -> Vec<String> {
    vec!["mkv".to_string(), "mp4".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            extensions: default_extensions(),
            video: VideoSettings::default(),
            audio: AudioSettings::default(),
            tools: ToolsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}

impl ToolsConfig {
    pub fn paths(&self) -> ToolPaths {
        ToolPaths {
            ffmpeg: self.ffmpeg_path.clone(),
            ffprobe: self.ffprobe_path.clone(),
        }
    }
}
