mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./hardsub.toml", "~/.config/hardsub/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.output_dir.as_os_str().is_empty() {
        anyhow::bail!("output_dir cannot be empty");
    }

    if config.extensions.is_empty() {
        anyhow::bail!("At least one input extension is required");
    }

    if config.extensions.iter().any(|e| e.is_empty() || e.starts_with('.')) {
        anyhow::bail!("Extensions must be given without a leading dot");
    }

    if config.video.max_height == 0 {
        anyhow::bail!("video.max_height cannot be 0");
    }

    if config.video.crf > 51 {
        anyhow::bail!("video.crf must be between 0 and 51");
    }

    if config.audio.channels == 0 {
        anyhow::bail!("audio.channels cannot be 0");
    }

    for (name, path) in [
        ("ffmpeg", &config.tools.ffmpeg_path),
        ("ffprobe", &config.tools.ffprobe_path),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Configured {} path does not exist: {:?}", name, path);
            }
        }
    }

    Ok(())
}
