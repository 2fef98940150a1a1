use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hardsub")]
#[command(
    author,
    version,
    about = "Batch-encode a directory of episodes into web-playable MP4s with burned-in subtitles"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing the input files
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Print the encoder invocations instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Without a subcommand, encode every input in the directory
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe a media file and list its audio and subtitle streams
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output the stream descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that ffmpeg and ffprobe are available
    CheckTools,
}
