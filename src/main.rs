mod cli;

use hardsub::{config, planner::BatchPlanner, prompt::TerminalChooser, resolve::render_options};
use hardsub_av::{
    check_tools, tools, CodecType, DryRunEncoder, FfmpegEncoder, FfprobeProber, Prober,
    Toolchain,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    // Logs go to stderr; stdout carries prompts and listings.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "hardsub=debug,hardsub_av=debug".to_string()
        } else {
            "hardsub=info,hardsub_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config_or_default(cli.config.as_deref())?;

    match cli.command {
        None => run_batch(&cli.dir, &config, cli.dry_run),
        Some(Commands::Probe { file, json }) => probe_file(&file, &config, json),
        Some(Commands::CheckTools) => check_tools_cmd(&config),
    }
}

fn run_batch(dir: &Path, config: &config::Config, dry_run: bool) -> Result<()> {
    let planner = BatchPlanner::new(dir, config);

    let files = planner.prepare()?;
    if files.is_empty() {
        println!("No input files found in {}", dir.display());
        return Ok(());
    }

    let toolchain = Toolchain::locate(&config.tools.paths());
    tracing::debug!("Using {:?}", toolchain);

    let prober = FfprobeProber::new(&toolchain.ffprobe);
    let chooser = TerminalChooser::stdio();

    let report = if dry_run {
        planner.run_files(&files, &prober, chooser, &DryRunEncoder::new(&toolchain.ffmpeg))?
    } else {
        planner.run_files(&files, &prober, chooser, &FfmpegEncoder::new(&toolchain.ffmpeg))?
    };

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} files failed to encode: {}",
            report.failed.len(),
            files.len(),
            report.failed.join(", ")
        );
    }

    Ok(())
}

fn probe_file(file: &Path, config: &config::Config, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let ffprobe = tools::tool_path("ffprobe", config.tools.ffprobe_path.as_deref())?;
    let streams = FfprobeProber::new(ffprobe).probe(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&streams)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    for (label, codec_type) in [("Audio", CodecType::Audio), ("Subtitle", CodecType::Subtitle)] {
        let candidates: Vec<_> = streams
            .iter()
            .filter(|s| s.codec_type == codec_type)
            .collect();
        println!("\n{} streams: {}", label, candidates.len());
        for (line, stream) in render_options(&candidates).iter().zip(&candidates) {
            print!("  {} [{}", line, stream.codec_name);
            if let Some(channels) = stream.channels {
                print!(", {}ch", channels);
            }
            println!("]");
        }
    }

    Ok(())
}

fn check_tools_cmd(config: &config::Config) -> Result<()> {
    println!("Checking external tools...\n");

    let mut all_ok = true;
    for tool in check_tools(&config.tools.paths()) {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);
        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }
        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }
        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
        Ok(())
    } else {
        anyhow::bail!("ffmpeg and ffprobe are both required");
    }
}
