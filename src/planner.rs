//! Two-pass batch planning.
//!
//! Pass 1 probes one representative file per series and resolves its track
//! selection, prompting where needed. Pass 2 encodes every file with its
//! series' selection. All prompts happen before the first encode starts.

use crate::config::Config;
use crate::key::SeriesKey;
use crate::resolve::{Chooser, TrackResolver};
use anyhow::{Context, Result};
use hardsub_av::{
    EncodeJob, EncodeStatus, Encoder, FlagBuilder, Prober, StagedInput, TrackSelection,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of every output file.
const OUTPUT_EXTENSION: &str = "mp4";

/// Track selections for every series in a batch. Built by
/// [`BatchPlanner::resolve_all`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChosenTracks {
    tracks: HashMap<SeriesKey, TrackSelection>,
}

impl ChosenTracks {
    pub fn get(&self, key: &SeriesKey) -> Option<&TrackSelection> {
        self.tracks.get(key)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Outcome of the encode pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub encoded: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchReport {
    /// True when no file failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Plans and runs a batch over one input directory.
#[derive(Debug, Clone)]
pub struct BatchPlanner {
    input_dir: PathBuf,
    /// As configured; relative paths are relative to `input_dir`.
    output_dir: PathBuf,
    extensions: Vec<String>,
    flags: FlagBuilder,
}

impl BatchPlanner {
    pub fn new(input_dir: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: config.output_dir.clone(),
            extensions: config.extensions.clone(),
            flags: FlagBuilder::new(config.video.clone(), config.audio.clone()),
        }
    }

    /// Where outputs are written.
    pub fn output_dir(&self) -> PathBuf {
        self.input_dir.join(&self.output_dir)
    }

    /// Init: create the output directory and list the inputs. Failing to
    /// create the directory aborts the batch.
    pub fn prepare(&self) -> Result<Vec<String>> {
        let output_dir = self.output_dir();
        if !output_dir.is_dir() {
            std::fs::create_dir_all(&output_dir).with_context(|| {
                format!("Failed to create output directory {:?}", output_dir)
            })?;
            tracing::debug!("Created output directory {:?}", output_dir);
        }

        self.discover()
    }

    /// Input file names in the input directory, sorted lexicographically.
    pub fn discover(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.input_dir).min_depth(1).max_depth(1) {
            let entry = entry
                .with_context(|| format!("Failed to list input directory {:?}", self.input_dir))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted == ext));
            if !matches {
                continue;
            }

            match entry.file_name().to_str() {
                Some(name) => files.push(name.to_string()),
                None => tracing::warn!("Skipping non UTF-8 file name {:?}", path),
            }
        }

        files.sort();
        tracing::info!("Found {} input files in {:?}", files.len(), self.input_dir);
        Ok(files)
    }

    /// Pass 1: probe and resolve one representative per series.
    ///
    /// A probe that fails to run is treated as a file with no audio and no
    /// subtitle streams. Output that cannot be parsed aborts the batch.
    pub fn resolve_all<P: Prober, C: Chooser>(
        &self,
        files: &[String],
        prober: &P,
        resolver: &mut TrackResolver<C>,
    ) -> Result<ChosenTracks> {
        let mut tracks = HashMap::new();

        for file in files {
            let key = SeriesKey::from_file_name(file);
            if tracks.contains_key(&key) {
                continue;
            }

            let path = self.input_dir.join(file);
            let streams = match prober.probe(&path) {
                Ok(streams) => streams,
                Err(e) if e.is_tool_failure() => {
                    tracing::error!("{}: {}", file, e);
                    tracing::warn!("{}: continuing as if it had no audio or subtitle streams", key);
                    Vec::new()
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to probe {:?}", path));
                }
            };

            let selection = resolver.resolve(&key, &streams)?;
            tracks.insert(key, selection);
        }

        Ok(ChosenTracks { tracks })
    }

    /// Pass 2: encode every file with its series' selection. Failures are
    /// reported and the batch moves on.
    pub fn encode_all<E: Encoder>(
        &self,
        files: &[String],
        tracks: &ChosenTracks,
        encoder: &E,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for file in files {
            tracing::info!("Encoding {}...", file);

            if self.encode_one(file, tracks, encoder) {
                tracing::info!("Done: {}", file);
                report.encoded.push(file.clone());
            } else {
                report.failed.push(file.clone());
            }
        }

        report
    }

    fn encode_one<E: Encoder>(&self, file: &str, tracks: &ChosenTracks, encoder: &E) -> bool {
        let key = SeriesKey::from_file_name(file);
        let Some(selection) = tracks.get(&key) else {
            tracing::error!(
                "{}: no track selection for series {:?}, skipping file",
                file,
                key.as_str()
            );
            return false;
        };

        let staged = if encoder.needs_staging() {
            match StagedInput::new(&self.input_dir, file) {
                Ok(staged) => Some(staged),
                Err(e) => {
                    tracing::error!("{}; skipping file", e);
                    return false;
                }
            }
        } else {
            None
        };

        let input = staged.as_ref().map_or(file, |s| s.file_name());
        let job = self.job_for(file, input, selection);
        let succeeded = match encoder.encode(&job) {
            Ok(EncodeStatus::Success) => true,
            Ok(EncodeStatus::Failed(code)) => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                tracing::error!(
                    "encode failed with exit code {}: {}",
                    code,
                    encoder.describe(&job).join(" ")
                );
                false
            }
            Err(e) => {
                tracing::error!(
                    "{}: {}; skipping file (invocation: {})",
                    file,
                    e,
                    encoder.describe(&job).join(" ")
                );
                false
            }
        };

        if let Some(staged) = staged {
            if let Err(e) = staged.restore() {
                tracing::error!("{}", e);
            }
        }

        succeeded
    }

    /// Build the encode job for `file`, read under the name `input`.
    pub fn job_for(&self, file: &str, input: &str, selection: &TrackSelection) -> EncodeJob {
        let mut flags = self.flags.video_flags();
        flags.extend(self.flags.audio_flags(selection.audio.as_ref()));
        flags.extend(self.flags.filter_flags(selection.subtitle.as_ref(), input));

        EncodeJob {
            working_dir: self.input_dir.clone(),
            input: PathBuf::from(input),
            flags,
            output: self.output_path(file),
        }
    }

    /// `<output_dir>/<stem>.mp4`, relative to the input directory.
    pub fn output_path(&self, file: &str) -> PathBuf {
        let stem = Path::new(file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.to_string());
        self.output_dir.join(format!("{}.{}", stem, OUTPUT_EXTENSION))
    }

    /// Passes 1 and 2 over already discovered files.
    pub fn run_files<P: Prober, C: Chooser, E: Encoder>(
        &self,
        files: &[String],
        prober: &P,
        chooser: C,
        encoder: &E,
    ) -> Result<BatchReport> {
        let mut resolver = TrackResolver::new(chooser);
        let tracks = self.resolve_all(files, prober, &mut resolver)?;
        tracing::info!("Resolved tracks for {} series", tracks.len());

        let report = self.encode_all(files, &tracks, encoder);
        tracing::info!(
            "Encoded {} of {} files ({} failed)",
            report.encoded.len(),
            files.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// The whole batch: init, pass 1, pass 2.
    pub fn run<P: Prober, C: Chooser, E: Encoder>(
        &self,
        prober: &P,
        chooser: C,
        encoder: &E,
    ) -> Result<BatchReport> {
        let files = self.prepare()?;
        self.run_files(&files, prober, chooser, encoder)
    }
}
