//! Shared test doubles for batch tests.
//!
//! The fakes share one [`EventLog`] so tests can assert on the relative
//! order of probes, prompts and encodes.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use hardsub::resolve::Chooser;
use hardsub_av::flags::render;
use hardsub_av::{EncodeJob, EncodeStatus, Encoder, Error, Prober, StreamDescriptor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Probe(String),
    Prompt { heading: String, options: Vec<String> },
    Encode(String),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// What the fake prober does for a file.
#[derive(Debug, Clone)]
pub enum ProbeResult {
    Streams(Vec<StreamDescriptor>),
    /// ffprobe ran and exited non-zero.
    ToolFailure,
    /// ffprobe could not be found.
    NotFound,
    /// Launching ffprobe failed for another reason.
    Io,
    Malformed,
}

pub struct FakeProber {
    results: HashMap<String, ProbeResult>,
    log: EventLog,
}

impl FakeProber {
    pub fn new(log: &EventLog) -> Self {
        Self {
            results: HashMap::new(),
            log: log.clone(),
        }
    }

    pub fn with(mut self, file: &str, result: ProbeResult) -> Self {
        self.results.insert(file.to_string(), result);
        self
    }
}

impl Prober for FakeProber {
    fn probe(&self, path: &Path) -> hardsub_av::Result<Vec<StreamDescriptor>> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.log.borrow_mut().push(Event::Probe(name.clone()));
        match self.results.get(&name) {
            Some(ProbeResult::Streams(streams)) => Ok(streams.clone()),
            Some(ProbeResult::ToolFailure) => {
                Err(Error::tool_failed("ffprobe", "probe failed with exit status: 1"))
            }
            Some(ProbeResult::NotFound) => Err(Error::tool_not_found("ffprobe")),
            Some(ProbeResult::Io) => Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )
            .into()),
            Some(ProbeResult::Malformed) => Err(serde_json::from_str::<serde_json::Value>("{")
                .unwrap_err()
                .into()),
            None => panic!("unexpected probe of {name}"),
        }
    }
}

pub struct ScriptedChooser {
    answers: VecDeque<usize>,
    log: EventLog,
}

impl ScriptedChooser {
    pub fn new(log: &EventLog, answers: &[usize]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            log: log.clone(),
        }
    }
}

impl Chooser for ScriptedChooser {
    fn choose(&mut self, heading: &str, options: &[String]) -> anyhow::Result<usize> {
        self.log.borrow_mut().push(Event::Prompt {
            heading: heading.to_string(),
            options: options.to_vec(),
        });
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted answer left"))
    }
}

/// What the fake encoder does for an output file name.
#[derive(Debug, Clone, Copy)]
pub enum EncodeResult {
    Succeed,
    Exit(i32),
    LaunchError,
}

/// Records jobs, checks the staged input exists and writes the output.
pub struct FakeEncoder {
    results: HashMap<String, EncodeResult>,
    log: EventLog,
    pub jobs: RefCell<Vec<EncodeJob>>,
}

impl FakeEncoder {
    pub fn new(log: &EventLog) -> Self {
        Self {
            results: HashMap::new(),
            log: log.clone(),
            jobs: RefCell::new(Vec::new()),
        }
    }

    pub fn with(mut self, output_name: &str, result: EncodeResult) -> Self {
        self.results.insert(output_name.to_string(), result);
        self
    }

    pub fn args(&self, index: usize) -> Vec<String> {
        render(&self.jobs.borrow()[index].flags)
    }
}

impl Encoder for FakeEncoder {
    fn encode(&self, job: &EncodeJob) -> hardsub_av::Result<EncodeStatus> {
        let output_name = job
            .output
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        self.log.borrow_mut().push(Event::Encode(output_name.clone()));
        self.jobs.borrow_mut().push(job.clone());

        assert!(
            job.working_dir.join(&job.input).exists(),
            "staged input {:?} missing",
            job.input
        );

        match self.results.get(&output_name).copied().unwrap_or(EncodeResult::Succeed) {
            EncodeResult::Succeed => {
                std::fs::write(job.working_dir.join(&job.output), b"mp4")?;
                Ok(EncodeStatus::Success)
            }
            EncodeResult::Exit(code) => Ok(EncodeStatus::Failed(Some(code))),
            EncodeResult::LaunchError => Err(Error::tool_not_found("ffmpeg")),
        }
    }

    fn describe(&self, job: &EncodeJob) -> Vec<String> {
        job.command_line(&PathBuf::from("ffmpeg"))
    }
}

/// Create empty input files in `dir`.
pub fn touch_all(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"").unwrap();
    }
}
