//! Batch planner tests with scripted prober, chooser and encoder.

mod common;

use common::*;
use hardsub::config::Config;
use hardsub::planner::BatchPlanner;
use hardsub::resolve::TrackResolver;
use hardsub_av::{DryRunEncoder, StreamDescriptor};
use std::path::Path;
use tempfile::TempDir;

const EP1: &str = "[Group] Show - 01 [1080p].mkv";
const EP2: &str = "[Group] Show - 02 [1080p].mkv";
const OTHER: &str = "[Group] Other Show - 01 [1080p].mkv";

const NULL_GRAPH: &str = "[0:v]null[burned];[burned]scale=-16:'min(720,ih)'[v]";

fn planner(dir: &TempDir) -> BatchPlanner {
    BatchPlanner::new(dir.path(), &Config::default())
}

fn stereo_aac_only() -> ProbeResult {
    ProbeResult::Streams(vec![
        StreamDescriptor::video("h264"),
        StreamDescriptor::audio("aac", 2).with_language("jpn"),
    ])
}

fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.windows(2).any(|w| w[0] == flag && w[1] == value)
}

#[test]
fn one_probe_per_series_and_no_prompt_for_single_candidates() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP2, EP1]);

    let log = event_log();
    let prober = FakeProber::new(&log).with(EP1, stereo_aac_only());
    let encoder = FakeEncoder::new(&log);

    let report = planner(&dir)
        .run(&prober, ScriptedChooser::new(&log, &[]), &encoder)
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.encoded, [EP1, EP2]);
    assert_eq!(
        *log.borrow(),
        [
            Event::Probe(EP1.to_string()),
            Event::Encode("[Group] Show - 01 [1080p].mp4".to_string()),
            Event::Encode("[Group] Show - 02 [1080p].mp4".to_string()),
        ]
    );

    for i in 0..2 {
        let args = encoder.args(i);
        assert!(has_pair(&args, "-c:a", "copy"));
        assert!(has_pair(&args, "-map", "0:a:0"));
        assert!(has_pair(&args, "-filter_complex", NULL_GRAPH));
        assert!(has_pair(&args, "-map", "[v]"));
    }

    let out = dir.path().join("hardsubbed");
    assert!(out.join("[Group] Show - 01 [1080p].mp4").is_file());
    assert!(out.join("[Group] Show - 02 [1080p].mp4").is_file());
}

#[test]
fn every_prompt_happens_before_the_first_encode() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP1, EP2, OTHER]);

    let two_subs = ProbeResult::Streams(vec![
        StreamDescriptor::video("hevc"),
        StreamDescriptor::audio("flac", 2),
        StreamDescriptor::subtitle("ass").with_title("Signs").with_language("eng"),
        StreamDescriptor::subtitle("ass").with_title("Full").with_language("eng"),
    ]);
    let two_audio = ProbeResult::Streams(vec![
        StreamDescriptor::audio("aac", 2).with_language("jpn"),
        StreamDescriptor::audio("aac", 6).with_language("eng"),
    ]);

    let log = event_log();
    let prober = FakeProber::new(&log)
        .with(EP1, two_subs)
        .with(OTHER, two_audio);
    let encoder = FakeEncoder::new(&log);

    let report = planner(&dir)
        .run(&prober, ScriptedChooser::new(&log, &[1, 1]), &encoder)
        .unwrap();
    assert_eq!(report.encoded.len(), 3);

    let events = log.borrow();
    let first_encode = events
        .iter()
        .position(|e| matches!(e, Event::Encode(_)))
        .unwrap();
    let prompts: Vec<_> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, Event::Prompt { .. }))
        .collect();
    assert_eq!(prompts.len(), 2);
    assert!(prompts.iter().all(|(i, _)| *i < first_encode));

    // Sorted order: "[Group] Other Show" comes before "[Group] Show".
    assert_eq!(
        events[1],
        Event::Prompt {
            heading: "Please choose which audio stream to use for Other Show:".to_string(),
            options: vec![
                "0: No Title (jpn)".to_string(),
                "1: No Title (eng)".to_string()
            ],
        }
    );
    assert_eq!(
        events[3],
        Event::Prompt {
            heading: "Please choose which subtitle stream to use for Show:".to_string(),
            options: vec!["0: Signs (eng)".to_string(), "1: Full (eng)".to_string()],
        }
    );

    // Other Show: 6ch aac gets downmixed.
    let other = encoder.args(0);
    assert!(has_pair(&other, "-c:a", "aac"));
    assert!(has_pair(&other, "-ac", "2"));
    assert!(has_pair(&other, "-map", "0:a:1"));

    // Show episodes: flac gets re-encoded and subtitle 1 is burned in.
    for i in 1..3 {
        let args = encoder.args(i);
        assert!(has_pair(&args, "-c:a", "aac"));
        assert!(has_pair(
            &args,
            "-filter_complex",
            "[0:v]subtitles=ENCODING.mkv:si=1[burned];[burned]scale=-16:'min(720,ih)'[v]"
        ));
    }
}

#[test]
fn picture_subtitles_are_overlaid() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP1]);

    let log = event_log();
    let prober = FakeProber::new(&log).with(
        EP1,
        ProbeResult::Streams(vec![
            StreamDescriptor::audio("aac", 2),
            StreamDescriptor::subtitle("hdmv_pgs_subtitle"),
        ]),
    );
    let encoder = FakeEncoder::new(&log);

    planner(&dir)
        .run(&prober, ScriptedChooser::new(&log, &[]), &encoder)
        .unwrap();

    assert!(has_pair(
        &encoder.args(0),
        "-filter_complex",
        "[0:v][0:s:0]overlay[burned];[burned]scale=-16:'min(720,ih)'[v]"
    ));
}

#[test]
fn probe_tool_failure_degrades_to_no_streams() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP1]);

    let log = event_log();
    let prober = FakeProber::new(&log).with(EP1, ProbeResult::ToolFailure);
    let encoder = FakeEncoder::new(&log);

    let report = planner(&dir)
        .run(&prober, ScriptedChooser::new(&log, &[]), &encoder)
        .unwrap();
    assert!(report.is_success());

    let args = encoder.args(0);
    assert!(!args.iter().any(|a| a == "-c:a"));
    assert!(has_pair(&args, "-filter_complex", NULL_GRAPH));
}

#[test]
fn missing_or_unlaunchable_prober_degrades_per_series() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP1, EP2, OTHER]);

    let log = event_log();
    let prober = FakeProber::new(&log)
        .with(EP1, ProbeResult::NotFound)
        .with(OTHER, ProbeResult::Io);
    let encoder = FakeEncoder::new(&log);

    let report = planner(&dir)
        .run(&prober, ScriptedChooser::new(&log, &[]), &encoder)
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.encoded, [OTHER, EP1, EP2]);
    for i in 0..3 {
        let args = encoder.args(i);
        assert!(!args.iter().any(|a| a == "-c:a"));
        assert!(!args.iter().any(|a| a.starts_with("0:a:")));
        assert!(has_pair(&args, "-filter_complex", NULL_GRAPH));
    }
}

#[test]
fn resolve_all_keeps_one_selection_per_series() {
    let dir = TempDir::new().unwrap();
    let log = event_log();
    let prober = FakeProber::new(&log)
        .with(EP1, stereo_aac_only())
        .with(OTHER, ProbeResult::NotFound);
    let mut resolver = TrackResolver::new(ScriptedChooser::new(&log, &[]));
    let planner = planner(&dir);

    let none = planner.resolve_all(&[], &prober, &mut resolver).unwrap();
    assert!(none.is_empty());

    let files = [OTHER.to_string(), EP1.to_string(), EP2.to_string()];
    let tracks = planner.resolve_all(&files, &prober, &mut resolver).unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn malformed_probe_output_aborts_before_encoding() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP1, EP2]);

    let log = event_log();
    let prober = FakeProber::new(&log).with(EP1, ProbeResult::Malformed);
    let encoder = FakeEncoder::new(&log);

    let err = planner(&dir)
        .run(&prober, ScriptedChooser::new(&log, &[]), &encoder)
        .unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to probe"));
    assert!(encoder.jobs.borrow().is_empty());
}

#[test]
fn failed_encodes_do_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP1, EP2, OTHER]);

    let log = event_log();
    let prober = FakeProber::new(&log)
        .with(EP1, stereo_aac_only())
        .with(OTHER, stereo_aac_only());
    let encoder = FakeEncoder::new(&log)
        .with("[Group] Other Show - 01 [1080p].mp4", EncodeResult::LaunchError)
        .with("[Group] Show - 01 [1080p].mp4", EncodeResult::Exit(1));

    let report = planner(&dir)
        .run(&prober, ScriptedChooser::new(&log, &[]), &encoder)
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed, [OTHER, EP1]);
    assert_eq!(report.encoded, [EP2]);
    assert_eq!(encoder.jobs.borrow().len(), 3);
}

#[test]
fn inputs_keep_their_names_after_the_batch() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP1, EP2]);

    let log = event_log();
    let prober = FakeProber::new(&log).with(EP1, stereo_aac_only());
    let encoder =
        FakeEncoder::new(&log).with("[Group] Show - 02 [1080p].mp4", EncodeResult::Exit(1));

    planner(&dir)
        .run(&prober, ScriptedChooser::new(&log, &[]), &encoder)
        .unwrap();

    for job in encoder.jobs.borrow().iter() {
        assert_eq!(job.input, Path::new("ENCODING.mkv"));
        assert_eq!(job.working_dir, dir.path());
    }
    assert!(dir.path().join(EP1).is_file());
    assert!(dir.path().join(EP2).is_file());
    assert!(!dir.path().join("ENCODING.mkv").exists());
}

#[test]
fn discovery_filters_and_sorts() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &["b.mp4", "a.mkv", "notes.txt", "c.MKV", "ENCODING"]);
    std::fs::create_dir(dir.path().join("d.mkv")).unwrap();

    let files = planner(&dir).prepare().unwrap();

    assert_eq!(files, ["a.mkv", "b.mp4"]);
    assert!(dir.path().join("hardsubbed").is_dir());
}

#[test]
fn outputs_are_not_rediscovered() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP1]);
    std::fs::create_dir(dir.path().join("hardsubbed")).unwrap();
    std::fs::write(dir.path().join("hardsubbed").join("old.mp4"), b"").unwrap();

    assert_eq!(planner(&dir).prepare().unwrap(), [EP1]);
}

#[test]
fn output_dir_creation_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP1, "hardsubbed"]);

    let log = event_log();
    let prober = FakeProber::new(&log);
    let encoder = FakeEncoder::new(&log);

    let err = planner(&dir)
        .run(&prober, ScriptedChooser::new(&log, &[]), &encoder)
        .unwrap_err();

    assert!(err.to_string().contains("Failed to create output directory"));
    assert!(log.borrow().is_empty());
}

#[test]
fn configured_output_dir_is_used() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP1]);

    let config = Config {
        output_dir: "web".into(),
        ..Config::default()
    };

    let log = event_log();
    let prober = FakeProber::new(&log).with(EP1, stereo_aac_only());
    let encoder = FakeEncoder::new(&log);

    BatchPlanner::new(dir.path(), &config)
        .run(&prober, ScriptedChooser::new(&log, &[]), &encoder)
        .unwrap();

    assert_eq!(
        encoder.jobs.borrow()[0].output,
        Path::new("web/[Group] Show - 01 [1080p].mp4")
    );
    assert!(dir.path().join("web/[Group] Show - 01 [1080p].mp4").is_file());
}

#[test]
fn dry_run_leaves_inputs_in_place() {
    let dir = TempDir::new().unwrap();
    touch_all(dir.path(), &[EP1]);
    std::fs::write(dir.path().join("ENCODING.mkv"), b"leftover").unwrap();

    let log = event_log();
    let prober = FakeProber::new(&log).with(
        EP1,
        ProbeResult::Streams(vec![StreamDescriptor::subtitle("ass")]),
    );

    let report = planner(&dir)
        .run(&prober, ScriptedChooser::new(&log, &[]), &DryRunEncoder::new("ffmpeg"))
        .unwrap();

    assert_eq!(report.encoded, [EP1]);
    assert!(dir.path().join(EP1).is_file());
    assert_eq!(std::fs::read(dir.path().join("ENCODING.mkv")).unwrap(), b"leftover");
}
