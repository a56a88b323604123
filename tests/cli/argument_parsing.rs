//! Command-line parsing tests

use crate::common::parse_args;
use clap::Parser;
use prioflow::app::cli::Args;
use prioflow::core::logging::LogFormat;
use prioflow::metrics::report::SummaryFormat;
use prioflow::worker::BlockDetection;
use std::path::PathBuf;

#[test]
fn test_positionals_only() {
    let args = parse_args(&["4", "2", "8", "30"]);

    assert_eq!(args.producers, 4);
    assert_eq!(args.consumers, 2);
    assert_eq!(args.queue_size, 8);
    assert_eq!(args.timeout, 30);
    assert_eq!(args.producer_wait, None);
    assert_eq!(args.summary_format, None);
    assert_eq!(args.log_file, None);
}

#[test]
fn test_long_and_short_options() {
    let args = parse_args(&[
        "1",
        "1",
        "1",
        "1",
        "-c",
        "custom.toml",
        "-l",
        "trace",
        "-o",
        "json",
        "-f",
        "run.log",
        "--consumer-wait",
        "2",
        "--block-detection",
        "exact",
        "--summary-format",
        "text",
    ]);

    assert_eq!(args.config_file, Some(PathBuf::from("custom.toml")));
    assert_eq!(args.log_level.as_deref(), Some("trace"));
    assert_eq!(args.log_format, Some(LogFormat::Json));
    assert_eq!(args.effective_log_file(), Some(&PathBuf::from("run.log")));
    assert_eq!(args.consumer_wait, Some(2));
    assert_eq!(args.block_detection, Some(BlockDetection::Exact));
    assert_eq!(args.summary_format, Some(SummaryFormat::Text));
}

#[test]
fn test_unknown_enum_values_rejected() {
    for argv in [
        ["prioflow", "1", "1", "1", "1", "--block-detection", "guess"],
        ["prioflow", "1", "1", "1", "1", "--summary-format", "yaml"],
        ["prioflow", "1", "1", "1", "1", "--log-format", "xml"],
    ] {
        assert!(
            Args::try_parse_from(argv).is_err(),
            "{:?} should fail",
            argv
        );
    }
}

#[test]
fn test_non_numeric_positional_rejected() {
    for argv in [
        ["prioflow", "two", "1", "1", "1"],
        ["prioflow", "1", "1", "1", "1.5"],
    ] {
        assert!(Args::try_parse_from(argv).is_err());
    }
}

#[test]
fn test_version_flag_reports_version() {
    let err = Args::try_parse_from(["prioflow", "--version"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
}
