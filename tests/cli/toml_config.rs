//! Configuration file tests

use crate::common::parse_args;
use prioflow::app::cli::Args;
use prioflow::app::error::AppError;
use prioflow::metrics::report::SummaryFormat;
use prioflow::worker::BlockDetection;
use std::io::Write;
use std::time::Duration;
use toml::Table;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_values_reach_run_settings() {
    let file = write_config(
        r#"
        producer-wait = 1
        consumer-wait = 2
        block-detection = "sampled"
        summary-format = "json"
        seed = 77
        "#,
    );
    let mut args = parse_args(&["3", "3", "6", "9", "-c", file.path().to_str().unwrap()]);

    args.load_config().unwrap();
    let settings = args.validate().unwrap();

    assert_eq!(settings.workers.producer_max_wait, Duration::from_secs(1));
    assert_eq!(settings.workers.consumer_max_wait, Duration::from_secs(2));
    assert_eq!(settings.workers.block_detection, BlockDetection::Sampled);
    assert_eq!(settings.workers.seed, Some(77));
    assert_eq!(settings.summary_format, SummaryFormat::Json);
}

#[test]
fn test_cli_overrides_toml() {
    let mut args = parse_args(&[
        "1",
        "1",
        "1",
        "1",
        "--summary-format",
        "text",
        "--seed",
        "3",
    ]);
    let mut config = Table::new();
    config.insert("summary-format".into(), toml::Value::String("json".into()));
    config.insert("seed".to_string(), toml::Value::Integer(99));

    Args::apply_toml_values(&mut args, &config).unwrap();

    assert_eq!(args.summary_format, Some(SummaryFormat::Text));
    assert_eq!(args.seed, Some(3));
}

#[test]
fn test_unknown_keys_are_ignored() {
    let mut args = parse_args(&["1", "1", "1", "1"]);
    let mut config = Table::new();
    config.insert("producers".to_string(), toml::Value::Integer(50));

    Args::apply_toml_values(&mut args, &config).unwrap();

    assert_eq!(args.producers, 1);
}

#[test]
fn test_invalid_config_value_names_the_file() {
    let file = write_config("consumer-wait = \"soon\"\n");
    let mut args = parse_args(&["1", "1", "1", "1", "-c", file.path().to_str().unwrap()]);

    match args.load_config() {
        Err(AppError::Config { path, message }) => {
            assert_eq!(path, file.path());
            assert!(message.contains("consumer-wait"));
        }
        other => panic!("Expected config error, got {:?}", other),
    }
}
