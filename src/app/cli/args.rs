//! Command-line arguments
//!
//! Positional arguments describe the run; options tune pacing, output and
//! logging. Options may also come from the TOML configuration file, in
//! which case the command line wins.

use crate::core::logging::LogFormat;
use crate::metrics::report::SummaryFormat;
use crate::worker::BlockDetection;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "prioflow")]
#[command(about = "Priority producer/consumer queue simulation")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(
    after_help = "Options can also be set in the configuration file using their long names"
)]
pub struct Args {
    /// Number of producer threads (1-10)
    #[arg(value_name = "PRODUCERS", allow_negative_numbers = true)]
    pub producers: i64,

    /// Number of consumer threads (1-10)
    #[arg(value_name = "CONSUMERS", allow_negative_numbers = true)]
    pub consumers: i64,

    /// Queue capacity (1-20)
    #[arg(value_name = "QUEUE_SIZE", allow_negative_numbers = true)]
    pub queue_size: i64,

    /// Run time in seconds
    #[arg(value_name = "TIMEOUT_SECS", allow_negative_numbers = true)]
    pub timeout: i64,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Longest pause between two items for a producer [default: 3]
    #[arg(long = "producer-wait", value_name = "SECS")]
    pub producer_wait: Option<u64>,

    /// Longest pause between two items for a consumer [default: 4]
    #[arg(long = "consumer-wait", value_name = "SECS")]
    pub consumer_wait: Option<u64>,

    /// How blocked queue calls are detected [default: exact]
    #[arg(long = "block-detection", value_name = "MODE", value_enum)]
    pub block_detection: Option<BlockDetection>,

    /// Format of the final summary [default: text]
    #[arg(long = "summary-format", value_name = "FORMAT", value_enum)]
    pub summary_format: Option<SummaryFormat>,

    /// Seed for reproducible item values and pauses
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,

    /// Color output control (default: when stdout is a terminal)
    #[arg(short = 'g', long = "color")]
    pub color: Option<bool>,

    /// Log level
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        value_parser = ["trace", "debug", "info", "warn", "error", "off"]
    )]
    pub log_level: Option<String>,

    /// Log output format [default: text]
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Parse the process arguments with help styled for the terminal
    ///
    /// Prints usage and exits on a parse error, like [`Parser::parse`].
    pub fn parse_styled() -> Self {
        Self::parse_styled_from(std::env::args_os())
    }

    pub fn parse_styled_from<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        let color = Self::color_hint(&argv);
        let colors_enabled = color.unwrap_or_else(|| std::io::stdout().is_terminal());

        let cmd = Self::command()
            .color(Self::color_choice(color))
            .styles(crate::core::styles::palette_to_clap(colors_enabled));
        cmd.try_get_matches_from(argv)
            .and_then(|matches| Self::from_arg_matches(&matches))
            .unwrap_or_else(|e| e.exit())
    }

    fn color_choice(color_setting: Option<bool>) -> clap::ColorChoice {
        match color_setting {
            Some(true) => clap::ColorChoice::Always,
            Some(false) => clap::ColorChoice::Never,
            None => clap::ColorChoice::Auto,
        }
    }

    /// Early look at `-g`/`--color` so help output can honour it
    fn color_hint(argv: &[OsString]) -> Option<bool> {
        let mut args = argv.iter().skip(1).map(|a| a.to_string_lossy());
        while let Some(arg) = args.next() {
            let value = match arg.as_ref() {
                "-g" | "--color" => args.next().map(|v| v.into_owned()),
                other => other.strip_prefix("--color=").map(str::to_string),
            };
            if let Some(value) = value {
                return value.parse().ok();
            }
        }
        None
    }

    /// Log file to write, if any; `none` and `-` disable file logging
    pub fn effective_log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref().filter(|path| {
            let text = path.to_string_lossy();
            !(text.eq_ignore_ascii_case("none") || text == "-")
        })
    }
}
