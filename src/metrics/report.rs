//! Final run summary rendering (text or JSON)

use crate::core::styles::StyleRole;
use crate::metrics::{MetricsSnapshot, Utilisation};
use chrono::{DateTime, Local};
use clap::ValueEnum;
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use std::fmt;
use std::time::SystemTime;
use strum_macros::{Display, EnumString};

/// Output format for the end-of-run summary
#[derive(ValueEnum, Display, EnumString, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
}

/// Everything printed once the workers have stopped
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub version: String,
    pub started_at: String,
    pub finished_at: String,
    pub stopped_by: String,
    pub metrics: MetricsSnapshot,
}

impl RunSummary {
    pub fn new(
        version: String,
        started_at: SystemTime,
        finished_at: SystemTime,
        stopped_by: impl Into<String>,
        metrics: MetricsSnapshot,
    ) -> Self {
        Self {
            version,
            started_at: timestamp(started_at),
            finished_at: timestamp(finished_at),
            stopped_by: stopped_by.into(),
            metrics,
        }
    }
}

fn timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn render(
    summary: &RunSummary,
    format: SummaryFormat,
    color: bool,
) -> Result<String, serde_json::Error> {
    match format {
        SummaryFormat::Text => Ok(render_text(summary, color)),
        SummaryFormat::Json => render_json(summary),
    }
}

pub fn render_json(summary: &RunSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}

fn optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.2}{}", v, unit),
        None => "n/a".to_string(),
    }
}

pub fn render_text(summary: &RunSummary, color: bool) -> String {
    TextSummary { summary, color }.to_string()
}

/// Plain-text layout of a [`RunSummary`]
pub struct TextSummary<'a> {
    pub summary: &'a RunSummary,
    pub color: bool,
}

impl fmt::Display for TextSummary<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(out, self.summary, self.color)
    }
}

fn write_text(out: &mut impl fmt::Write, summary: &RunSummary, color: bool) -> fmt::Result {
    let m = &summary.metrics;
    let heading = |text: &str| StyleRole::Heading.paint(text, color);
    let label = |text: &str| StyleRole::Label.paint(text, color);

    writeln!(out, "{}", heading("=== Run summary ==="))?;
    writeln!(
        out,
        "{}",
        StyleRole::Dim.paint(&format!("prioflow {}", summary.version), color)
    )?;
    writeln!(
        out,
        "{} {} to {} ({:.1}s, stopped by {})",
        label("Run:"),
        summary.started_at,
        summary.finished_at,
        m.elapsed_secs,
        summary.stopped_by
    )?;
    writeln!(
        out,
        "{} {} producer(s), {} consumer(s), queue capacity {}",
        label("Shape:"),
        m.shape.producers,
        m.shape.consumers,
        m.shape.queue_capacity
    )?;

    writeln!(out, "\n{}", heading("Totals"))?;
    writeln!(out, "  {} {}", label("Produced:"), m.produced)?;
    writeln!(out, "  {} {}", label("Consumed:"), m.consumed)?;
    writeln!(out, "  {} {}", label("In flight:"), m.in_flight)?;

    writeln!(out, "\n{}", heading("Throughput (items/s)"))?;
    writeln!(
        out,
        "  {} {:.2} ({:.2} per producer)",
        label("Produced:"),
        m.throughput.produced_per_sec,
        m.throughput.per_producer
    )?;
    writeln!(
        out,
        "  {} {:.2} ({:.2} per consumer)",
        label("Consumed:"),
        m.throughput.consumed_per_sec,
        m.throughput.per_consumer
    )?;

    writeln!(out, "\n{}", heading("Latency"))?;
    writeln!(
        out,
        "  {} {}",
        label("Average:"),
        optional(m.latency.average_ms, " ms")
    )?;
    writeln!(
        out,
        "  {} {}",
        label("Minimum:"),
        optional(m.latency.min_ms, " ms")
    )?;
    writeln!(
        out,
        "  {} {}",
        label("Maximum:"),
        optional(m.latency.max_ms, " ms")
    )?;

    writeln!(out, "\n{}", heading("Priority distribution"))?;
    write!(out, "{}", distribution_table(m, color))?;

    writeln!(out, "\n{}", heading("Blocking"))?;
    writeln!(
        out,
        "  {} {} ({} of produced)",
        label("Producer blocks:"),
        m.producer_blocks,
        optional(m.producer_block_percent, "%")
    )?;
    writeln!(
        out,
        "  {} {} ({} of consumed)",
        label("Consumer blocks:"),
        m.consumer_blocks,
        optional(m.consumer_block_percent, "%")
    )?;

    let verdict_role = match m.utilisation {
        Utilisation::WellBalanced => StyleRole::Good,
        Utilisation::FrequentlyFull | Utilisation::FrequentlyEmpty => StyleRole::Warning,
    };
    writeln!(
        out,
        "\n{} {} ({})",
        label("Utilisation:"),
        verdict_role.paint(&m.utilisation.to_string(), color),
        m.utilisation.advice()
    )?;
    writeln!(
        out,
        "{} {}",
        label("Efficiency:"),
        optional(m.efficiency_percent, "%")
    )
}

fn distribution_table(m: &MetricsSnapshot, color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(Row::new(vec![
        Cell::new(&StyleRole::Label.paint("class", color)),
        Cell::new(&StyleRole::Label.paint("items", color)).style_spec("r"),
        Cell::new(&StyleRole::Label.paint("share", color)).style_spec("r"),
    ]));

    for share in &m.priority_distribution {
        let role = StyleRole::for_priority(share.priority);
        table.add_row(Row::new(vec![
            Cell::new(&role.paint(share.priority.name(), color)),
            Cell::new(&share.count.to_string()).style_spec("r"),
            Cell::new(&format!("{:.1}%", share.percent)).style_spec("r"),
        ]));
    }

    table
}
