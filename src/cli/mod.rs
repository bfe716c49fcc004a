//! Command-line parsing for the sales-report toolbox.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline/analysis code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "finbox",
    version,
    about = "Sales-report polling, statistics, and dashboard for an embedded POS device"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the current report from the device, print it, and archive it.
    Fetch(FetchArgs),
    /// Check device connectivity and health.
    Status(StatusArgs),
    /// Compute and print statistics over the archived reports.
    Stats(StatsArgs),
    /// Render terminal charts of the archived reports.
    Chart(ChartArgs),
    /// List the archived report files.
    List(ListArgs),
    /// Print one archived report's day summary.
    Show(ShowArgs),
    /// Generate a month of synthetic reports (no device required).
    Sample(SampleArgs),
    /// Ask questions about the sales history via the chat API.
    Chat(ChatArgs),
    /// Launch the interactive dashboard.
    ///
    /// This uses the same underlying analysis pipeline as `finbox stats`, but
    /// renders results in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct FetchArgs {
    /// Path to the credentials/config file.
    #[arg(long, default_value = "credentials.json")]
    pub config: PathBuf,

    /// Directory the fetched report is archived into.
    #[arg(long, default_value = "reportes")]
    pub dir: PathBuf,
}

#[derive(Debug, Parser, Clone)]
pub struct StatusArgs {
    /// Path to the credentials/config file.
    #[arg(long, default_value = "credentials.json")]
    pub config: PathBuf,
}

#[derive(Debug, Parser, Clone)]
pub struct StatsArgs {
    /// Directory containing the archived reports.
    #[arg(long, default_value = "reportes")]
    pub dir: PathBuf,

    /// Export the computed statistics as JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    /// Directory containing the archived reports.
    #[arg(long, default_value = "reportes")]
    pub dir: PathBuf,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows) for the daily revenue plot.
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// Directory containing the archived reports.
    #[arg(long, default_value = "reportes")]
    pub dir: PathBuf,
}

#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Report JSON file to display.
    pub file: PathBuf,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Directory the generated reports are written into.
    #[arg(long, default_value = "reportes")]
    pub dir: PathBuf,

    /// Year of the generated month.
    #[arg(long)]
    pub year: i32,

    /// Month to generate (1-12).
    #[arg(long)]
    pub month: u32,

    /// Random seed for reproducible generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Debug, Parser, Clone)]
pub struct ChatArgs {
    /// Path to the credentials/config file.
    #[arg(long, default_value = "credentials.json")]
    pub config: PathBuf,

    /// Directory containing the archived reports (the chat context).
    #[arg(long, default_value = "reportes")]
    pub dir: PathBuf,

    /// One-shot question. Without it, an interactive session starts.
    pub question: Option<String>,
}

#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Path to the credentials/config file.
    #[arg(long, default_value = "credentials.json")]
    pub config: PathBuf,

    /// Directory containing the archived reports.
    #[arg(long, default_value = "reportes")]
    pub dir: PathBuf,
}
