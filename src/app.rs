//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads configuration
//! - runs the analysis pipeline
//! - prints reports/charts
//! - drives the device, chat, and TUI front-ends

use std::io::{BufRead, Write};

use chrono::Local;
use clap::Parser;

use crate::cli::{
    ChartArgs, ChatArgs, Command, FetchArgs, ListArgs, SampleArgs, ShowArgs, StatsArgs, StatusArgs,
    TuiArgs,
};
use crate::config::AppConfig;
use crate::data::{DeviceClient, SampleConfig, generate_month};
use crate::error::AppError;
use crate::io::{list_reports, normalize_report, save_report, write_stats_json};

pub mod pipeline;

/// Entry point for the `finbox` binary.
pub fn run() -> Result<(), AppError> {
    // We want bare `finbox` (and `finbox --dir foo`) to behave like
    // `finbox tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while keeping the dashboard one keystroke away.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fetch(args) => handle_fetch(args),
        Command::Status(args) => handle_status(args),
        Command::Stats(args) => handle_stats(args),
        Command::Chart(args) => handle_chart(args),
        Command::List(args) => handle_list(args),
        Command::Show(args) => handle_show(args),
        Command::Sample(args) => handle_sample(args),
        Command::Chat(args) => handle_chat(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    let config = AppConfig::load(&args.config);
    let client = DeviceClient::from_config(&config)?;

    let payload = client.fetch_report()?;
    let report = normalize_report(&payload);
    println!("{}", crate::report::format_report_summary(&report));

    let path = save_report(&args.dir, &payload, Local::now().naive_local())?;
    println!("Saved report to '{}'.", path.display());

    Ok(())
}

fn handle_status(args: StatusArgs) -> Result<(), AppError> {
    let config = AppConfig::load(&args.config);
    let client = DeviceClient::from_config(&config)?;

    let status = client.fetch_status()?;
    println!(
        "Device at {} is reachable: status={} | sales registered={}",
        config.device_ip,
        if status.status.is_empty() {
            "N/A"
        } else {
            status.status.as_str()
        },
        status.sale_count,
    );

    Ok(())
}

fn handle_stats(args: StatsArgs) -> Result<(), AppError> {
    let output = pipeline::run_analysis(&args.dir);

    println!(
        "{}",
        crate::report::format_statistics(&output.aggregate, output.summary.as_ref())
    );
    if !output.load.skipped.is_empty() {
        println!(
            "(skipped {} file(s) that could not be read or parsed)",
            output.load.skipped.len()
        );
    }

    if let Some(path) = &args.export {
        let summary = output
            .summary
            .as_ref()
            .ok_or_else(|| AppError::new(3, "No report data to export."))?;
        write_stats_json(path, summary, &output.top_products(5))?;
        println!("Exported statistics to '{}'.", path.display());
    }

    Ok(())
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    let output = pipeline::run_analysis(&args.dir);
    let series = output.chart_series();
    println!(
        "{}",
        crate::plot::render_dashboard(&series, args.width, args.height)
    );
    Ok(())
}

fn handle_list(args: ListArgs) -> Result<(), AppError> {
    let files = list_reports(&args.dir);
    if files.is_empty() {
        println!("No reports found in '{}'.", args.dir.display());
        return Ok(());
    }

    for (i, file) in files.iter().enumerate() {
        let modified = file
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}. {:<40} {:>8} bytes  {modified}",
            i + 1,
            file.name,
            file.size,
        );
    }

    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let text = std::fs::read_to_string(&args.file).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to read report '{}': {e}", args.file.display()),
        )
    })?;
    let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        AppError::new(
            2,
            format!("Invalid report JSON '{}': {e}", args.file.display()),
        )
    })?;

    let report = normalize_report(&value);
    println!("{}", crate::report::format_report_summary(&report));
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        year: args.year,
        month: args.month,
        seed: args.seed,
    };
    let paths = generate_month(&args.dir, &config)?;
    println!(
        "Generated {} reports for {}-{:02} in '{}'.",
        paths.len(),
        args.year,
        args.month,
        args.dir.display()
    );
    Ok(())
}

fn handle_chat(args: ChatArgs) -> Result<(), AppError> {
    let config = AppConfig::load(&args.config);
    let mut client = crate::chat::ChatClient::new(config.chat)?;

    if let Some(question) = &args.question {
        let answer = client.ask(question, &chat_context(&args.dir))?;
        println!("{answer}");
        return Ok(());
    }

    println!("Chat over the sales history. Type 'exit' to quit, 'clear' to restart.");
    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout()
            .flush()
            .map_err(|e| AppError::new(4, format!("stdout error: {e}")))?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| AppError::new(4, format!("stdin error: {e}")))?;
        if read == 0 {
            break;
        }

        let question = line.trim();
        match question {
            "" => continue,
            "exit" | "quit" => break,
            "clear" => {
                client.clear();
                println!("Transcript cleared.");
                continue;
            }
            _ => {}
        }

        // Rebuild the context every turn so fetched reports show up mid-chat.
        match client.ask(question, &chat_context(&args.dir)) {
            Ok(answer) => println!("\n{answer}\n"),
            Err(err) => println!("\n{err}\n"),
        }
    }

    Ok(())
}

fn chat_context(dir: &std::path::Path) -> String {
    let output = pipeline::run_analysis(dir);
    crate::chat::build_context(
        &output.load.reports,
        output.summary.as_ref(),
        &output.top_products(5),
    )
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

/// Rewrite argv so `finbox` defaults to `finbox tui`.
///
/// Rules:
/// - `finbox`                      -> `finbox tui`
/// - `finbox --dir foo ...`        -> `finbox tui --dir foo ...`
/// - `finbox --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "fetch" | "status" | "stats" | "chart" | "list" | "show" | "sample" | "chat" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["finbox"])), args(&["finbox", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(args(&["finbox", "--dir", "foo"])),
            args(&["finbox", "tui", "--dir", "foo"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["finbox", "stats"])),
            args(&["finbox", "stats"])
        );
        assert_eq!(
            rewrite_args(args(&["finbox", "--help"])),
            args(&["finbox", "--help"])
        );
    }
}
