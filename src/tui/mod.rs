//! Ratatui-based terminal dashboard.
//!
//! The dashboard renders the daily revenue chart, the statistics panel, and
//! the top-product ranking over the archived reports, and can pull a fresh
//! report from the device without leaving the screen.

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{self, AnalysisOutput};
use crate::cli::TuiArgs;
use crate::config::AppConfig;
use crate::data::DeviceClient;
use crate::error::AppError;
use crate::io::save_report;
use crate::report::{fmt_cop, fmt_thousands};

mod plotters_chart;

use plotters_chart::SalesChart;

/// Start the dashboard.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    args: TuiArgs,
    config: AppConfig,
    output: AnalysisOutput,
    status: String,
}

impl App {
    fn new(args: TuiArgs) -> Self {
        let config = AppConfig::load(&args.config);
        let output = pipeline::run_analysis(&args.dir);
        let status = load_status(&output);
        Self {
            args,
            config,
            output,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('r') => {
                self.reload();
            }
            KeyCode::Char('f') => {
                self.fetch_from_device();
            }
            _ => {}
        }
        false
    }

    fn reload(&mut self) {
        self.output = pipeline::run_analysis(&self.args.dir);
        self.status = load_status(&self.output);
    }

    /// Pull the current report from the device, archive it, and reload.
    ///
    /// Fetch failures land in the status line; the dashboard keeps running on
    /// whatever is already on disk.
    fn fetch_from_device(&mut self) {
        self.status = format!("Fetching report from {}...", self.config.device_ip);

        let fetched = DeviceClient::from_config(&self.config)
            .and_then(|client| client.fetch_report())
            .and_then(|payload| save_report(&self.args.dir, &payload, Local::now().naive_local()));

        match fetched {
            Ok(path) => {
                self.reload();
                self.status = format!("Fetched and saved '{}'.", path.display());
            }
            Err(err) => {
                self.status = format!("Fetch failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("finbox", Style::default().fg(Color::Cyan)),
            Span::raw(" — sales dashboard"),
        ]));

        let period = match (self.output.aggregate.daily.first(), self.output.aggregate.daily.last())
        {
            (Some(first), Some(last)) => format!("{} .. {}", first.date, last.date),
            _ => "-".to_string(),
        };
        lines.push(Line::from(Span::styled(
            format!(
                "dir: {} | reports: {} | skipped: {} | period: {period}",
                self.args.dir.display(),
                self.output.load.reports.len(),
                self.output.load.skipped.len(),
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(summary) = &self.output.summary {
            lines.push(Line::from(Span::styled(
                format!(
                    "total: {} | mean/day: {} | best: {}",
                    fmt_cop(summary.total),
                    fmt_cop(summary.mean),
                    fmt_cop(summary.max),
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(42)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(9)])
            .split(columns[0]);

        self.draw_chart(frame, left[0]);
        self.draw_products(frame, left[1]);
        self.draw_stats(frame, columns[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Daily revenue").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let daily = &self.output.aggregate.daily;
        if daily.is_empty() {
            let msg = Paragraph::new(
                "No report data. Press 'f' to fetch from the device or 'r' to reload.",
            )
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let points: Vec<(f64, f64)> = daily
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.revenue))
            .collect();

        let mut best = points[0];
        let mut worst = points[0];
        for &(x, y) in &points {
            if y > best.1 {
                best = (x, y);
            }
            if y < worst.1 {
                worst = (x, y);
            }
        }

        let x_max = (points.len() - 1).max(1) as f64;
        let (y_min, y_max) = pad_range(worst.1, best.1);

        let widget = SalesChart {
            daily: &points,
            best: Some(best),
            worst: Some(worst),
            x_bounds: [0.0, x_max],
            y_bounds: [y_min, y_max],
            x_label: "day #",
            y_label: "revenue (COP)".to_string(),
            fmt_x: fmt_axis_index,
            fmt_y: fmt_axis_cop,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_products(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Top products (units)")
            .borders(Borders::ALL);

        let mut ranked = self.output.aggregate.products.clone();
        ranked.sort_by(|a, b| b.units.cmp(&a.units));

        let items: Vec<ListItem> = ranked
            .iter()
            .take(7)
            .map(|tally| {
                ListItem::new(format!(
                    "{:<20} {:>5} units / {} sales",
                    tally.name, tally.units, tally.count
                ))
            })
            .collect();

        if items.is_empty() {
            let msg = Paragraph::new("No line items yet.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }

        frame.render_widget(List::new(items).block(block), area);
    }

    fn draw_stats(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Statistics").borders(Borders::ALL);

        let Some(summary) = &self.output.summary else {
            let msg = Paragraph::new("No data.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let stat = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<12}"), Style::default().fg(Color::Gray)),
                Span::raw(value),
            ])
        };

        let lines = vec![
            stat("days", summary.days.to_string()),
            stat("mean", fmt_cop(summary.mean)),
            stat("median", fmt_cop(summary.median)),
            stat(
                "mode",
                format!(
                    "{} ({})",
                    summary.mode_product.name, summary.mode_product.count
                ),
            ),
            stat("p25", fmt_cop(summary.p25)),
            stat("p50", fmt_cop(summary.p50)),
            stat("p75", fmt_cop(summary.p75)),
            stat("std dev", fmt_cop(summary.std_dev)),
            stat("best day", fmt_cop(summary.max)),
            stat("worst day", fmt_cop(summary.min)),
            stat("mean/month", fmt_cop(summary.monthly_mean)),
            stat("total", fmt_cop(summary.total)),
        ];

        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let p = Paragraph::new(Line::from(vec![
            Span::styled("q", Style::default().fg(Color::Cyan)),
            Span::raw(" quit | "),
            Span::styled("r", Style::default().fg(Color::Cyan)),
            Span::raw(" reload | "),
            Span::styled("f", Style::default().fg(Color::Cyan)),
            Span::raw(" fetch | "),
            Span::raw(self.status.clone()),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn load_status(output: &AnalysisOutput) -> String {
    if !output.load.directory_found {
        return "Reports directory not found (it will be created on first fetch).".to_string();
    }
    format!(
        "Loaded {} reports ({} skipped).",
        output.load.reports.len(),
        output.load.skipped.len()
    )
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < 1e-9 {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn fmt_axis_index(v: f64) -> String {
    format!("{}", v.round() as i64)
}

/// Compact COP tick labels: 1.2M / 850k / 420.
fn fmt_axis_cop(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else {
        fmt_thousands(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_labels_are_compact() {
        assert_eq!(fmt_axis_cop(1_250_000.0), "1.2M");
        assert_eq!(fmt_axis_cop(850_000.0), "850k");
        assert_eq!(fmt_axis_cop(420.0), "420");
    }

    #[test]
    fn pad_range_handles_flat_series() {
        let (lo, hi) = pad_range(1000.0, 1000.0);
        assert!(lo < 1000.0 && hi > 1000.0);
    }
}
