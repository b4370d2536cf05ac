use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::{
    Table,
    builder::Builder,
    settings::{Panel, Style},
};

use super::{Event, Level, Presenter};
use crate::types::{PreviewTableRow, Summary, SummaryTableRow};

/// Renders events on stdout.
///
/// Log lines use the same prefixes as the crate's `info!`, `success!`,
/// `warning!` and `error!` macros. While a progress bar is shown, lines are
/// printed above it.
#[derive(Default)]
pub struct TerminalPresenter {
    bar: Option<ProgressBar>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn print(&self, line: String) {
        match &self.bar {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }
}

fn prefix(level: Level) -> String {
    let marker = match level {
        Level::Info => "o".blue().bold(),
        Level::Success => "✓".green().bold(),
        Level::Warning => "!".yellow().bold(),
        Level::Error => "!".red().bold(),
    };
    format!("[{}]", marker)
}

impl Presenter for TerminalPresenter {
    fn handle(&mut self, event: Event) {
        match event {
            Event::Header { title } => {
                let mut builder = Builder::default();
                builder.push_record([title]);
                let mut table = builder.build();
                table.with(Style::rounded());
                self.print(table.to_string().magenta().bold().to_string());
            }
            Event::Log { level, message } => {
                self.print(format!("{} {}", prefix(level), message));
            }
            Event::ProgressStart { total } => {
                let pb = ProgressBar::new(total);
                pb.set_style(
                    ProgressStyle::with_template(
                        "{spinner:.blue} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})",
                    )
                    .unwrap()
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                    .progress_chars("#>-"),
                );
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                self.bar = Some(pb);
            }
            Event::ProgressAdvance => {
                if let Some(pb) = &self.bar {
                    pb.inc(1);
                }
            }
            Event::ProgressFinish => {
                if let Some(pb) = self.bar.take() {
                    pb.finish_and_clear();
                }
            }
            Event::Summary(summary) => {
                self.print(render_summary(&summary));
            }
        }
    }
}

impl Drop for TerminalPresenter {
    fn drop(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }
}

pub fn render_summary(summary: &Summary) -> String {
    let rows = vec![
        SummaryTableRow {
            outcome: "Downloaded".to_string(),
            value: summary.succeeded.to_string(),
        },
        SummaryTableRow {
            outcome: "Failed".to_string(),
            value: summary.failed.to_string(),
        },
        SummaryTableRow {
            outcome: "Total duration".to_string(),
            value: summary.total_duration.clone(),
        },
    ];

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Panel::header("Session summary"));
    table.to_string()
}

pub fn render_preview(rows: Vec<PreviewTableRow>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}
