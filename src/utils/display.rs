//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::game_of_life::{CellCounts, Grid};
use crate::simulation::{CycleReport, MessageBuffer, RunSummary};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Text views of a 3D grid
pub struct GridFormatter;

impl GridFormatter {
    /// One labelled Y/Z slice per X layer
    pub fn format_layers(grid: &Grid) -> String {
        let dims = grid.dimensions();
        let mut output = String::new();

        for x in 0..dims.x {
            output.push_str(&format!("Layer {} (X={}):\n", x, x));
            output.push_str("   ");
            for z in 0..dims.z {
                output.push_str(&format!("Z{} ", z));
            }
            output.push('\n');

            for y in 0..dims.y {
                output.push_str(&format!("Y{} ", y));
                for z in 0..dims.z {
                    let alive = grid.get(x as i32, y as i32, z as i32);
                    output.push_str(if alive { "■ " } else { "□ " });
                }
                output.push('\n');
            }
        }

        output
    }

    /// Alive and dead tallies as the counters show them
    pub fn format_counts(counts: &CellCounts) -> String {
        format!("Alive Cells: {}\nDead Cells: {}", counts.alive, counts.dead)
    }
}

/// Summaries of simulation runs
pub struct RunFormatter;

impl RunFormatter {
    /// One line per cycle
    pub fn format_cycle_line(report: &CycleReport) -> String {
        format!(
            "Cycle {:4} | dying {:5} | born {:5} | alive {:6}",
            report.cycle,
            report.dying.len(),
            report.born.len(),
            report.counts.alive
        )
    }

    pub fn format_summary(summary: &RunSummary) -> String {
        let mut output = String::new();
        output.push_str(&format!("Grid: {}\n", summary.dimensions));
        output.push_str(&format!("Ticks executed: {}\n", summary.ticks_executed));
        if summary.ticks_skipped > 0 {
            output.push_str(&format!("Ticks skipped: {}\n", summary.ticks_skipped));
        }
        output.push_str(&GridFormatter::format_counts(&summary.final_counts));
        output.push('\n');
        output
    }

    /// Persist a finished run. Text writes the message log, JSON the full summary.
    pub fn save_run<P: AsRef<Path>>(
        summary: &RunSummary,
        log: &MessageBuffer,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join("run_log.txt");
                let mut content = log.to_text();
                content.push('\n');
                content.push_str(&Self::format_summary(summary));
                std::fs::write(&path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join("run_summary.json");
                let json = serde_json::to_string_pretty(summary)
                    .context("Failed to serialize run summary")?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                path
            }
        };

        Ok(path)
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }

    pub fn muted(text: &str) -> String {
        Self::colored(text, Color::Gray)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Gray,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Gray => 90,
        }
    }
}
