//! Pattern import: `x,y,z` coordinate lists applied to a grid

use super::grid::{Coord, Grid};
use anyhow::Context;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Lines starting with this are ignored
pub const COMMENT_PREFIX: &str = "//";

/// Fatal pattern errors. Per-line problems are warnings, not errors.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("failed to read pattern file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown built-in pattern '{0}'")]
    UnknownPattern(String),
}

/// Why a pattern line was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningReason {
    Malformed(String),
    OutOfBounds,
}

impl fmt::Display for WarningReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningReason::Malformed(detail) => write!(f, "malformed coordinate: {}", detail),
            WarningReason::OutOfBounds => write!(f, "coordinate outside the grid"),
        }
    }
}

/// A skipped line of pattern input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternWarning {
    /// 1-based line number, 0 for coordinates applied through the direct API
    pub line_number: usize,
    pub line: String,
    pub reason: WarningReason,
}

impl fmt::Display for PatternWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line_number > 0 {
            write!(f, "line {}: '{}': {}", self.line_number, self.line, self.reason)
        } else {
            write!(f, "'{}': {}", self.line, self.reason)
        }
    }
}

/// Result of applying a pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub applied: usize,
    pub warnings: Vec<PatternWarning>,
}

/// Parse one `x,y,z` entry; whitespace around each component is tolerated
pub fn parse_coord(line: &str) -> Result<Coord, String> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated integers, found {}", parts.len()));
    }

    let mut values = [0i32; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse::<i32>()
            .map_err(|e| format!("'{}' is not an integer ({})", part, e))?;
    }

    Ok(Coord::new(values[0], values[1], values[2]))
}

/// Loads patterns into a grid, replacing whatever was alive before
pub struct PatternLoader;

impl PatternLoader {
    /// Clear the grid, then apply every valid line
    pub fn load_lines<I, S>(grid: &mut Grid, lines: I) -> LoadReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        grid.clear();
        let mut report = LoadReport::default();

        for (idx, raw) in lines.into_iter().enumerate() {
            let raw = raw.as_ref();
            // Byte order mark left by some editors at the start of a file
            let raw = if idx == 0 { raw.trim_start_matches('\u{feff}') } else { raw };
            let line = raw.trim();
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }

            let reason = match parse_coord(line) {
                Ok(coord) => {
                    if grid.set_coord(coord, true) {
                        report.applied += 1;
                        continue;
                    }
                    WarningReason::OutOfBounds
                }
                Err(detail) => WarningReason::Malformed(detail),
            };

            let warning = PatternWarning {
                line_number: idx + 1,
                line: line.to_string(),
                reason,
            };
            log::warn!("Skipping pattern entry {}", warning);
            report.warnings.push(warning);
        }

        log::debug!(
            "Pattern applied: {} cell(s), {} warning(s)",
            report.applied,
            report.warnings.len()
        );
        report
    }

    pub fn load_str(grid: &mut Grid, content: &str) -> LoadReport {
        Self::load_lines(grid, content.lines())
    }

    /// Clear the grid and load a pattern file. Only a read failure is fatal;
    /// the grid is left cleared in that case.
    pub fn load_file<P: AsRef<Path>>(grid: &mut Grid, path: P) -> Result<LoadReport, PatternError> {
        grid.clear();
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PatternError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::load_str(grid, &content))
    }

    /// Clear the grid and set each coordinate alive
    pub fn apply_pattern(grid: &mut Grid, cells: &[Coord]) -> LoadReport {
        grid.clear();
        let mut report = LoadReport::default();

        for &coord in cells {
            if grid.set_coord(coord, true) {
                report.applied += 1;
            } else {
                report.warnings.push(PatternWarning {
                    line_number: 0,
                    line: format!("{},{},{}", coord.x, coord.y, coord.z),
                    reason: WarningReason::OutOfBounds,
                });
            }
        }

        report
    }
}

/// A named, fixed set of live cells
#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub name: &'static str,
    pub description: &'static str,
    pub cells: &'static [Coord],
}

pub const OSCILLATOR: Pattern = Pattern {
    name: "oscillator",
    description: "Four-cell corner cluster on the z = 7..8 edge",
    cells: &[
        Coord::new(0, 0, 7),
        Coord::new(0, 0, 8),
        Coord::new(0, 1, 7),
        Coord::new(1, 0, 7),
    ],
};

pub const BUILTIN_PATTERNS: &[Pattern] = &[OSCILLATOR];

/// Look up a built-in pattern by case-insensitive name
pub fn builtin_pattern(name: &str) -> Result<&'static Pattern, PatternError> {
    BUILTIN_PATTERNS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| PatternError::UnknownPattern(name.to_string()))
}

/// Render the live cells of a grid in pattern file format
pub fn pattern_to_string(grid: &Grid) -> String {
    let dims = grid.dimensions();
    let mut out = format!("{} pattern exported from a {} grid\n", COMMENT_PREFIX, dims);
    for coord in grid.alive_cells() {
        out.push_str(&format!("{},{},{}\n", coord.x, coord.y, coord.z));
    }
    out
}

/// Save the live cells of a grid as a pattern file
pub fn save_pattern_file<P: AsRef<Path>>(grid: &Grid, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, pattern_to_string(grid))
        .with_context(|| format!("Failed to write pattern to file: {}", path.display()))?;

    Ok(())
}

/// Create example pattern files
pub fn create_example_patterns<P: AsRef<Path>>(output_dir: P) -> anyhow::Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut oscillator = format!("{} {}\n", COMMENT_PREFIX, OSCILLATOR.description);
    for c in OSCILLATOR.cells {
        oscillator.push_str(&format!("{},{},{}\n", c.x, c.y, c.z));
    }
    std::fs::write(dir.join("oscillator.txt"), oscillator)
        .context("Failed to write oscillator.txt")?;

    // Four cells around (1,1,1): the centre is born on the first step
    let seed = "// birth seed\n0,0,0\n2,2,2\n0,2,0\n2,0,2\n";
    std::fs::write(dir.join("birth_seed.txt"), seed)
        .context("Failed to write birth_seed.txt")?;

    // Centre plus five neighbours: the centre survives
    let survivor = "// survivor\n4,4,4\n3,3,3\n3,3,4\n3,3,5\n3,4,3\n3,4,5\n";
    std::fs::write(dir.join("survivor.txt"), survivor)
        .context("Failed to write survivor.txt")?;

    Ok(())
}
