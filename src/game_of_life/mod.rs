//! Grid store, transition engine and pattern loader

pub mod grid;
pub mod pattern;
pub mod rules;

pub use grid::{CellCounts, Coord, Dimensions, Grid, GridError};
pub use pattern::{
    builtin_pattern, create_example_patterns, save_pattern_file, LoadReport, Pattern,
    PatternError, PatternLoader, PatternWarning, WarningReason, BUILTIN_PATTERNS, OSCILLATOR,
};
pub use rules::{CellEvent, Step, TransitionEngine};
