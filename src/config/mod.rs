//! Configuration management for the 3D Life simulator

pub mod settings;

pub use settings::{
    CliOverrides, InitialState, InputConfig, OutputConfig, OutputFormat, RandomConfig, Settings,
    SimulationConfig,
};
