// error.rs - Construction and configuration errors

use std::path::PathBuf;
use thiserror::Error;

/// Rejected construction parameters. Everything the simulation does after
/// construction is infallible; invalid runtime input is ignored instead.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("grid must have at least one cell (got {width}x{height})")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid of {width}x{height} cells does not fit in memory")]
    GridTooLarge { width: usize, height: usize },
    #[error("render scale must be at least one pixel per cell")]
    ZeroScale,
    #[error("tick interval {0}s is outside (0, 2]")]
    IntervalOutOfRange(f64),
}

/// Errors raised while loading [`Settings`](crate::Settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] SimulationError),
}
