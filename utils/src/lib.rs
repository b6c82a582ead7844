//! Shared utilities for the mintcap workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat};
