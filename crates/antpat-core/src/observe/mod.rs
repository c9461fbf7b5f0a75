//! # Observability
//!
//! Library code logs through the `tracing` facade:
//!
//! - `debug!` at structural points (request selection, azimuth
//!   permutations, frequency picks)
//! - `info!` when a default is chosen on the caller's behalf
//!
//! Nothing is printed unless the application installs a subscriber, e.g.
//! with [`init_logging`].

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
