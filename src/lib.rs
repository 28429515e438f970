//! # Packrun - Production-run metrics for packing lines
//!
//! Derives run intervals and per-run produced mass for physical packing
//! lines from three plant time series: a discrete plant-state signal, a
//! totalised production counter, and a periodic sample-weight signal.
//!
//! ## Key Features
//!
//! - **Counter de-reset**: rebuilds a non-decreasing cumulative counter
//!   from raw readings with controller-restart resets
//! - **Edge detection**: turns the state signal into start/end run intervals
//! - **Window aggregation**: interval-scoped weight sampling with a
//!   configurable noise floor
//! - **Explicit missing values**: undefined means stay undefined instead of
//!   leaking zeros into the produced-mass estimate
//!
//! ## Quick Start
//!
//! ```rust
//! use packrun::{process_line, LineSignals, Observation, PipelineConfig};
//!
//! let mut signals = LineSignals::new("line-1");
//! signals.state = vec![
//!     Observation::new(0, 0.0),
//!     Observation::new(60_000, 4.0),
//!     Observation::new(120_000, 0.0),
//! ];
//! signals.counter = vec![
//!     Observation::new(0, 100.0),
//!     Observation::new(60_000, 150.0),
//!     Observation::new(120_000, 200.0),
//! ];
//! signals.weight = vec![Observation::new(90_000, 50.0)];
//!
//! let report = process_line(&signals, &PipelineConfig::default());
//! assert_eq!(report.runs.len(), 1);
//! assert_eq!(report.runs[0].start_ms, 60_000);
//! assert_eq!(report.runs[0].produced_mass, Some(2.5));
//! ```
//!
//! ## Modules
//!
//! - [`signal`]: input observation types
//! - [`config`]: pipeline tunables and the reset policy
//! - [`counter`]: counter normalization
//! - [`join`]: as-of (sample-and-hold) counter lookup
//! - [`edges`]: run-interval extraction
//! - [`window`]: interval-scoped weight aggregation
//! - [`report`]: run metrics assembly and quality flags
//! - [`pipeline`]: per-line and batch orchestration

// Modules
pub mod config;
pub mod counter;
pub mod edges;
pub mod error;
pub mod join;
pub mod pipeline;
pub mod report;
pub mod signal;
pub mod window;

// Re-exports for convenient access
pub use config::{PipelineConfig, ResetPolicy};
pub use counter::CounterPoint;
pub use edges::{Extraction, OpenRun, RunBounds, StatePoint, RUNNING_STATE_CODE};
pub use error::{PipelineError, Result};
pub use pipeline::{process_line, process_lines};
pub use report::{LineReport, QualityIssue, RunRecord};
pub use signal::{LineSignals, Observation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
