// Packrun - Production-run metrics for packing lines
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Run-interval extraction from the plant-state signal.
//!
//! The discrete state code collapses to a binary running flag, consecutive
//! duplicates are dropped so only transition points remain, and each
//! start/end transition pair becomes one run interval.
//!
//! Boundary policies:
//! - a series whose first sample is already "not running" contributes no
//!   leading interval: an end boundary whose start was never observed is
//!   dropped;
//! - a trailing start with no end by the end of data is retained as a
//!   separate [`OpenRun`], never mixed into the complete intervals.

use serde::Serialize;

/// State code reported while a line is producing.
pub const RUNNING_STATE_CODE: f64 = 4.0;

/// Whether a raw state code means "running". Missing codes are not running.
pub fn is_running(code: Option<f64>) -> bool {
    code == Some(RUNNING_STATE_CODE)
}

/// A state sample joined with the counter value in force at that instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatePoint {
    /// Epoch milliseconds.
    pub timestamp_ms: u64,
    /// Binary collapse of the state code.
    pub running: bool,
    /// Normalized counter as of this timestamp, `None` before the first
    /// counter reading.
    pub counter: Option<f64>,
}

/// One complete start/end interval with boundary counter values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunBounds {
    pub start_ms: u64,
    pub end_ms: u64,
    pub start_counter: Option<f64>,
    pub end_counter: Option<f64>,
}

/// A trailing start transition with no matching end by the end of data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpenRun {
    pub start_ms: u64,
    pub start_counter: Option<f64>,
}

/// Extraction outcome for one line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Complete intervals, ordered by start time, non-overlapping.
    pub runs: Vec<RunBounds>,
    /// Unterminated trailing run, if the data ended mid-run.
    pub open_run: Option<OpenRun>,
}

/// Extract run intervals from joined state samples.
///
/// Input order is not trusted; samples are stably sorted by timestamp
/// first, so transitions sharing a timestamp keep their input order.
pub fn extract_runs(points: &[StatePoint]) -> Extraction {
    let mut sorted: Vec<StatePoint> = points.to_vec();
    sorted.sort_by_key(|p| p.timestamp_ms);

    let mut extraction = Extraction::default();
    let mut prev_running: Option<bool> = None;
    let mut pending: Option<OpenRun> = None;

    for point in sorted {
        // Keep only transition points. The first sample counts as one, but
        // opens an interval only when it is a start.
        if prev_running == Some(point.running) {
            continue;
        }
        prev_running = Some(point.running);

        if point.running {
            pending = Some(OpenRun {
                start_ms: point.timestamp_ms,
                start_counter: point.counter,
            });
        } else if let Some(open) = pending.take() {
            extraction.runs.push(RunBounds {
                start_ms: open.start_ms,
                end_ms: point.timestamp_ms,
                start_counter: open.start_counter,
                end_counter: point.counter,
            });
        }
    }

    extraction.open_run = pending;
    extraction
}
