// Packrun - Production-run metrics for packing lines
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Per-line pipeline orchestration.
//!
//! Composes the normalizer, the as-of join, the edge extractor, and the
//! window aggregator as pure functions over an immutable snapshot. Each
//! line is processed independently; nothing is shared or mutated across
//! lines, and the computation is deterministic over a fixed snapshot.

use crate::config::PipelineConfig;
use crate::counter;
use crate::edges::{self, StatePoint};
use crate::join;
use crate::report::{self, LineReport};
use crate::signal::LineSignals;
use crate::window;

/// Run the full pipeline over one line's signal snapshot.
pub fn process_line(signals: &LineSignals, config: &PipelineConfig) -> LineReport {
    let counter = counter::normalize(&signals.counter, config.reset_policy);

    // Explicit as-of join: each state sample carries the counter value in
    // force at that instant.
    let joined: Vec<StatePoint> = signals
        .state
        .iter()
        .map(|obs| StatePoint {
            timestamp_ms: obs.timestamp_ms,
            running: edges::is_running(obs.value),
            counter: join::value_asof(&counter, obs.timestamp_ms),
        })
        .collect();

    let extraction = edges::extract_runs(&joined);

    let runs = extraction
        .runs
        .iter()
        .map(|bounds| {
            let mean = window::mean_weight(
                &signals.weight,
                bounds.start_ms,
                bounds.end_ms,
                config.noise_floor,
                config.mass_unit_factor,
            );
            report::build_record(bounds, mean)
        })
        .collect();

    log::debug!(
        "line {}: {} complete runs, open run: {}",
        signals.line_id,
        extraction.runs.len(),
        extraction.open_run.is_some()
    );

    LineReport {
        line_id: signals.line_id.clone(),
        runs,
        open_run: extraction.open_run,
    }
}

/// Process a batch of lines.
///
/// Lines are independent; output order matches input order.
pub fn process_lines(lines: &[LineSignals], config: &PipelineConfig) -> Vec<LineReport> {
    lines
        .iter()
        .map(|signals| process_line(signals, config))
        .collect()
}
