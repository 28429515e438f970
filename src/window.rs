// Packrun - Production-run metrics for packing lines
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Weight-sample aggregation over a run window.

use crate::signal::Observation;

/// Mean qualifying sample weight inside `[start_ms, end_ms]`, inclusive at
/// both ends, scaled by `unit_factor`.
///
/// Samples with a missing value, or a value at or below `noise_floor`, do
/// not qualify: a near-zero reading means an empty sample box, not a
/// measurement. Returns `None` when nothing qualifies; an empty window
/// must stay undefined rather than feed a zero into the mass estimate.
pub fn mean_weight(
    samples: &[Observation],
    start_ms: u64,
    end_ms: u64,
    noise_floor: f64,
    unit_factor: f64,
) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;

    for sample in samples {
        if sample.timestamp_ms < start_ms || sample.timestamp_ms > end_ms {
            continue;
        }
        if let Some(value) = sample.value {
            if value > noise_floor {
                sum += value;
                count += 1;
            }
        }
    }

    if count == 0 {
        None
    } else {
        Some(sum / count as f64 * unit_factor)
    }
}
