// Packrun - Production-run metrics for packing lines
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! As-of lookup of the normalized counter.
//!
//! Sample-and-hold semantics: a state sample carries the latest counter
//! value at or before its own timestamp. Before the first counter reading
//! there is nothing to hold and the lookup reports `None`; that gap flows
//! downstream as a per-run quality flag rather than a fabricated zero.

use crate::counter::CounterPoint;

/// Latest normalized counter value at or before `timestamp_ms`.
///
/// `points` must be sorted by timestamp; [`crate::counter::normalize`]
/// output already is.
pub fn value_asof(points: &[CounterPoint], timestamp_ms: u64) -> Option<f64> {
    let idx = points.partition_point(|p| p.timestamp_ms <= timestamp_ms);
    if idx == 0 {
        None
    } else {
        Some(points[idx - 1].normalized)
    }
}
