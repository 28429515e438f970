// Packrun - Production-run metrics for packing lines
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Counter normalization.
//!
//! The totalised production counter drops to a small value whenever the
//! line controller restarts. This module rebuilds a non-decreasing
//! cumulative series from the raw readings so downstream interval deltas
//! stay meaningful across resets.

use crate::config::ResetPolicy;
use crate::signal::Observation;

/// One normalized counter reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterPoint {
    /// Epoch milliseconds.
    pub timestamp_ms: u64,
    /// Raw reading, kept for auditing. `None` when missing or unparseable.
    pub raw: Option<f64>,
    /// Cumulative count since the start of the series.
    pub normalized: f64,
}

/// Rebuild a non-decreasing cumulative series from raw counter readings.
///
/// The first reading contributes zero (it has no predecessor). A negative
/// raw difference marks a reset and contributes according to `policy`.
/// Missing readings contribute zero and do not poison the running sum: the
/// last valid reading stays the comparison point across a gap.
///
/// Input order is not trusted; the series is stably sorted by timestamp
/// first. This step never fails.
pub fn normalize(series: &[Observation], policy: ResetPolicy) -> Vec<CounterPoint> {
    let mut sorted: Vec<Observation> = series.to_vec();
    sorted.sort_by_key(|obs| obs.timestamp_ms);

    let mut out = Vec::with_capacity(sorted.len());
    let mut cumulative = 0.0;
    let mut prev_raw: Option<f64> = None;

    for obs in sorted {
        let increment = match (prev_raw, obs.value) {
            (Some(prev), Some(current)) => {
                let diff = current - prev;
                if diff < 0.0 {
                    log::debug!(
                        "counter reset {} -> {} at {}",
                        prev,
                        current,
                        obs.timestamp_ms
                    );
                    match policy {
                        ResetPolicy::ClampToZero => 0.0,
                        // A negative post-reset reading still may not
                        // decrease the series.
                        ResetPolicy::SubstituteRaw => current.max(0.0),
                    }
                } else {
                    diff
                }
            }
            // First reading, or a missing reading: zero contribution.
            _ => 0.0,
        };

        cumulative += increment;
        if obs.value.is_some() {
            prev_raw = obs.value;
        }

        out.push(CounterPoint {
            timestamp_ms: obs.timestamp_ms,
            raw: obs.value,
            normalized: cumulative,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[(u64, Option<f64>)]) -> Vec<Observation> {
        values
            .iter()
            .map(|&(timestamp_ms, value)| Observation {
                timestamp_ms,
                value,
            })
            .collect()
    }

    fn normalized_values(points: &[CounterPoint]) -> Vec<f64> {
        points.iter().map(|p| p.normalized).collect()
    }

    #[test]
    fn test_reset_clamp_to_zero() {
        let input = series(&[
            (0, Some(10.0)),
            (1, Some(20.0)),
            (2, Some(5.0)),
            (3, Some(15.0)),
        ]);
        let out = normalize(&input, ResetPolicy::ClampToZero);
        assert_eq!(normalized_values(&out), vec![0.0, 10.0, 10.0, 20.0]);
    }

    #[test]
    fn test_reset_substitute_raw() {
        let input = series(&[
            (0, Some(10.0)),
            (1, Some(20.0)),
            (2, Some(5.0)),
            (3, Some(15.0)),
        ]);
        let out = normalize(&input, ResetPolicy::SubstituteRaw);
        assert_eq!(normalized_values(&out), vec![0.0, 10.0, 15.0, 25.0]);
    }

    #[test]
    fn test_single_observation_is_zero() {
        let out = normalize(&series(&[(100, Some(4242.0))]), ResetPolicy::ClampToZero);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].normalized, 0.0);
        assert_eq!(out[0].raw, Some(4242.0));
    }

    #[test]
    fn test_missing_values_contribute_zero() {
        // Gap around the missing reading: 10 -> None -> 12 still counts +2.
        let input = series(&[(0, Some(10.0)), (1, None), (2, Some(12.0))]);
        let out = normalize(&input, ResetPolicy::ClampToZero);
        assert_eq!(normalized_values(&out), vec![0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_all_missing_series() {
        let input = series(&[(0, None), (1, None)]);
        let out = normalize(&input, ResetPolicy::ClampToZero);
        assert_eq!(normalized_values(&out), vec![0.0, 0.0]);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let input = series(&[(3, Some(15.0)), (0, Some(10.0)), (2, Some(5.0)), (1, Some(20.0))]);
        let out = normalize(&input, ResetPolicy::ClampToZero);
        let timestamps: Vec<u64> = out.iter().map(|p| p.timestamp_ms).collect();
        assert_eq!(timestamps, vec![0, 1, 2, 3]);
        assert_eq!(normalized_values(&out), vec![0.0, 10.0, 10.0, 20.0]);
    }

    #[test]
    fn test_monotonicity_with_mixed_input() {
        let input = series(&[
            (0, Some(50.0)),
            (1, Some(80.0)),
            (2, None),
            (3, Some(3.0)),
            (4, Some(-7.0)),
            (5, Some(40.0)),
            (6, Some(40.0)),
        ]);
        for policy in [ResetPolicy::ClampToZero, ResetPolicy::SubstituteRaw] {
            let out = normalize(&input, policy);
            for pair in out.windows(2) {
                assert!(
                    pair[1].normalized >= pair[0].normalized,
                    "decreasing step under {:?}: {:?}",
                    policy,
                    pair
                );
            }
        }
    }

    #[test]
    fn test_empty_series() {
        assert!(normalize(&[], ResetPolicy::ClampToZero).is_empty());
    }
}
