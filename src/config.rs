// Packrun - Production-run metrics for packing lines
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Pipeline configuration.
//!
//! Every tunable the pipeline consults lives here as an explicit parameter;
//! nothing is an embedded literal.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// How a counter reset (negative raw difference) contributes to the
/// normalized series.
///
/// Plant controllers restart with the counter at or near zero, so the raw
/// cumulative series occasionally drops. Both repair policies are seen in
/// the field; the caller must pick one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetPolicy {
    /// A reset contributes nothing: the normalized counter holds its value
    /// across the drop.
    ClampToZero,
    /// A reset contributes the raw post-reset value, treating the restart
    /// count as production since the reset.
    SubstituteRaw,
}

/// Configuration for the per-line pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Counter reset handling.
    pub reset_policy: ResetPolicy,
    /// Weight samples at or below this value are treated as empty-box
    /// readings and excluded from the window mean. Same unit as the raw
    /// weight signal.
    pub noise_floor: f64,
    /// Multiplier from raw weight units to reported mass units
    /// (0.001 for grams to kilograms).
    pub mass_unit_factor: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reset_policy: ResetPolicy::ClampToZero,
            noise_floor: 0.0,
            mass_unit_factor: 0.001,
        }
    }
}

impl PipelineConfig {
    /// Check field ranges before a batch run.
    pub fn validate(&self) -> Result<()> {
        if !self.noise_floor.is_finite() || self.noise_floor < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "noise_floor must be finite and non-negative, got {}",
                self.noise_floor
            )));
        }
        if !self.mass_unit_factor.is_finite() || self.mass_unit_factor <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "mass_unit_factor must be finite and positive, got {}",
                self.mass_unit_factor
            )));
        }
        Ok(())
    }
}
