//! Spin planning and winner resolution.
//!
//! The wheel turns under a fixed pointer mounted at the top, so the slice
//! under the pointer moves opposite to the visual rotation. Resolution
//! must stay bit-exact with the animation: a pointer that lands exactly on
//! a slice boundary belongs to the slice that starts there.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::random::RandomSource;
use crate::types::{Segment, SpinError, SpinPlan};

const FULL_TURN: f64 = 360.0;

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Spin "weight" presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinTier {
    /// 4–8 turns over 4–8 seconds.
    #[default]
    Standard,
    /// 5–10 turns, slower per turn.
    Grand,
}

impl SpinTier {
    pub fn params(self) -> SpinParams {
        match self {
            SpinTier::Standard => SpinParams {
                min_spins: 4.0,
                max_spins: 8.0,
                base_duration_ms: 4000.0,
                ms_per_spin: 1000.0,
            },
            SpinTier::Grand => SpinParams {
                min_spins: 5.0,
                max_spins: 10.0,
                base_duration_ms: 4500.0,
                ms_per_spin: 1200.0,
            },
        }
    }
}

/// Range of revolutions and the linear duration model for a wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinParams {
    pub min_spins: f64,
    pub max_spins: f64,
    /// Duration of a spin that turns exactly `min_spins` times.
    pub base_duration_ms: f64,
    /// Extra duration for each revolution above `min_spins`.
    pub ms_per_spin: f64,
}

impl SpinParams {
    /// Animation length for a spin of `spins` revolutions.
    pub fn duration_for_spins(&self, spins: f64) -> u64 {
        let ms = self.base_duration_ms + (spins - self.min_spins) * self.ms_per_spin;
        ms.max(0.0).round() as u64
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Draw the rotation and duration for the next spin.
///
/// Consumes two values from `rng`: the revolution count, then the
/// sub-turn offset.
pub fn plan_spin(
    current_rotation: f64,
    segment_count: usize,
    params: &SpinParams,
    rng: &mut dyn RandomSource,
) -> Result<SpinPlan, SpinError> {
    if segment_count == 0 {
        return Err(SpinError::InvalidState(
            "cannot plan a spin for a wheel with no segments".into(),
        ));
    }
    if !current_rotation.is_finite() {
        return Err(SpinError::InvalidState(format!(
            "current rotation is not finite: {current_rotation}"
        )));
    }

    let spins = params.min_spins + rng.next_f64() * (params.max_spins - params.min_spins);
    let offset = rng.next_f64() * FULL_TURN;
    let rotation_delta = spins * FULL_TURN + offset;
    let duration_ms = params.duration_for_spins(spins);

    debug!(
        spins = format!("{spins:.2}"),
        rotation_delta = format!("{rotation_delta:.1}"),
        duration_ms,
        segment_count,
        "Spin planned"
    );

    Ok(SpinPlan {
        spins,
        rotation_delta,
        duration_ms,
        final_rotation: current_rotation + rotation_delta,
    })
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Index of the slice under the pointer after the wheel reaches
/// `final_rotation` degrees.
pub fn winning_index(final_rotation: f64, segment_count: usize) -> Result<usize, SpinError> {
    if segment_count == 0 {
        return Err(SpinError::InvalidState(
            "cannot resolve a winner on a wheel with no segments".into(),
        ));
    }
    if !final_rotation.is_finite() {
        return Err(SpinError::InvalidState(format!(
            "final rotation is not finite: {final_rotation}"
        )));
    }

    let slice = FULL_TURN / segment_count as f64;
    let normalized = ((final_rotation % FULL_TURN) + FULL_TURN) % FULL_TURN;
    let pointer_angle = (FULL_TURN - normalized) % FULL_TURN;
    let index = (pointer_angle / slice).floor() as usize % segment_count;
    Ok(index)
}

/// The segment under the pointer at `final_rotation`.
pub fn resolve_winner<T>(
    final_rotation: f64,
    segments: &[Segment<T>],
) -> Result<&Segment<T>, SpinError> {
    let index = winning_index(final_rotation, segments.len())?;
    Ok(&segments[index])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
