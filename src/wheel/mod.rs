//! Wheel state container.
//!
//! Holds the segments, cumulative rotation, in-flight flag, last winner and
//! a bounded history for one wheel. Spinning is split into `start_spin`
//! and `finish_spin` so a caller can animate in between; the in-flight
//! flag rejects a second spin until the first one resolves or is cancelled.

pub mod resolver;

use chrono::Utc;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::random::RandomSource;
use crate::types::{Segment, SpinError, SpinPlan, SpinResult};
use resolver::{plan_spin, resolve_winner, SpinTier};

/// Default number of past winners kept per wheel.
pub const DEFAULT_HISTORY_LEN: usize = 5;

/// A spin that has been planned but not yet resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSpin {
    pub id: Uuid,
    pub plan: SpinPlan,
}

pub struct Wheel<T> {
    segments: Vec<Segment<T>>,
    tier: SpinTier,
    rotation: f64,
    pending: Option<PendingSpin>,
    winner: Option<Segment<T>>,
    history: VecDeque<Segment<T>>,
    history_len: usize,
}

impl<T: Clone> Wheel<T> {
    pub fn new(segments: Vec<Segment<T>>, tier: SpinTier, history_len: usize) -> Self {
        Self {
            segments,
            tier,
            rotation: 0.0,
            pending: None,
            winner: None,
            history: VecDeque::with_capacity(history_len),
            history_len,
        }
    }

    /// Build a wheel from items, numbering segments in order.
    pub fn from_items<F>(items: Vec<T>, tier: SpinTier, history_len: usize, describe: F) -> Self
    where
        F: Fn(&T) -> (String, String),
    {
        Self::new(Self::build_segments(items, describe), tier, history_len)
    }

    fn build_segments<F>(items: Vec<T>, describe: F) -> Vec<Segment<T>>
    where
        F: Fn(&T) -> (String, String),
    {
        items
            .into_iter()
            .enumerate()
            .map(|(ordinal, item)| {
                let (id, label) = describe(&item);
                Segment {
                    id,
                    label,
                    ordinal,
                    item,
                }
            })
            .collect()
    }

    /// Replace the segments. Rejected while a spin is in flight.
    ///
    /// Clears the current winner; rotation and history are kept.
    pub fn set_items<F>(&mut self, items: Vec<T>, describe: F) -> Result<(), SpinError>
    where
        F: Fn(&T) -> (String, String),
    {
        if self.is_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        self.segments = Self::build_segments(items, describe);
        self.winner = None;
        Ok(())
    }

    /// Plan a spin and advance the rotation.
    ///
    /// Returns `Ok(None)` when the wheel has no segments: spinning an empty
    /// wheel does nothing.
    pub fn start_spin(
        &mut self,
        rng: &mut dyn RandomSource,
    ) -> Result<Option<PendingSpin>, SpinError> {
        if self.is_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        if self.segments.is_empty() {
            debug!("Spin requested on an empty wheel, ignoring");
            return Ok(None);
        }

        let plan = plan_spin(
            self.rotation,
            self.segments.len(),
            &self.tier.params(),
            rng,
        )?;
        let pending = PendingSpin {
            id: Uuid::new_v4(),
            plan,
        };

        self.rotation = plan.final_rotation;
        self.winner = None;
        self.pending = Some(pending);
        Ok(Some(pending))
    }

    /// Resolve the pending spin, record the winner and clear the flag.
    pub fn finish_spin(&mut self) -> Result<SpinResult<T>, SpinError> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| SpinError::InvalidState("no spin in progress".into()))?;

        let winner = resolve_winner(pending.plan.final_rotation, &self.segments)?.clone();

        self.history.push_front(winner.clone());
        self.history.truncate(self.history_len);
        self.winner = Some(winner.clone());

        info!(
            spin_id = %pending.id,
            winner = %winner.label,
            rotation = format!("{:.1}", pending.plan.final_rotation),
            "Spin resolved"
        );

        Ok(SpinResult {
            id: pending.id,
            plan: pending.plan,
            winner,
            spun_at: Utc::now(),
        })
    }

    /// Abandon the pending spin. The wheel keeps its new rotation.
    pub fn cancel_spin(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(spin_id = %pending.id, "Spin cancelled");
        }
    }

    /// Start, wait out the animation scaled by `pace`, then resolve.
    ///
    /// `pace` of 0 resolves immediately. Dropping the future mid-wait
    /// cancels the spin, so the wheel never stays stuck in flight.
    pub async fn spin(
        &mut self,
        rng: &mut dyn RandomSource,
        pace: f64,
    ) -> Result<Option<SpinResult<T>>, SpinError> {
        let Some(pending) = self.start_spin(rng)? else {
            return Ok(None);
        };
        let mut guard = InFlight { wheel: self };
        let wait = animation_delay(pending.plan.duration_ms, pace);
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        guard.wheel.finish_spin().map(Some)
    }

    /// Clear winner, rotation and any pending spin. History is kept.
    pub fn reset(&mut self) {
        self.rotation = 0.0;
        self.pending = None;
        self.winner = None;
    }

    // -- Accessors --------------------------------------------------------

    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    pub fn is_spinning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingSpin> {
        self.pending.as_ref()
    }

    pub fn can_spin(&self) -> bool {
        !self.is_spinning() && !self.segments.is_empty()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn tier(&self) -> SpinTier {
        self.tier
    }

    pub fn winner(&self) -> Option<&Segment<T>> {
        self.winner.as_ref()
    }

    /// Past winners, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &Segment<T>> {
        self.history.iter()
    }

    pub fn restore_history(&mut self, past: Vec<Segment<T>>) {
        self.history = past.into_iter().take(self.history_len).collect();
    }
}

/// Cancels a still-pending spin when dropped.
struct InFlight<'a, T: Clone> {
    wheel: &'a mut Wheel<T>,
}

impl<T: Clone> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.wheel.is_spinning() {
            self.wheel.cancel_spin();
        }
    }
}

/// Real-time wait for an animation of `duration_ms`, scaled by `pace`.
pub fn animation_delay(duration_ms: u64, pace: f64) -> Duration {
    if pace <= 0.0 || !pace.is_finite() {
        return Duration::ZERO;
    }
    Duration::from_millis((duration_ms as f64 * pace).round() as u64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
