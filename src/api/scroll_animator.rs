use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{AxisId, Millis, ease_out_cubic};

/// Terminal phases kept for inspection; the oldest is dropped beyond this.
pub const FINISHED_PHASE_CAPACITY: usize = 64;

/// Lifecycle of the eased run on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationPhase {
    Idle,
    Animating,
    Completed,
    Cancelled,
}

/// One live eased scroll run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSession {
    pub axis: AxisId,
    pub start_offset: f64,
    pub target_offset: f64,
    pub start_time: Millis,
    pub duration_ms: Millis,
    pub last_written: f64,
    pub cancelled: bool,
}

impl AnimationSession {
    #[must_use]
    pub fn progress(&self, now: Millis) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start_time) as f64;
        (elapsed / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn offset_at(&self, now: Millis) -> f64 {
        let eased = ease_out_cubic(self.progress(now));
        self.start_offset + (self.target_offset - self.start_offset) * eased
    }
}

/// Offset the animator wants written this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub axis: AxisId,
    pub offset: f64,
    pub completed: bool,
}

/// Arena of eased runs keyed by stable axis id; at most one per axis.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    sessions: IndexMap<AxisId, AnimationSession>,
    finished: IndexMap<AxisId, AnimationPhase>,
    epsilon_px: f64,
}

impl ScrollAnimator {
    #[must_use]
    pub fn new(epsilon_px: f64) -> Self {
        Self {
            sessions: IndexMap::new(),
            finished: IndexMap::new(),
            epsilon_px,
        }
    }

    pub fn set_epsilon_px(&mut self, epsilon_px: f64) {
        self.epsilon_px = epsilon_px;
    }

    /// Starts a run, replacing (and returning) any run already live on `axis`.
    pub fn start(
        &mut self,
        axis: AxisId,
        from: f64,
        to: f64,
        duration_ms: Millis,
        now: Millis,
    ) -> Option<AnimationSession> {
        let replaced = self.cancel(&axis);
        self.finished.shift_remove(&axis);
        trace!(axis = %axis, from, to, duration_ms, "animation started");
        self.sessions.insert(
            axis.clone(),
            AnimationSession {
                axis,
                start_offset: from,
                target_offset: to,
                start_time: now,
                duration_ms,
                last_written: from,
                cancelled: false,
            },
        );
        replaced
    }

    /// Stops the run on `axis` where it is; the container keeps its last offset.
    pub fn cancel(&mut self, axis: &AxisId) -> Option<AnimationSession> {
        let mut session = self.sessions.shift_remove(axis)?;
        session.cancelled = true;
        self.record_finished(axis.clone(), AnimationPhase::Cancelled);
        Some(session)
    }

    pub fn cancel_all(&mut self) -> Vec<AnimationSession> {
        let axes: Vec<AxisId> = self.sessions.keys().cloned().collect();
        axes.iter().filter_map(|axis| self.cancel(axis)).collect()
    }

    /// Forgets terminal phases, e.g. when the owning view is torn down.
    pub fn reset(&mut self) -> Vec<AnimationSession> {
        let cancelled = self.cancel_all();
        self.finished.clear();
        cancelled
    }

    #[must_use]
    pub fn phase(&self, axis: &AxisId) -> AnimationPhase {
        if self.sessions.contains_key(axis) {
            return AnimationPhase::Animating;
        }
        self.finished
            .get(axis)
            .copied()
            .unwrap_or(AnimationPhase::Idle)
    }

    #[must_use]
    pub fn session(&self, axis: &AxisId) -> Option<&AnimationSession> {
        self.sessions.get(axis)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn live_axes(&self) -> impl Iterator<Item = &AxisId> {
        self.sessions.keys()
    }

    /// Advances every run to `now` and returns the writes worth applying.
    ///
    /// Sub-epsilon moves are skipped; a finished run always yields its exact
    /// target once so no rounding residue remains.
    pub fn step(&mut self, now: Millis) -> SmallVec<[AnimationFrame; 4]> {
        let mut frames = SmallVec::new();
        let mut completed = Vec::new();
        for (axis, session) in &mut self.sessions {
            if session.progress(now) >= 1.0 {
                frames.push(AnimationFrame {
                    axis: axis.clone(),
                    offset: session.target_offset,
                    completed: true,
                });
                completed.push(axis.clone());
                continue;
            }
            let offset = session.offset_at(now);
            if (offset - session.last_written).abs() > self.epsilon_px {
                session.last_written = offset;
                frames.push(AnimationFrame {
                    axis: axis.clone(),
                    offset,
                    completed: false,
                });
            }
        }
        for axis in completed {
            self.sessions.shift_remove(&axis);
            self.record_finished(axis, AnimationPhase::Completed);
        }
        frames
    }

    /// Drops a run whose container disappeared mid-flight.
    pub fn abandon(&mut self, axis: &AxisId) {
        if self.sessions.shift_remove(axis).is_some() {
            self.record_finished(axis.clone(), AnimationPhase::Cancelled);
        }
    }

    fn record_finished(&mut self, axis: AxisId, phase: AnimationPhase) {
        self.finished.shift_remove(&axis);
        self.finished.insert(axis, phase);
        while self.finished.len() > FINISHED_PHASE_CAPACITY {
            self.finished.shift_remove_index(0);
        }
    }
}
