use serde::{Deserialize, Serialize};

use crate::core::{AxisId, FrameId, Granularity, Millis, PeriodKey};
use crate::interaction::GuardState;
use crate::layout::LayoutTree;

use super::{DebounceSlot, ViewportEngine};

/// Point-in-time view of engine state for diagnostics and bug reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub frame: FrameId,
    pub now_ms: Millis,
    pub granularity: Granularity,
    pub period: Option<PeriodKey>,
    pub selection: Option<String>,
    pub occlusion_px: f64,
    pub guard: GuardState,
    pub animating_axes: Vec<AxisId>,
    pub pending_debounce: Vec<DebounceSlot>,
    /// Human-readable description of the in-flight lookup, if any.
    pub pending_locate: Option<String>,
    pub follow_pass_due: Option<Millis>,
}

impl<T: LayoutTree> ViewportEngine<T> {
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            frame: self.frame,
            now_ms: self.now_ms(),
            granularity: self.granularity,
            period: self.period,
            selection: self.selection.clone(),
            occlusion_px: self.occlusion.current_occlusion(),
            guard: self.guard.state(),
            animating_axes: self.animator.live_axes().cloned().collect(),
            pending_debounce: self.debouncer.slots().cloned().collect(),
            pending_locate: self.pending.as_ref().map(|pending| pending.describe()),
            follow_pass_due: self.follow_pass.as_ref().map(|pass| pass.due_at),
        }
    }
}
