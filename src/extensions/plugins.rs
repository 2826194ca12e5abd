use serde::{Deserialize, Serialize};

use crate::core::{AxisId, FrameId, Granularity, Millis, PeriodKey};
use crate::interaction::NavigationGesture;

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportContext {
    pub frame: FrameId,
    pub now_ms: Millis,
    pub granularity: Granularity,
    pub period: Option<PeriodKey>,
    pub occlusion_px: f64,
    pub guard_active: bool,
}

/// Event stream exposed to plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportEvent {
    /// One axis was asked to move; `animated` distinguishes jumps from eased runs.
    ScrollIssued {
        frame: FrameId,
        axis: AxisId,
        from: f64,
        to: f64,
        animated: bool,
    },
    AnimationCancelled {
        axis: AxisId,
        reached: f64,
    },
    AnimationCompleted {
        frame: FrameId,
        axis: AxisId,
        offset: f64,
    },
    GuardArmed {
        gesture: NavigationGesture,
        expires_at: Millis,
    },
    GuardCleared {
        at: Millis,
    },
    TargetNotFound {
        target: String,
    },
    ContainerNotFound {
        container: String,
    },
    OcclusionChanged {
        width_px: f64,
    },
    GranularityChanged {
        granularity: Granularity,
    },
    PeriodChanged {
        period: PeriodKey,
    },
}

/// Extension hook interface for bounded custom logic.
///
/// Plugins observe events and read engine context; they cannot issue scroll
/// commands themselves.
pub trait ViewportPlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &ViewportEvent, context: ViewportContext);
}
