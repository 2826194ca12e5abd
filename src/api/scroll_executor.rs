use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::{AxisId, Millis};
use crate::error::ViewportError;
use crate::extensions::ViewportEvent;
use crate::layout::LayoutTree;

use super::axis_controller::MIN_SCROLL_MOVE_PX;
use super::{AxisController, DebounceDecision, ScrollIssue, ScrollMotion, ViewportEngine};

/// Delivery path of one planned axis correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionMotion {
    Immediate,
    Animated,
    Debounced,
}

/// Intended move of one axis, computed before anything is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisCorrection {
    pub axis: AxisId,
    pub current_offset: f64,
    pub target_offset: f64,
    pub motion: CorrectionMotion,
}

impl AxisController {
    /// Correction moving this axis by `delta`, or `None` when clamping leaves nothing to do.
    #[must_use]
    pub fn correction(&self, delta: f64, motion: CorrectionMotion) -> Option<AxisCorrection> {
        let current_offset = self.container().offset;
        let target_offset = self.offset_after(delta);
        if (target_offset - current_offset).abs() < MIN_SCROLL_MOVE_PX {
            return None;
        }
        Some(AxisCorrection {
            axis: self.id().clone(),
            current_offset,
            target_offset,
            motion,
        })
    }
}

/// Corrections applied together by one executor call.
///
/// Every correction of a plan is issued within the same tick, so two axes
/// never move one frame apart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrectionPlan {
    corrections: SmallVec<[AxisCorrection; 2]>,
}

impl CorrectionPlan {
    pub fn push(&mut self, correction: Option<AxisCorrection>) {
        if let Some(correction) = correction {
            self.corrections.push(correction);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AxisCorrection> {
        self.corrections.iter()
    }
}

/// Why an entry point decided not to move anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    TargetNotFound,
    ContainerNotFound,
    NoSelection,
    NoPeriod,
    /// Passive follow while an explicit navigation holds the guard.
    Suppressed,
}

/// What an entry point did. Never an error: the worst case is "did not scroll".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationOutcome {
    /// Scroll commands issued now (immediate writes or started runs).
    Issued { commands: usize },
    /// Requests handed to the debouncer.
    Scheduled { axes: usize },
    AlreadyVisible,
    /// Target not rendered yet; the lookup continues on later ticks.
    Pending,
    Skipped(SkipReason),
}

impl NavigationOutcome {
    pub(super) fn from_error(error: &ViewportError) -> Self {
        match error {
            ViewportError::ContainerNotFound(_) => Self::Skipped(SkipReason::ContainerNotFound),
            _ => Self::Skipped(SkipReason::TargetNotFound),
        }
    }
}

impl<T: LayoutTree> ViewportEngine<T> {
    /// Applies every correction of `plan` in this call.
    pub(super) fn execute_plan(&mut self, plan: CorrectionPlan) -> NavigationOutcome {
        if plan.is_empty() {
            return NavigationOutcome::AlreadyVisible;
        }
        let now = self.now_ms();
        let mut issued = 0;
        let mut scheduled = 0;
        for correction in plan.corrections {
            match correction.motion {
                CorrectionMotion::Debounced => {
                    let decision = self.debouncer.request(
                        correction.axis.clone(),
                        correction.target_offset,
                        correction.current_offset,
                        self.config.debounce_delay_ms,
                        self.config.denoise_threshold_px,
                        now,
                    );
                    trace!(axis = %correction.axis, ?decision, "debounced correction");
                    if decision != DebounceDecision::Dropped {
                        scheduled += 1;
                    }
                }
                CorrectionMotion::Immediate => {
                    self.drop_debounced(&correction.axis);
                    if self.scroll_axis(
                        &correction.axis,
                        correction.target_offset,
                        ScrollMotion::Immediate,
                        now,
                    ) {
                        issued += 1;
                    }
                }
                CorrectionMotion::Animated => {
                    self.drop_debounced(&correction.axis);
                    let motion = ScrollMotion::Animated {
                        duration_ms: self.config.animation_duration_ms,
                    };
                    if self.scroll_axis(&correction.axis, correction.target_offset, motion, now) {
                        issued += 1;
                    }
                }
            }
        }
        match (issued, scheduled) {
            (0, 0) => NavigationOutcome::AlreadyVisible,
            (0, axes) => NavigationOutcome::Scheduled { axes },
            (commands, _) => NavigationOutcome::Issued { commands },
        }
    }

    /// A direct write on `axis` supersedes whatever the debouncer still holds for it.
    fn drop_debounced(&mut self, axis: &AxisId) {
        if let Some(slot) = self.debouncer.cancel(axis) {
            trace!(axis = %axis, stale = slot.pending_target_offset, "debounced request superseded");
        }
    }

    /// Attaches the owning controller and issues one scroll. Returns `true` when a command went out.
    pub(super) fn scroll_axis(
        &mut self,
        axis: &AxisId,
        target_offset: f64,
        motion: ScrollMotion,
        now: Millis,
    ) -> bool {
        let result = AxisController::attach(&self.tree, axis.clone()).and_then(|mut controller| {
            controller.scroll_to(&mut self.tree, &mut self.animator, target_offset, motion, now)
        });
        match result {
            Ok(Some(issue)) => {
                let moved = (issue.to - issue.from).abs() >= MIN_SCROLL_MOVE_PX;
                self.emit_scroll_issue(issue);
                moved
            }
            Ok(None) => false,
            Err(err) => {
                debug!(axis = %axis, error = %err, "scroll skipped");
                self.emit_event(ViewportEvent::ContainerNotFound {
                    container: axis.to_string(),
                });
                false
            }
        }
    }

    fn emit_scroll_issue(&mut self, issue: ScrollIssue) {
        if let Some(cancelled) = issue.cancelled {
            trace!(axis = %cancelled.axis, reached = cancelled.last_written, "animation superseded");
            self.emit_event(ViewportEvent::AnimationCancelled {
                axis: cancelled.axis,
                reached: cancelled.last_written,
            });
        }
        if (issue.to - issue.from).abs() < MIN_SCROLL_MOVE_PX {
            return;
        }
        debug!(
            axis = %issue.axis,
            from = issue.from,
            to = issue.to,
            animated = issue.animated,
            frame = self.frame,
            "scroll issued"
        );
        self.emit_event(ViewportEvent::ScrollIssued {
            frame: self.frame,
            axis: issue.axis,
            from: issue.from,
            to: issue.to,
            animated: issue.animated,
        });
    }

    /// Fires every debounce slot whose quiet period elapsed, all within this tick.
    pub(super) fn fire_debounced(&mut self, now: Millis) {
        let motion = ScrollMotion::Animated {
            duration_ms: self.config.animation_duration_ms,
        };
        for slot in self.debouncer.take_due(now) {
            self.scroll_axis(&slot.axis, slot.pending_target_offset, motion, now);
        }
    }

    pub(super) fn step_animations(&mut self, now: Millis) {
        for frame in self.animator.step(now) {
            match self
                .tree
                .set_scroll_offset(&frame.axis.container, frame.axis.axis, frame.offset)
            {
                Ok(()) if frame.completed => {
                    trace!(axis = %frame.axis, offset = frame.offset, "animation completed");
                    self.emit_event(ViewportEvent::AnimationCompleted {
                        frame: self.frame,
                        axis: frame.axis,
                        offset: frame.offset,
                    });
                }
                Ok(()) => {}
                Err(err) => {
                    warn!(axis = %frame.axis, error = %err, "dropping animation for vanished container");
                    self.animator.abandon(&frame.axis);
                    self.emit_event(ViewportEvent::ContainerNotFound {
                        container: frame.axis.to_string(),
                    });
                }
            }
        }
    }
}
