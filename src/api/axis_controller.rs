use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{
    Axis, AxisId, Millis, Rect, ScrollContainer, UsableWindow, compute_delta,
};
use crate::error::{ViewportError, ViewportResult};
use crate::layout::LayoutTree;

use super::{AnimationSession, ScrollAnimator};

/// Moves smaller than this are not worth a scroll command.
pub(crate) const MIN_SCROLL_MOVE_PX: f64 = 0.5;

/// How a scroll command reaches the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollMotion {
    Immediate,
    Animated { duration_ms: Millis },
}

/// Scroll command actually issued by a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollIssue {
    pub axis: AxisId,
    pub from: f64,
    pub to: f64,
    pub animated: bool,
    /// Run that was superseded on the same axis, if any.
    pub cancelled: Option<AnimationSession>,
}

/// Owner of one scroll container along one axis.
///
/// Controllers are attached fresh from the layout for every decision, so a
/// container torn down by a view switch is never written through a stale handle.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisController {
    id: AxisId,
    bounds: Rect,
    container: ScrollContainer,
}

impl AxisController {
    pub fn attach<T: LayoutTree>(tree: &T, id: AxisId) -> ViewportResult<Self> {
        let metrics = tree
            .container_metrics(&id.container, id.axis)
            .ok_or_else(|| ViewportError::ContainerNotFound(id.to_string()))?;
        Ok(Self {
            id,
            bounds: metrics.bounds,
            container: metrics.scroll,
        })
    }

    #[must_use]
    pub fn id(&self) -> &AxisId {
        &self.id
    }

    #[must_use]
    pub fn axis(&self) -> Axis {
        self.id.axis
    }

    #[must_use]
    pub fn container(&self) -> ScrollContainer {
        self.container
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Visible span minus `margin` on both ends and `occlusion` on the trailing end.
    #[must_use]
    pub fn usable_window(&self, occlusion: f64, margin: f64) -> UsableWindow {
        UsableWindow::new(self.bounds.span(self.axis()), margin, occlusion)
    }

    /// Minimal offset change bringing `target` inside the usable window.
    #[must_use]
    pub fn compute_delta(&self, target: Rect, occlusion: f64, margin: f64) -> f64 {
        compute_delta(
            target.span(self.axis()),
            self.usable_window(occlusion, margin),
        )
    }

    #[must_use]
    pub fn is_visible(&self, target: Rect, occlusion: f64, margin: f64) -> bool {
        self.usable_window(occlusion, margin)
            .contains(target.span(self.axis()))
    }

    /// Clamped offset after applying `delta` to the current offset.
    #[must_use]
    pub fn offset_after(&self, delta: f64) -> f64 {
        self.container.clamp_offset(self.container.offset + delta)
    }

    /// Moves the container to `offset` (clamped).
    ///
    /// Returns `None` when no command is needed: the container already sits
    /// there, or an animated request finds a live run already heading there.
    /// An immediate request always lands, cancelling any run in flight.
    pub fn scroll_to<T: LayoutTree>(
        &mut self,
        tree: &mut T,
        animator: &mut ScrollAnimator,
        offset: f64,
        motion: ScrollMotion,
        now: Millis,
    ) -> ViewportResult<Option<ScrollIssue>> {
        let target = self.container.clamp_offset(offset);
        let from = self.container.offset;

        if matches!(motion, ScrollMotion::Animated { duration_ms } if duration_ms > 0) {
            if let Some(session) = animator.session(&self.id) {
                if (session.target_offset - target).abs() < MIN_SCROLL_MOVE_PX {
                    trace!(axis = %self.id, target, "run already heading to target");
                    return Ok(None);
                }
            }
        }

        if (target - from).abs() < MIN_SCROLL_MOVE_PX {
            let cancelled = animator.cancel(&self.id);
            if cancelled.is_none() {
                return Ok(None);
            }
            return Ok(Some(ScrollIssue {
                axis: self.id.clone(),
                from,
                to: from,
                animated: false,
                cancelled,
            }));
        }

        match motion {
            ScrollMotion::Animated { duration_ms } if duration_ms > 0 => {
                let cancelled = animator.start(self.id.clone(), from, target, duration_ms, now);
                Ok(Some(ScrollIssue {
                    axis: self.id.clone(),
                    from,
                    to: target,
                    animated: true,
                    cancelled,
                }))
            }
            _ => {
                let cancelled = animator.cancel(&self.id);
                tree.set_scroll_offset(&self.id.container, self.id.axis, target)?;
                self.container.offset = target;
                Ok(Some(ScrollIssue {
                    axis: self.id.clone(),
                    from,
                    to: target,
                    animated: false,
                    cancelled,
                }))
            }
        }
    }
}
