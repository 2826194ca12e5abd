use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Granularity, Millis, PeriodKey};
use crate::extensions::ViewportEvent;
use crate::layout::{LayoutTree, NodeQuery};

use super::navigation_coordinator::PendingAction;
use super::{CorrectionMotion, NavigationOutcome, SkipReason, TargetResolver, ViewportEngine};

/// Delayed animated pass absorbing late layout settling after a passive follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct FollowPass {
    pub(super) id: String,
    pub(super) due_at: Millis,
}

impl<T: LayoutTree> ViewportEngine<T> {
    /// Replaces the selection. Returns `None` when it did not change.
    pub fn set_selection(&mut self, selection: Option<String>) -> Option<NavigationOutcome> {
        if self.selection == selection {
            return None;
        }
        self.selection = selection;
        Some(self.react_to_selection_change())
    }

    /// Switches the calendar zoom level.
    ///
    /// The old view's containers are destroyed, so every animation, debounce
    /// slot and pending lookup is dropped rather than migrated. The period
    /// context is re-keyed at the new granularity and the selection is followed
    /// into the new view.
    pub fn set_granularity(&mut self, granularity: Granularity) -> Option<NavigationOutcome> {
        if self.granularity == granularity {
            return None;
        }
        for session in self.animator.reset() {
            self.emit_event(ViewportEvent::AnimationCancelled {
                axis: session.axis,
                reached: session.last_written,
            });
        }
        let dropped_slots = self.debouncer.clear();
        let dropped_locate = self.pending.take().is_some();
        self.follow_pass = None;
        debug!(
            from = ?self.granularity,
            to = ?granularity,
            dropped_slots,
            dropped_locate,
            "granularity switch tears down view state"
        );

        self.granularity = granularity;
        self.emit_event(ViewportEvent::GranularityChanged { granularity });
        if let Some(date) = self.period.and_then(PeriodKey::first_date) {
            self.set_period(PeriodKey::for_date(date, granularity));
        }
        Some(self.react_to_selection_change())
    }

    /// Re-measures overlay panels after a panel toggle or resize.
    ///
    /// When the covered width grows and a selection exists, the selection is
    /// brought back into the narrowed window.
    pub fn on_layout_changed(&mut self) -> Option<NavigationOutcome> {
        let previous = self.occlusion.recompute(&self.tree)?;
        let width_px = self.occlusion.current_occlusion();
        debug!(previous, width_px, "occlusion changed");
        self.emit_event(ViewportEvent::OcclusionChanged { width_px });

        if width_px <= previous || !self.config.follow_selection_on_occlusion_change {
            return None;
        }
        let id = self.selection.clone()?;
        Some(self.scroll_to_keep_visible(&id))
    }

    /// Passive keep-visible reaction: an immediate pass now and an animated
    /// pass `settle_delay_ms` later. Quiet while the guard is active.
    pub(super) fn react_to_selection_change(&mut self) -> NavigationOutcome {
        if self.guard.is_active(self.now_ms()) {
            trace!("passive follow suppressed by navigation guard");
            return NavigationOutcome::Skipped(SkipReason::Suppressed);
        }
        let Some(id) = self.selection.clone() else {
            self.follow_pass = None;
            return NavigationOutcome::Skipped(SkipReason::NoSelection);
        };
        self.follow_pass = None;
        self.begin_locate(
            NodeQuery::Document(id.clone()),
            PendingAction::KeepVisible {
                id,
                motion: CorrectionMotion::Immediate,
                passive: true,
            },
        )
    }

    pub(super) fn schedule_follow_pass(&mut self, id: String) {
        let due_at = self.now_ms().saturating_add(self.config.settle_delay_ms);
        trace!(id = %id, due_at, "follow pass scheduled");
        self.follow_pass = Some(FollowPass { id, due_at });
    }

    pub(super) fn run_follow_pass(&mut self, now: Millis) {
        if !self
            .follow_pass
            .as_ref()
            .is_some_and(|pass| pass.due_at <= now)
        {
            return;
        }
        let Some(pass) = self.follow_pass.take() else {
            return;
        };
        if self.guard.is_active(now) || self.selection.as_deref() != Some(pass.id.as_str()) {
            trace!(id = %pass.id, "follow pass dropped");
            return;
        }
        match TargetResolver::lookup(&self.tree, &NodeQuery::Document(pass.id.clone())) {
            Some(target) => {
                let outcome = self.execute_keep_visible(target, CorrectionMotion::Animated);
                trace!(id = %pass.id, ?outcome, "follow pass");
            }
            None => trace!(id = %pass.id, "follow pass target vanished"),
        }
    }
}
