use tracing::debug;

use crate::core::{FrameId, Granularity, Millis, PeriodKey};
use crate::error::ViewportResult;
use crate::extensions::{ViewportEvent, ViewportPlugin};
use crate::interaction::{Clock, GuardState, NavigationGuard};
use crate::layout::LayoutTree;

use super::navigation_coordinator::PendingNavigation;
use super::selection_follow::FollowPass;
use super::validation::validate_engine_config;
use super::{OcclusionProvider, ScrollAnimator, ScrollDebouncer, ViewportEngineConfig};

/// Main orchestration facade consumed by host applications.
///
/// `ViewportEngine` owns the host layout handle, the per-axis animation and
/// debounce arenas, the navigation guard and the occlusion cache. All state
/// changes happen either inside an entry point or inside [`tick`](Self::tick),
/// which the host drives from its display-refresh callback.
pub struct ViewportEngine<T: LayoutTree> {
    pub(super) tree: T,
    pub(super) clock: Box<dyn Clock>,
    pub(super) config: ViewportEngineConfig,
    pub(super) frame: FrameId,
    pub(super) granularity: Granularity,
    pub(super) period: Option<PeriodKey>,
    pub(super) selection: Option<String>,
    pub(super) guard: NavigationGuard,
    pub(super) occlusion: OcclusionProvider,
    pub(super) animator: ScrollAnimator,
    pub(super) debouncer: ScrollDebouncer,
    pub(super) pending: Option<PendingNavigation>,
    pub(super) follow_pass: Option<FollowPass>,
    pub(super) plugins: Vec<Box<dyn ViewportPlugin>>,
}

impl<T: LayoutTree> ViewportEngine<T> {
    #[must_use]
    pub fn config(&self) -> ViewportEngineConfig {
        self.config
    }

    /// Replaces tuning. Live runs and pending timers keep their original timing.
    pub fn set_config(&mut self, config: ViewportEngineConfig) -> ViewportResult<()> {
        validate_engine_config(config)?;
        self.guard.set_window_ms(config.guard_window_ms);
        self.animator.set_epsilon_px(config.animation_epsilon_px);
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub fn now_ms(&self) -> Millis {
        self.clock.now_ms()
    }

    #[must_use]
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    #[must_use]
    pub fn period(&self) -> Option<PeriodKey> {
        self.period
    }

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    #[must_use]
    pub fn guard_state(&self) -> GuardState {
        self.guard.state()
    }

    #[must_use]
    pub fn is_guard_active(&self) -> bool {
        self.guard.is_active(self.now_ms())
    }

    #[must_use]
    pub fn occlusion_px(&self) -> f64 {
        self.occlusion.current_occlusion()
    }

    #[must_use]
    pub fn animator(&self) -> &ScrollAnimator {
        &self.animator
    }

    #[must_use]
    pub fn debouncer(&self) -> &ScrollDebouncer {
        &self.debouncer
    }

    #[must_use]
    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Mutable access for hosts that rebuild or resize their layout.
    ///
    /// Call [`on_layout_changed`](Self::on_layout_changed) afterwards when panels
    /// or the viewport size changed.
    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    #[must_use]
    pub fn into_tree(self) -> T {
        self.tree
    }

    /// `true` while anything is scheduled for a later tick.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        !self.animator.is_idle()
            || !self.debouncer.is_empty()
            || self.pending.is_some()
            || self.follow_pass.is_some()
            || self.guard.state().active
    }

    /// Advances one display-refresh tick.
    ///
    /// Order within a tick: guard expiry, pending lookup, delayed follow pass,
    /// debounced requests, animation frames. Returns [`has_pending_work`](Self::has_pending_work).
    pub fn tick(&mut self) -> bool {
        self.frame = self.frame.wrapping_add(1);
        self.tree.begin_frame(self.frame);
        let now = self.now_ms();

        if self
            .pending
            .as_ref()
            .is_some_and(PendingNavigation::holds_guard)
        {
            self.guard.extend(now);
        }
        if self.guard.expire(now) {
            debug!(at = now, "navigation guard expired");
            self.emit_event(ViewportEvent::GuardCleared { at: now });
        }

        self.poll_pending(now);
        self.run_follow_pass(now);
        self.fire_debounced(now);
        self.step_animations(now);

        self.has_pending_work()
    }

    /// Ends the current explicit navigation early (e.g. minimap drag released).
    pub fn complete_navigation(&mut self) -> bool {
        if !self.guard.complete() {
            return false;
        }
        let now = self.now_ms();
        debug!(at = now, "navigation guard completed");
        self.emit_event(ViewportEvent::GuardCleared { at: now });
        true
    }

    pub(super) fn set_period(&mut self, period: PeriodKey) -> bool {
        if self.period == Some(period) {
            return false;
        }
        self.period = Some(period);
        self.emit_event(ViewportEvent::PeriodChanged { period });
        true
    }
}
