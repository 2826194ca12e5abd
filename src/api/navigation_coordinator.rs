use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{
    Axis, AxisId, Millis, PeriodKey, TargetDescriptor, compute_delta, leading_alignment_delta,
};
use crate::error::{ViewportError, ViewportResult};
use crate::extensions::ViewportEvent;
use crate::interaction::NavigationGesture;
use crate::layout::{LayoutTree, NodeQuery};

use super::{
    AxisController, CorrectionMotion, CorrectionPlan, Locate, NavigationOutcome, PendingLocate,
    ReadinessWait, ResolvedTarget, SkipReason, TargetResolver, ViewportEngine, WaitStatus,
};

/// Document as the shell knows it: stable id plus calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub date: NaiveDate,
}

impl DocumentRef {
    #[must_use]
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
        }
    }
}

/// Result of [`ViewportEngine::select_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSelection {
    pub period: PeriodKey,
    pub period_changed: bool,
    pub selection_changed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum PendingAction {
    ScrollToDate {
        date: NaiveDate,
        key: PeriodKey,
        force: bool,
    },
    ScrollToColumn {
        key: PeriodKey,
    },
    KeepVisible {
        id: String,
        motion: CorrectionMotion,
        passive: bool,
    },
    /// Vertical half of a date navigation whose first card was not measured yet.
    FirstItemOfDay,
}

/// The single in-flight lookup and what to do once it resolves.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct PendingNavigation {
    pub(super) locate: PendingLocate,
    pub(super) action: PendingAction,
}

impl PendingNavigation {
    /// Explicit navigations keep the guard alive while they wait.
    pub(super) fn holds_guard(&self) -> bool {
        !matches!(self.action, PendingAction::KeepVisible { passive: true, .. })
    }

    pub(super) fn describe(&self) -> String {
        match &self.locate.query {
            NodeQuery::Document(id) => format!("document `{id}`"),
            NodeQuery::Column(key) => format!("column `{key}`"),
            NodeQuery::FirstItemOn { column, date } => {
                format!("first item on {date} in `{column}`")
            }
        }
    }
}

impl<T: LayoutTree> ViewportEngine<T> {
    /// Selects a document and moves the period context to its date.
    ///
    /// Selection alone issues no scroll command: the guard is armed, so the
    /// passive follow reaction stays quiet until the shell navigates.
    pub fn select_document(&mut self, document: &DocumentRef) -> DocumentSelection {
        self.arm_guard(NavigationGesture::SelectDocument);
        let period = PeriodKey::for_date(document.date, self.granularity);
        let period_changed = self.set_period(period);
        let selection_changed = self.selection.as_deref() != Some(document.id.as_str());
        if selection_changed {
            self.selection = Some(document.id.clone());
            let outcome = self.react_to_selection_change();
            trace!(id = %document.id, ?outcome, "selection follow after select_document");
        }
        DocumentSelection {
            period,
            period_changed,
            selection_changed,
        }
    }

    /// Brings the column of `date` into the horizontal usable window and, for
    /// month/day views, the first document of that day into its column. A card
    /// that is rendered but not measured yet is waited for like any lookup.
    ///
    /// `force_scroll` aligns the column at the leading edge even when it is
    /// already visible.
    pub fn scroll_to_date(&mut self, date: NaiveDate, force_scroll: bool) -> NavigationOutcome {
        self.navigate_to_date(date, force_scroll, NavigationGesture::ScrollToDate)
    }

    fn navigate_to_date(
        &mut self,
        date: NaiveDate,
        force_scroll: bool,
        gesture: NavigationGesture,
    ) -> NavigationOutcome {
        self.arm_guard(gesture);
        let key = PeriodKey::for_date(date, self.granularity);
        self.set_period(key);
        self.begin_locate(
            NodeQuery::Column(key),
            PendingAction::ScrollToDate {
                date,
                key,
                force: force_scroll,
            },
        )
    }

    /// Minimap navigation to the column named `column_key` (`2021`, `2021-06`, `2021-06-15`).
    ///
    /// Keys that do not parse fall back to the column containing `date`.
    pub fn scroll_to_column(&mut self, date: NaiveDate, column_key: &str) -> NavigationOutcome {
        self.arm_guard(NavigationGesture::ScrollToColumn);
        let key = match column_key.parse::<PeriodKey>() {
            Ok(key) => key,
            Err(err) => {
                debug!(column_key, error = %err, "falling back to date column");
                PeriodKey::for_date(date, self.granularity)
            }
        };
        if key.granularity() == self.granularity {
            self.set_period(key);
        }
        self.begin_locate(NodeQuery::Column(key), PendingAction::ScrollToColumn { key })
    }

    /// Atomic two-axis correction keeping document `selection_id` visible,
    /// waiting for it to render if needed.
    pub fn scroll_to_keep_visible(&mut self, selection_id: &str) -> NavigationOutcome {
        self.arm_guard(NavigationGesture::KeepVisible);
        self.follow_pass = None;
        self.begin_locate(
            NodeQuery::Document(selection_id.to_owned()),
            PendingAction::KeepVisible {
                id: selection_id.to_owned(),
                motion: CorrectionMotion::Animated,
                passive: false,
            },
        )
    }

    /// Prev/next navigation: moves the period context by `steps` and aligns its column.
    pub fn step_period(&mut self, steps: i32) -> NavigationOutcome {
        let Some(date) = self
            .period
            .and_then(|period| period.step(steps))
            .and_then(|period| period.first_date())
        else {
            return NavigationOutcome::Skipped(SkipReason::NoPeriod);
        };
        self.navigate_to_date(date, true, NavigationGesture::StepPeriod)
    }

    /// One-shot lookup against the current tree, returning a pollable wait when absent.
    #[must_use]
    pub fn locate(&self, descriptor: &TargetDescriptor) -> Locate {
        TargetResolver::locate(
            &self.tree,
            descriptor,
            self.now_ms(),
            self.config.locate_timeout_ms,
        )
    }

    #[must_use]
    pub fn has_pending_locate(&self) -> bool {
        self.pending.is_some()
    }

    pub(super) fn arm_guard(&mut self, gesture: NavigationGesture) {
        let now = self.now_ms();
        self.guard.arm(gesture, now);
        let expires_at = self.guard.state().expires_at;
        trace!(?gesture, expires_at, "navigation guard armed");
        self.emit_event(ViewportEvent::GuardArmed {
            gesture,
            expires_at,
        });
    }

    /// Runs `action` now when the node exists, otherwise parks it as the
    /// single in-flight lookup (superseding any older one).
    pub(super) fn begin_locate(
        &mut self,
        query: NodeQuery,
        action: PendingAction,
    ) -> NavigationOutcome {
        if let Some(previous) = self.pending.take() {
            debug!(lookup = %previous.describe(), "pending navigation superseded");
        }
        let now = self.now_ms();
        let timeout_ms = self.config.locate_timeout_ms;
        match TargetResolver::locate_query(&self.tree, query, now, timeout_ms) {
            Locate::Found(target) => self.resume(action, target),
            Locate::Waiting(locate) => {
                let pending = PendingNavigation { locate, action };
                trace!(
                    lookup = %pending.describe(),
                    deadline = pending.locate.wait.deadline(),
                    "waiting for target"
                );
                self.pending = Some(pending);
                NavigationOutcome::Pending
            }
            Locate::Unresolvable => NavigationOutcome::Skipped(SkipReason::TargetNotFound),
        }
    }

    pub(super) fn poll_pending(&mut self, now: Millis) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        match pending.locate.poll(&self.tree, now) {
            WaitStatus::Ready(target) => {
                let outcome = self.resume(pending.action, target);
                trace!(?outcome, "pending navigation resolved");
            }
            WaitStatus::Pending => self.pending = Some(pending),
            WaitStatus::TimedOut => {
                let target = pending.describe();
                let err = ViewportError::TargetNotFound(target.clone());
                debug!(
                    error = %err,
                    deadline = pending.locate.wait.deadline(),
                    "navigation abandoned"
                );
                self.emit_event(ViewportEvent::TargetNotFound { target });
            }
        }
    }

    fn resume(&mut self, action: PendingAction, target: ResolvedTarget) -> NavigationOutcome {
        match action {
            PendingAction::ScrollToDate { date, key, force } => {
                self.execute_scroll_to_date(target, key, date, force)
            }
            PendingAction::ScrollToColumn { .. } => self.execute_scroll_to_column(target),
            PendingAction::FirstItemOfDay => {
                let mut plan = CorrectionPlan::default();
                self.plan_first_item(&mut plan, target);
                self.execute_plan(plan)
            }
            PendingAction::KeepVisible {
                id,
                motion,
                passive,
            } => {
                let outcome = self.execute_keep_visible(target, motion);
                if passive {
                    self.schedule_follow_pass(id);
                }
                outcome
            }
        }
    }

    pub(super) fn execute_keep_visible(
        &mut self,
        target: ResolvedTarget,
        motion: CorrectionMotion,
    ) -> NavigationOutcome {
        match self.plan_keep_visible(target, motion) {
            Ok(plan) => self.execute_plan(plan),
            Err(err) => self.skip_with(&err),
        }
    }

    /// Both axis deltas are computed from the same layout snapshot before
    /// either axis moves.
    fn plan_keep_visible(
        &self,
        target: ResolvedTarget,
        motion: CorrectionMotion,
    ) -> ViewportResult<CorrectionPlan> {
        let margin = self.config.edge_margin_px;
        let mut plan = CorrectionPlan::default();

        let horizontal = self.horizontal_controller()?;
        let occlusion = self.occlusion.current_occlusion();
        let delta = horizontal.compute_delta(target.bounds, occlusion, margin);
        plan.push(horizontal.correction(delta, motion));

        if let Some(container) = self.tree.scroll_ancestor(target.node, Axis::Vertical) {
            let vertical = AxisController::attach(&self.tree, AxisId::vertical(container))?;
            let delta = vertical.compute_delta(target.bounds, 0.0, margin);
            plan.push(vertical.correction(delta, motion));
        }
        Ok(plan)
    }

    fn execute_scroll_to_date(
        &mut self,
        column: ResolvedTarget,
        key: PeriodKey,
        date: NaiveDate,
        force: bool,
    ) -> NavigationOutcome {
        let horizontal = match self.horizontal_controller() {
            Ok(controller) => controller,
            Err(err) => return self.skip_with(&err),
        };
        let margin = self.config.edge_margin_px;
        let window = horizontal.usable_window(self.occlusion.current_occlusion(), margin);
        let span = column.bounds.span(Axis::Horizontal);

        let mut plan = CorrectionPlan::default();
        if force || !window.contains(span) {
            let delta = if force {
                leading_alignment_delta(span, window, 0.0)
            } else {
                compute_delta(span, window)
            };
            plan.push(horizontal.correction(delta, CorrectionMotion::Debounced));
        } else {
            self.debouncer.cancel(horizontal.id());
        }

        let mut unmeasured = None;
        if self.granularity.has_item_rows() {
            let query = NodeQuery::FirstItemOn { column: key, date };
            match TargetResolver::lookup(&self.tree, &query) {
                Some(item) => self.plan_first_item(&mut plan, item),
                None if self.tree.find_node(&query).is_some() => unmeasured = Some(query),
                None => {}
            }
        }
        let outcome = self.execute_plan(plan);

        let Some(query) = unmeasured else {
            return outcome;
        };
        let pending = PendingNavigation {
            locate: PendingLocate {
                query,
                wait: ReadinessWait::new(self.now_ms(), self.config.locate_timeout_ms),
            },
            action: PendingAction::FirstItemOfDay,
        };
        trace!(lookup = %pending.describe(), "waiting for first card of the day");
        self.pending = Some(pending);
        match outcome {
            NavigationOutcome::AlreadyVisible => NavigationOutcome::Pending,
            other => other,
        }
    }

    /// Debounced vertical correction bringing the day's first card into its column.
    fn plan_first_item(&self, plan: &mut CorrectionPlan, item: ResolvedTarget) {
        let margin = self.config.edge_margin_px;
        match self.vertical_controller_for(item) {
            Ok(Some(vertical)) if !vertical.is_visible(item.bounds, 0.0, margin) => {
                let delta = vertical.compute_delta(item.bounds, 0.0, margin);
                plan.push(vertical.correction(delta, CorrectionMotion::Debounced));
            }
            Ok(_) => {}
            Err(err) => debug!(error = %err, "skipping vertical part of scroll_to_date"),
        }
    }

    fn execute_scroll_to_column(&mut self, column: ResolvedTarget) -> NavigationOutcome {
        let horizontal = match self.horizontal_controller() {
            Ok(controller) => controller,
            Err(err) => return self.skip_with(&err),
        };
        let window = horizontal.usable_window(
            self.occlusion.current_occlusion(),
            self.config.edge_margin_px,
        );
        let span = column.bounds.span(Axis::Horizontal);
        if window.contains(span) {
            self.debouncer.cancel(horizontal.id());
            return NavigationOutcome::AlreadyVisible;
        }

        // Off to the right: land near the leading edge so upcoming columns show.
        let delta = if span.trailing > window.trailing_edge {
            leading_alignment_delta(span, window, self.config.column_lead_in_px)
        } else {
            compute_delta(span, window)
        };
        let mut plan = CorrectionPlan::default();
        plan.push(horizontal.correction(delta, CorrectionMotion::Debounced));
        self.execute_plan(plan)
    }

    fn horizontal_controller(&self) -> ViewportResult<AxisController> {
        let container = self
            .tree
            .horizontal_container()
            .ok_or_else(|| ViewportError::ContainerNotFound("horizontal".to_owned()))?;
        AxisController::attach(&self.tree, AxisId::horizontal(container))
    }

    fn vertical_controller_for(
        &self,
        target: ResolvedTarget,
    ) -> ViewportResult<Option<AxisController>> {
        self.tree
            .scroll_ancestor(target.node, Axis::Vertical)
            .map(|container| AxisController::attach(&self.tree, AxisId::vertical(container)))
            .transpose()
    }

    fn skip_with(&mut self, err: &ViewportError) -> NavigationOutcome {
        debug!(error = %err, "navigation skipped");
        if let ViewportError::ContainerNotFound(container) = err {
            self.emit_event(ViewportEvent::ContainerNotFound {
                container: container.clone(),
            });
        }
        NavigationOutcome::from_error(err)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{PendingAction, PendingNavigation};
    use crate::api::{CorrectionMotion, PendingLocate, ReadinessWait};
    use crate::core::PeriodKey;
    use crate::layout::NodeQuery;

    fn pending(action: PendingAction) -> PendingNavigation {
        PendingNavigation {
            locate: PendingLocate {
                query: NodeQuery::Document("doc-1".to_owned()),
                wait: ReadinessWait::new(0, 2_000),
            },
            action,
        }
    }

    #[test]
    fn only_explicit_lookups_hold_the_guard() {
        let passive = pending(PendingAction::KeepVisible {
            id: "doc-1".to_owned(),
            motion: CorrectionMotion::Immediate,
            passive: true,
        });
        assert!(!passive.holds_guard());

        let date = NaiveDate::from_ymd_opt(2021, 6, 15).expect("date");
        let explicit = pending(PendingAction::ScrollToDate {
            date,
            key: PeriodKey::year(2021),
            force: false,
        });
        assert!(explicit.holds_guard());
        assert_eq!(explicit.describe(), "document `doc-1`");
        assert!(pending(PendingAction::FirstItemOfDay).holds_guard());
    }
}
