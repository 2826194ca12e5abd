mod common;

use approx::assert_relative_eq;
use common::{Harness, column_axis, date, doc_id, horizontal_axis, month_key};
use timeline_viewport::api::{DocumentRef, NavigationOutcome, SkipReason};
use timeline_viewport::extensions::ViewportEvent;
use timeline_viewport::interaction::NavigationGesture;

#[test]
fn selecting_june_document_scrolls_both_axes_under_guard() {
    let mut harness = Harness::standard();
    let march = harness
        .engine
        .select_document(&DocumentRef::new(doc_id(3, 1), date(2021, 3, 1)));
    assert_eq!(march.period, month_key(3));
    harness.settle();
    assert_eq!(harness.engine.period(), Some(month_key(3)));
    assert!(harness.scroll_issues().is_empty());
    harness.clear_events();

    let selection = harness
        .engine
        .select_document(&DocumentRef::new(doc_id(6, 15), date(2021, 6, 15)));
    assert!(selection.period_changed);
    assert!(selection.selection_changed);
    let outcome = harness.engine.scroll_to_date(date(2021, 6, 15), false);
    assert_eq!(outcome, NavigationOutcome::Scheduled { axes: 2 });
    assert!(harness.engine.is_guard_active());

    harness.settle();

    let issues = harness.scroll_issues();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].0, issues[1].0, "both axes start in one frame");
    let horizontal = issues
        .iter()
        .find(|issue| issue.1 == horizontal_axis())
        .expect("horizontal issue");
    let vertical = issues
        .iter()
        .find(|issue| issue.1 == column_axis(6))
        .expect("june column issue");
    assert_relative_eq!(horizontal.3, 612.0);
    assert_relative_eq!(vertical.3, 552.0);

    let recorded = harness.recorded();
    let last_issue = recorded
        .iter()
        .rposition(|entry| matches!(entry.event, ViewportEvent::ScrollIssued { .. }))
        .expect("issued");
    assert!(
        recorded
            .iter()
            .filter(|entry| matches!(entry.event, ViewportEvent::ScrollIssued { .. }))
            .all(|entry| entry.context.guard_active)
    );
    assert!(
        recorded[last_issue..]
            .iter()
            .any(|entry| matches!(entry.event, ViewportEvent::GuardCleared { .. }))
    );
    assert!(!harness.engine.is_guard_active());

    assert_relative_eq!(harness.offset(&horizontal_axis()), 612.0);
    assert_relative_eq!(harness.offset(&column_axis(6)), 552.0);
    let bounds = harness.node_bounds_of(&doc_id(6, 15));
    assert!(bounds.left() >= 12.0 && bounds.right() <= 588.0);
    assert!(bounds.top() >= 52.0 && bounds.bottom() <= 388.0);
    assert_eq!(harness.engine.period(), Some(month_key(6)));
}

#[test]
fn select_document_alone_issues_no_scroll() {
    let mut harness = Harness::standard();
    harness
        .engine
        .select_document(&DocumentRef::new(doc_id(11, 20), date(2021, 11, 20)));
    harness.settle();

    assert!(harness.scroll_issues().is_empty());
    assert!(harness.engine.tree().writes().is_empty());
    let armed = harness
        .recorded()
        .into_iter()
        .find_map(|entry| match entry.event {
            ViewportEvent::GuardArmed { gesture, .. } => Some(gesture),
            _ => None,
        });
    assert_eq!(armed, Some(NavigationGesture::SelectDocument));
}

#[test]
fn keep_visible_moves_both_axes_in_the_same_frame() {
    let mut harness = Harness::standard();
    let outcome = harness.engine.scroll_to_keep_visible(&doc_id(9, 18));
    assert_eq!(outcome, NavigationOutcome::Issued { commands: 2 });

    let issues = harness.scroll_issues();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].0, issues[1].0);

    harness.settle();
    let writes = harness.engine.tree().writes();
    let first_frame = |key: &str| {
        writes
            .iter()
            .find(|write| write.container.as_str() == key)
            .map(|write| write.frame)
            .expect("axis written")
    };
    let last_frame = |key: &str| {
        writes
            .iter()
            .rev()
            .find(|write| write.container.as_str() == key)
            .map(|write| write.frame)
            .expect("axis written")
    };
    assert_eq!(first_frame("timeline"), first_frame("2021-09"));
    assert_eq!(last_frame("timeline"), last_frame("2021-09"));

    assert_relative_eq!(harness.offset(&horizontal_axis()), 1212.0);
    assert_relative_eq!(harness.offset(&column_axis(9)), 732.0);
}

#[test]
fn repeated_keep_visible_is_idempotent() {
    let mut harness = Harness::standard();
    harness.engine.scroll_to_keep_visible(&doc_id(7, 12));
    harness.settle();
    let writes_after_first = harness.engine.tree().writes().len();
    harness.clear_events();

    let outcome = harness.engine.scroll_to_keep_visible(&doc_id(7, 12));
    harness.settle();

    assert_eq!(outcome, NavigationOutcome::AlreadyVisible);
    assert!(harness.scroll_issues().is_empty());
    assert_eq!(harness.engine.tree().writes().len(), writes_after_first);
}

#[test]
fn visible_target_needs_no_command() {
    let mut harness = Harness::standard();
    let outcome = harness.engine.scroll_to_keep_visible(&doc_id(2, 2));
    assert_eq!(outcome, NavigationOutcome::AlreadyVisible);
    harness.settle();
    assert!(harness.engine.tree().writes().is_empty());
}

#[test]
fn step_period_aligns_neighbouring_columns() {
    let mut harness = Harness::standard();
    assert_eq!(
        harness.engine.step_period(1),
        NavigationOutcome::Skipped(SkipReason::NoPeriod)
    );

    harness
        .engine
        .select_document(&DocumentRef::new(doc_id(3, 4), date(2021, 3, 4)));
    let outcome = harness.engine.step_period(1);
    assert_eq!(outcome, NavigationOutcome::Scheduled { axes: 1 });
    assert_eq!(harness.engine.period(), Some(month_key(4)));
    harness.settle();
    assert_relative_eq!(harness.offset(&horizontal_axis()), 588.0);

    harness.engine.step_period(-2);
    harness.settle();
    assert_eq!(harness.engine.period(), Some(month_key(2)));
    assert_relative_eq!(harness.offset(&horizontal_axis()), 188.0);
}

#[test]
fn complete_navigation_clears_guard_early() {
    let mut harness = Harness::standard();
    harness.engine.scroll_to_column(date(2021, 2, 1), "2021-02");
    assert!(harness.engine.is_guard_active());

    assert!(harness.engine.complete_navigation());
    assert!(!harness.engine.is_guard_active());
    assert!(!harness.engine.complete_navigation());
}

#[test]
fn scroll_to_date_waits_for_an_unmeasured_first_card() {
    let mut harness = Harness::standard();
    assert!(harness.engine.tree_mut().set_item_laid_out(&doc_id(6, 15), false));

    let outcome = harness.engine.scroll_to_date(date(2021, 6, 15), false);
    assert_eq!(outcome, NavigationOutcome::Scheduled { axes: 1 });
    assert!(harness.engine.has_pending_locate());

    harness.frames(3);
    assert!(harness.engine.has_pending_locate());
    assert!(harness.engine.is_guard_active());

    assert!(harness.engine.tree_mut().set_item_laid_out(&doc_id(6, 15), true));
    harness.settle();

    assert!(!harness.engine.has_pending_locate());
    assert_relative_eq!(harness.offset(&horizontal_axis()), 612.0);
    assert_relative_eq!(harness.offset(&column_axis(6)), 552.0);
    let bounds = harness.node_bounds_of(&doc_id(6, 15));
    assert!(bounds.top() >= 52.0 && bounds.bottom() <= 388.0);
}
