use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::NaiveDate;
use tracing::warn;

use crate::layout::LayoutTree;

use super::{NavigationOutcome, ViewportEngine};

/// Engine shared between the host view and the handles it hands out.
pub type SharedViewportEngine<T> = Rc<RefCell<ViewportEngine<T>>>;

impl<T: LayoutTree> ViewportEngine<T> {
    #[must_use]
    pub fn into_shared(self) -> SharedViewportEngine<T> {
        Rc::new(RefCell::new(self))
    }
}

/// Navigation handle given to sibling components (minimap, toolbar, detail panel).
///
/// Holds a weak reference: once the timeline view drops its engine every call
/// returns `None` instead of keeping the torn-down view alive.
pub struct ScrollHandle<T: LayoutTree> {
    engine: Weak<RefCell<ViewportEngine<T>>>,
}

impl<T: LayoutTree> Clone for ScrollHandle<T> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<T: LayoutTree> ScrollHandle<T> {
    #[must_use]
    pub fn new(engine: &SharedViewportEngine<T>) -> Self {
        Self {
            engine: Rc::downgrade(engine),
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.engine.strong_count() > 0
    }

    pub fn scroll_to_date(&self, date: NaiveDate, force_scroll: bool) -> Option<NavigationOutcome> {
        self.with_engine("scroll_to_date", |engine| {
            engine.scroll_to_date(date, force_scroll)
        })
    }

    pub fn scroll_to_column(&self, date: NaiveDate, column_key: &str) -> Option<NavigationOutcome> {
        self.with_engine("scroll_to_column", |engine| {
            engine.scroll_to_column(date, column_key)
        })
    }

    pub fn scroll_to_keep_visible(&self, selection_id: &str) -> Option<NavigationOutcome> {
        self.with_engine("scroll_to_keep_visible", |engine| {
            engine.scroll_to_keep_visible(selection_id)
        })
    }

    pub fn step_period(&self, steps: i32) -> Option<NavigationOutcome> {
        self.with_engine("step_period", |engine| engine.step_period(steps))
    }

    fn with_engine(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut ViewportEngine<T>) -> NavigationOutcome,
    ) -> Option<NavigationOutcome> {
        let engine = self.engine.upgrade()?;
        let Ok(mut engine) = engine.try_borrow_mut() else {
            warn!(operation, "viewport engine is busy; navigation ignored");
            return None;
        };
        Some(f(&mut engine))
    }
}
