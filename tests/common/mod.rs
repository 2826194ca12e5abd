#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use timeline_viewport::api::{ViewportEngine, ViewportEngineConfig};
use timeline_viewport::core::{Axis, AxisId, ContainerKey, PeriodKey, Rect};
use timeline_viewport::extensions::{ViewportContext, ViewportEvent, ViewportPlugin};
use timeline_viewport::interaction::ManualClock;
use timeline_viewport::layout::MemoryLayoutTree;

pub const FRAME_MS: u64 = 16;
pub const TIMELINE: &str = "timeline";
pub const ITEM_HEIGHT: f64 = 60.0;
pub const DAYS_PER_COLUMN: u32 = 20;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub event: ViewportEvent,
    pub context: ViewportContext,
}

#[derive(Clone)]
pub struct RecordingPlugin {
    id: String,
    events: Rc<RefCell<Vec<Recorded>>>,
}

impl RecordingPlugin {
    pub fn new(id: impl Into<String>, events: Rc<RefCell<Vec<Recorded>>>) -> Self {
        Self {
            id: id.into(),
            events,
        }
    }
}

impl ViewportPlugin for RecordingPlugin {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: &ViewportEvent, context: ViewportContext) {
        self.events.borrow_mut().push(Recorded {
            event: event.clone(),
            context,
        });
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn month_key(month: u32) -> PeriodKey {
    PeriodKey::month(2021, month).expect("valid month")
}

pub fn doc_id(month: u32, day: u32) -> String {
    format!("m{month:02}-d{day:02}")
}

pub fn horizontal_axis() -> AxisId {
    AxisId::horizontal(TIMELINE)
}

pub fn column_axis(month: u32) -> AxisId {
    AxisId::vertical(month_key(month).to_string())
}

/// Twelve month columns of 2021, each listing one card per day for the first
/// [`DAYS_PER_COLUMN`] days. Cards sit below a 40 px column header.
pub fn month_tree(width: f64, height: f64, column_width: f64) -> MemoryLayoutTree {
    let mut tree = MemoryLayoutTree::new(
        ContainerKey::new(TIMELINE),
        Rect::new(0.0, 0.0, width, height),
    )
    .with_header_height(40.0);
    for month in 1..=12 {
        tree.push_column(month_key(month), column_width);
        for day in 1..=DAYS_PER_COLUMN {
            tree.push_item(month_key(month), doc_id(month, day), date(2021, month, day), ITEM_HEIGHT)
                .expect("push item");
        }
    }
    tree
}

pub struct Harness {
    pub engine: ViewportEngine<MemoryLayoutTree>,
    pub clock: ManualClock,
    pub events: Rc<RefCell<Vec<Recorded>>>,
}

impl Harness {
    pub fn new(tree: MemoryLayoutTree, config: ViewportEngineConfig) -> Self {
        let clock = ManualClock::new(0);
        let mut engine =
            ViewportEngine::with_clock(tree, clock.clone(), config).expect("engine init");
        let events = Rc::new(RefCell::new(Vec::new()));
        engine
            .register_plugin(Box::new(RecordingPlugin::new("recorder", events.clone())))
            .expect("register recorder");
        Self {
            engine,
            clock,
            events,
        }
    }

    pub fn standard() -> Self {
        Self::new(month_tree(600.0, 400.0, 200.0), ViewportEngineConfig::default())
    }

    /// Advances one display refresh and ticks the engine.
    pub fn frame(&mut self) -> bool {
        self.clock.advance(FRAME_MS);
        self.engine.tick()
    }

    pub fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    /// Ticks until nothing is scheduled, bounded to ten simulated seconds.
    pub fn settle(&mut self) {
        for _ in 0..625 {
            if !self.frame() {
                return;
            }
        }
        panic!("engine did not settle");
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn scroll_issues(&self) -> Vec<(u64, AxisId, f64, f64)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|entry| match &entry.event {
                ViewportEvent::ScrollIssued {
                    frame, axis, from, to, ..
                } => Some((*frame, axis.clone(), *from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn offset(&self, axis: &AxisId) -> f64 {
        self.engine
            .tree()
            .offset(&axis.container, axis.axis)
            .expect("container mounted")
    }

    pub fn node_bounds_of(&self, id: &str) -> Rect {
        use timeline_viewport::layout::{LayoutTree, NodeQuery};
        let tree = self.engine.tree();
        let node = tree
            .find_node(&NodeQuery::Document(id.to_owned()))
            .expect("document rendered");
        tree.node_bounds(node).expect("bounds")
    }
}

pub fn is_horizontal(axis: &AxisId) -> bool {
    axis.axis == Axis::Horizontal
}
