mod memory_tree;

pub use memory_tree::{MemoryLayoutTree, ScrollWrite};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{Axis, ContainerKey, ContainerMetrics, FrameId, PeriodKey, Rect};
use crate::error::ViewportResult;

/// Opaque handle of a rendered node.
///
/// Handles are only meaningful until the host rebuilds the view; the engine
/// never stores them across ticks and re-queries by stable identifier instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Stable-identifier lookup understood by the host tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeQuery {
    /// Document card carrying this id.
    Document(String),
    /// Period column carrying this key.
    Column(PeriodKey),
    /// First document card dated `date` inside `column`.
    FirstItemOn { column: PeriodKey, date: NaiveDate },
}

/// Floating panel that may cover the right edge of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayPanel {
    pub id: String,
    pub visible: bool,
    pub bounds: Rect,
}

impl OverlayPanel {
    #[must_use]
    pub fn new(id: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            visible: true,
            bounds,
        }
    }
}

/// Contract implemented by the host's rendered widget tree.
///
/// All geometry is reported in client (viewport) coordinates, the way a
/// browser reports bounding boxes. `set_scroll_offset` is the only mutation
/// the engine ever performs.
pub trait LayoutTree {
    fn find_node(&self, query: &NodeQuery) -> Option<NodeId>;

    fn node_bounds(&self, node: NodeId) -> Option<Rect>;

    /// Nearest ancestor of `node` that scrolls along `axis`.
    fn scroll_ancestor(&self, node: NodeId, axis: Axis) -> Option<ContainerKey>;

    /// The well-known horizontal container of the mounted view, if any.
    fn horizontal_container(&self) -> Option<ContainerKey>;

    fn container_metrics(&self, container: &ContainerKey, axis: Axis) -> Option<ContainerMetrics>;

    fn set_scroll_offset(
        &mut self,
        container: &ContainerKey,
        axis: Axis,
        offset: f64,
    ) -> ViewportResult<()>;

    fn overlay_panels(&self) -> Vec<OverlayPanel>;

    /// Called once at the start of every engine tick.
    fn begin_frame(&mut self, _frame: FrameId) {}
}
