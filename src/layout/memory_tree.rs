use chrono::NaiveDate;

use crate::core::{Axis, ContainerKey, ContainerMetrics, FrameId, PeriodKey, Rect, ScrollContainer};
use crate::error::{ViewportError, ViewportResult};

use super::{LayoutTree, NodeId, NodeQuery, OverlayPanel};

const COLUMN_NODE_SLOT: u64 = u32::MAX as u64;

/// Offset write observed by [`MemoryLayoutTree`], stamped with the frame it landed in.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollWrite {
    pub frame: FrameId,
    pub container: ContainerKey,
    pub axis: Axis,
    pub offset: f64,
}

#[derive(Debug, Clone)]
struct MemoryItem {
    id: String,
    date: NaiveDate,
    y: f64,
    height: f64,
    laid_out: bool,
}

#[derive(Debug, Clone)]
struct MemoryColumn {
    key: PeriodKey,
    container: ContainerKey,
    x: f64,
    width: f64,
    offset_y: f64,
    items: Vec<MemoryItem>,
}

impl MemoryColumn {
    fn content_height(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.y + item.height)
            .fold(0.0, f64::max)
    }
}

/// Headless timeline layout: one horizontal strip of period columns, each
/// column holding a vertically scrollable list of document cards.
///
/// Used by tests, benches and hosts that want a reference model of the
/// geometry the engine expects. Every offset write is journaled.
#[derive(Debug, Clone)]
pub struct MemoryLayoutTree {
    horizontal_key: ContainerKey,
    bounds: Rect,
    header_height: f64,
    column_gap: f64,
    item_gap: f64,
    mounted: bool,
    offset_x: f64,
    columns: Vec<MemoryColumn>,
    panels: Vec<OverlayPanel>,
    frame: FrameId,
    writes: Vec<ScrollWrite>,
}

impl MemoryLayoutTree {
    #[must_use]
    pub fn new(horizontal_key: impl Into<ContainerKey>, bounds: Rect) -> Self {
        Self {
            horizontal_key: horizontal_key.into(),
            bounds,
            header_height: 0.0,
            column_gap: 0.0,
            item_gap: 0.0,
            mounted: true,
            offset_x: 0.0,
            columns: Vec::new(),
            panels: Vec::new(),
            frame: 0,
            writes: Vec::new(),
        }
    }

    /// Height of the column header above each vertical list.
    #[must_use]
    pub fn with_header_height(mut self, header_height: f64) -> Self {
        self.header_height = header_height.max(0.0);
        self
    }

    #[must_use]
    pub fn with_gaps(mut self, column_gap: f64, item_gap: f64) -> Self {
        self.column_gap = column_gap.max(0.0);
        self.item_gap = item_gap.max(0.0);
        self
    }

    /// Appends a column after the existing ones.
    pub fn push_column(&mut self, key: PeriodKey, width: f64) {
        let x = self
            .columns
            .last()
            .map_or(0.0, |last| last.x + last.width + self.column_gap);
        self.columns.push(MemoryColumn {
            key,
            container: ContainerKey::new(key.to_string()),
            x,
            width: width.max(0.0),
            offset_y: 0.0,
            items: Vec::new(),
        });
    }

    /// Appends a document card to `column`.
    pub fn push_item(
        &mut self,
        column: PeriodKey,
        id: impl Into<String>,
        date: NaiveDate,
        height: f64,
    ) -> ViewportResult<()> {
        let item_gap = self.item_gap;
        let column = self
            .columns
            .iter_mut()
            .find(|entry| entry.key == column)
            .ok_or_else(|| ViewportError::InvalidData(format!("unknown column `{column}`")))?;
        let y = column
            .items
            .last()
            .map_or(0.0, |last| last.y + last.height + item_gap);
        column.items.push(MemoryItem {
            id: id.into(),
            date,
            y,
            height: height.max(0.0),
            laid_out: true,
        });
        Ok(())
    }

    /// Marks a card as mounted but not yet measured (zero-size bounds).
    pub fn set_item_laid_out(&mut self, id: &str, laid_out: bool) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.laid_out = laid_out;
                true
            }
            None => false,
        }
    }

    /// Drops every column, as a granularity switch tears the view down.
    pub fn clear_columns(&mut self) {
        self.columns.clear();
        self.offset_x = 0.0;
    }

    /// Simulates the horizontal marker being absent (view not mounted yet).
    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.offset_x = self.offset_x.clamp(0.0, self.max_offset_x());
    }

    pub fn add_panel(&mut self, panel: OverlayPanel) {
        self.panels.retain(|entry| entry.id != panel.id);
        self.panels.push(panel);
    }

    pub fn set_panel_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.panels.iter_mut().find(|entry| entry.id == id) {
            Some(panel) => {
                panel.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn set_panel_bounds(&mut self, id: &str, bounds: Rect) -> bool {
        match self.panels.iter_mut().find(|entry| entry.id == id) {
            Some(panel) => {
                panel.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Host-side scroll (e.g. the user dragging a scrollbar).
    pub fn scroll_by_user(&mut self, container: &ContainerKey, axis: Axis, offset: f64) -> bool {
        self.apply_offset(container, axis, offset).is_ok()
    }

    #[must_use]
    pub fn offset(&self, container: &ContainerKey, axis: Axis) -> Option<f64> {
        self.container_metrics(container, axis)
            .map(|metrics| metrics.scroll.offset)
    }

    #[must_use]
    pub fn horizontal_offset(&self) -> f64 {
        self.offset_x
    }

    #[must_use]
    pub fn writes(&self) -> &[ScrollWrite] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    #[must_use]
    pub fn current_frame(&self) -> FrameId {
        self.frame
    }

    fn item_mut(&mut self, id: &str) -> Option<&mut MemoryItem> {
        self.columns
            .iter_mut()
            .flat_map(|column| column.items.iter_mut())
            .find(|item| item.id == id)
    }

    fn content_width(&self) -> f64 {
        self.columns
            .iter()
            .map(|column| column.x + column.width)
            .fold(0.0, f64::max)
    }

    fn max_offset_x(&self) -> f64 {
        (self.content_width() - self.bounds.width).max(0.0)
    }

    fn list_viewport_height(&self) -> f64 {
        (self.bounds.height - self.header_height).max(0.0)
    }

    fn column_client_x(&self, column: &MemoryColumn) -> f64 {
        self.bounds.x + column.x - self.offset_x
    }

    fn list_bounds(&self, column: &MemoryColumn) -> Rect {
        Rect::new(
            self.column_client_x(column),
            self.bounds.y + self.header_height,
            column.width,
            self.list_viewport_height(),
        )
    }

    fn column_index(&self, container: &ContainerKey) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| &column.container == container)
    }

    fn decode(&self, node: NodeId) -> Option<(usize, Option<usize>)> {
        let column = usize::try_from(node.0 >> 32).ok()?;
        let slot = node.0 & COLUMN_NODE_SLOT;
        if column >= self.columns.len() {
            return None;
        }
        if slot == COLUMN_NODE_SLOT {
            return Some((column, None));
        }
        let item = usize::try_from(slot).ok()?;
        (item < self.columns[column].items.len()).then_some((column, Some(item)))
    }

    fn encode(column: usize, item: Option<usize>) -> NodeId {
        let slot = item.map_or(COLUMN_NODE_SLOT, |index| index as u64);
        NodeId(((column as u64) << 32) | slot)
    }

    fn apply_offset(&mut self, container: &ContainerKey, axis: Axis, offset: f64) -> ViewportResult<()> {
        if !self.mounted {
            return Err(ViewportError::ContainerNotFound(container.to_string()));
        }
        match axis {
            Axis::Horizontal if *container == self.horizontal_key => {
                self.offset_x = offset.clamp(0.0, self.max_offset_x());
                Ok(())
            }
            Axis::Vertical => {
                let viewport = self.list_viewport_height();
                let index = self
                    .column_index(container)
                    .ok_or_else(|| ViewportError::ContainerNotFound(container.to_string()))?;
                let column = &mut self.columns[index];
                let max = (column.content_height() - viewport).max(0.0);
                column.offset_y = offset.clamp(0.0, max);
                Ok(())
            }
            Axis::Horizontal => Err(ViewportError::ContainerNotFound(container.to_string())),
        }
    }
}

impl LayoutTree for MemoryLayoutTree {
    fn find_node(&self, query: &NodeQuery) -> Option<NodeId> {
        if !self.mounted {
            return None;
        }
        match query {
            NodeQuery::Document(id) => self.columns.iter().enumerate().find_map(|(ci, column)| {
                column
                    .items
                    .iter()
                    .position(|item| &item.id == id)
                    .map(|ii| Self::encode(ci, Some(ii)))
            }),
            NodeQuery::Column(key) => self
                .columns
                .iter()
                .position(|column| column.key == *key)
                .map(|ci| Self::encode(ci, None)),
            NodeQuery::FirstItemOn { column, date } => {
                let ci = self.columns.iter().position(|entry| entry.key == *column)?;
                self.columns[ci]
                    .items
                    .iter()
                    .position(|item| item.date == *date)
                    .map(|ii| Self::encode(ci, Some(ii)))
            }
        }
    }

    fn node_bounds(&self, node: NodeId) -> Option<Rect> {
        let (ci, item) = self.decode(node)?;
        let column = &self.columns[ci];
        match item {
            None => Some(Rect::new(
                self.column_client_x(column),
                self.bounds.y,
                column.width,
                self.bounds.height,
            )),
            Some(ii) => {
                let entry = &column.items[ii];
                let list = self.list_bounds(column);
                let (width, height) = if entry.laid_out {
                    (column.width, entry.height)
                } else {
                    (0.0, 0.0)
                };
                Some(Rect::new(list.x, list.y + entry.y - column.offset_y, width, height))
            }
        }
    }

    fn scroll_ancestor(&self, node: NodeId, axis: Axis) -> Option<ContainerKey> {
        let (ci, item) = self.decode(node)?;
        match (axis, item) {
            (Axis::Horizontal, _) => Some(self.horizontal_key.clone()),
            (Axis::Vertical, Some(_)) => Some(self.columns[ci].container.clone()),
            (Axis::Vertical, None) => None,
        }
    }

    fn horizontal_container(&self) -> Option<ContainerKey> {
        self.mounted.then(|| self.horizontal_key.clone())
    }

    fn container_metrics(&self, container: &ContainerKey, axis: Axis) -> Option<ContainerMetrics> {
        if !self.mounted {
            return None;
        }
        match axis {
            Axis::Horizontal if *container == self.horizontal_key => Some(ContainerMetrics {
                bounds: self.bounds,
                scroll: ScrollContainer::new(self.offset_x, self.bounds.width, self.content_width()),
            }),
            Axis::Horizontal => None,
            Axis::Vertical => {
                let column = &self.columns[self.column_index(container)?];
                Some(ContainerMetrics {
                    bounds: self.list_bounds(column),
                    scroll: ScrollContainer::new(
                        column.offset_y,
                        self.list_viewport_height(),
                        column.content_height(),
                    ),
                })
            }
        }
    }

    fn set_scroll_offset(
        &mut self,
        container: &ContainerKey,
        axis: Axis,
        offset: f64,
    ) -> ViewportResult<()> {
        self.apply_offset(container, axis, offset)?;
        self.writes.push(ScrollWrite {
            frame: self.frame,
            container: container.clone(),
            axis,
            offset,
        });
        Ok(())
    }

    fn overlay_panels(&self) -> Vec<OverlayPanel> {
        self.panels.clone()
    }

    fn begin_frame(&mut self, frame: FrameId) {
        self.frame = frame;
    }
}
