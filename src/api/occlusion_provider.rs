use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Axis, Rect, right_edge_overlap};
use crate::layout::{LayoutTree, OverlayPanel};

/// Width currently removed from the right edge of the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OcclusionState {
    pub width_px: f64,
}

/// Largest right-edge overlap of any visible panel, clamped to the container width.
#[must_use]
pub fn measure_occlusion(container: Rect, panels: &[OverlayPanel]) -> f64 {
    panels
        .iter()
        .filter(|panel| panel.visible)
        .map(|panel| right_edge_overlap(container, panel.bounds))
        .fold(0.0, f64::max)
}

/// Caches the occlusion width between layout changes.
///
/// Reads are free; only `recompute` touches the layout, and the host calls it
/// when panel visibility or viewport size changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OcclusionProvider {
    state: OcclusionState,
}

impl OcclusionProvider {
    #[must_use]
    pub fn current_occlusion(&self) -> f64 {
        self.state.width_px
    }

    #[must_use]
    pub fn state(&self) -> OcclusionState {
        self.state
    }

    /// Re-measures against the mounted view. Returns the previous width when it changed.
    pub fn recompute<T: LayoutTree>(&mut self, tree: &T) -> Option<f64> {
        let width_px = tree
            .horizontal_container()
            .and_then(|key| tree.container_metrics(&key, Axis::Horizontal))
            .map_or(0.0, |metrics| {
                measure_occlusion(metrics.bounds, &tree.overlay_panels())
            });
        let previous = self.state.width_px;
        if (width_px - previous).abs() <= f64::EPSILON {
            return None;
        }
        trace!(previous, width_px, "occlusion recomputed");
        self.state.width_px = width_px;
        Some(previous)
    }
}
