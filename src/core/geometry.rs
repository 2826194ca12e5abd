//! Pure scroll geometry: usable windows, minimal deltas, occlusion overlap and easing.
//!
//! Every function here is side-effect free so the axis controller, the
//! coordinator and property tests share one implementation of the math.

use serde::{Deserialize, Serialize};

use super::types::{Rect, Span};

/// Span of an axis viewport left after margins and occlusion are removed.
///
/// `trailing_edge >= leading_edge` always holds; an occlusion wide enough to
/// invert the window collapses it to zero width at the leading edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsableWindow {
    pub leading_edge: f64,
    pub trailing_edge: f64,
}

impl UsableWindow {
    #[must_use]
    pub fn new(container: Span, margin: f64, occlusion: f64) -> Self {
        let margin = sanitize_non_negative(margin);
        let occlusion = sanitize_non_negative(occlusion).min(container.extent());
        let leading_edge = container.leading + margin;
        let trailing_edge = (container.trailing - occlusion - margin).max(leading_edge);
        Self {
            leading_edge,
            trailing_edge,
        }
    }

    #[must_use]
    pub fn extent(self) -> f64 {
        self.trailing_edge - self.leading_edge
    }

    #[must_use]
    pub fn contains(self, target: Span) -> bool {
        target.leading >= self.leading_edge && target.trailing <= self.trailing_edge
    }
}

/// Minimal offset change that brings `target` inside `window`.
///
/// Positive values scroll toward the trailing side. Targets larger than the
/// window are aligned on their leading edge instead of being centered.
#[must_use]
pub fn compute_delta(target: Span, window: UsableWindow) -> f64 {
    if target.extent() > window.extent() {
        return target.leading - window.leading_edge;
    }
    if target.trailing > window.trailing_edge {
        return target.trailing - window.trailing_edge;
    }
    if target.leading < window.leading_edge {
        return target.leading - window.leading_edge;
    }
    0.0
}

/// Offset change that places `target`'s leading edge `lead_in` px after the
/// window's leading edge.
#[must_use]
pub fn leading_alignment_delta(target: Span, window: UsableWindow, lead_in: f64) -> f64 {
    let lead_in = sanitize_non_negative(lead_in).min(window.extent());
    target.leading - (window.leading_edge + lead_in)
}

/// Width an overlay `panel` removes from the right edge of `container`.
///
/// Panels that do not intersect the container contribute nothing; the result
/// never exceeds the container width.
#[must_use]
pub fn right_edge_overlap(container: Rect, panel: Rect) -> f64 {
    if !container.is_finite() || !panel.is_finite() || !panel.has_area() {
        return 0.0;
    }
    let vertical_overlap = panel.top() < container.bottom() && panel.bottom() > container.top();
    let horizontal_overlap = panel.left() < container.right() && panel.right() > container.left();
    if !vertical_overlap || !horizontal_overlap {
        return 0.0;
    }
    let covered_from = panel.left().max(container.left());
    (container.right() - covered_from).clamp(0.0, container.width.max(0.0))
}

/// Ease-out cubic curve `1 - (1 - p)^3` over a clamped progress.
#[must_use]
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        1.0
    };
    let inverse = 1.0 - p;
    1.0 - inverse * inverse * inverse
}

fn sanitize_non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
