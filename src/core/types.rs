use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic milliseconds as reported by the engine clock.
pub type Millis = u64;

/// Sequence number of a display-refresh tick.
pub type FrameId = u64;

/// Scroll direction owned by one axis controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Across time-period columns.
    Horizontal,
    /// Within one column's document list.
    Vertical,
}

/// Client-space rectangle as reported by the host layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn left(self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn top(self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    /// Projects the rectangle onto one axis.
    #[must_use]
    pub fn span(self, axis: Axis) -> Span {
        match axis {
            Axis::Horizontal => Span::new(self.left(), self.right()),
            Axis::Vertical => Span::new(self.top(), self.bottom()),
        }
    }

    /// `true` once the node received real geometry (not merely mounted).
    #[must_use]
    pub fn has_area(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// One-dimensional interval `[leading, trailing]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Span {
    pub leading: f64,
    pub trailing: f64,
}

impl Span {
    #[must_use]
    pub const fn new(leading: f64, trailing: f64) -> Self {
        Self { leading, trailing }
    }

    #[must_use]
    pub fn extent(self) -> f64 {
        (self.trailing - self.leading).max(0.0)
    }
}

/// Stable host identifier of a scroll container.
///
/// Keys must survive re-renders of the same view (e.g. the period key of a
/// column) so sessions keyed by them are never tied to a recreated widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerKey(String);

impl ContainerKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContainerKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Arena key for per-axis state (animation sessions, debounce slots).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisId {
    pub axis: Axis,
    pub container: ContainerKey,
}

impl AxisId {
    #[must_use]
    pub fn new(axis: Axis, container: impl Into<ContainerKey>) -> Self {
        Self {
            axis,
            container: container.into(),
        }
    }

    #[must_use]
    pub fn horizontal(container: impl Into<ContainerKey>) -> Self {
        Self::new(Axis::Horizontal, container)
    }

    #[must_use]
    pub fn vertical(container: impl Into<ContainerKey>) -> Self {
        Self::new(Axis::Vertical, container)
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = match self.axis {
            Axis::Horizontal => "h",
            Axis::Vertical => "v",
        };
        write!(f, "{axis}:{}", self.container)
    }
}

/// Scroll state of one container along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollContainer {
    pub offset: f64,
    pub viewport_extent: f64,
    pub content_extent: f64,
}

impl ScrollContainer {
    #[must_use]
    pub fn new(offset: f64, viewport_extent: f64, content_extent: f64) -> Self {
        Self {
            offset,
            viewport_extent,
            content_extent,
        }
    }

    #[must_use]
    pub fn max_offset(self) -> f64 {
        (self.content_extent - self.viewport_extent).max(0.0)
    }

    /// Clamps `offset` into `[0, content_extent - viewport_extent]`.
    ///
    /// Non-finite input collapses to the current offset.
    #[must_use]
    pub fn clamp_offset(self, offset: f64) -> f64 {
        if !offset.is_finite() {
            return self.offset.clamp(0.0, self.max_offset());
        }
        offset.clamp(0.0, self.max_offset())
    }
}

/// Host-reported metrics of a scroll container along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetrics {
    /// Client bounds of the container's visible box.
    pub bounds: Rect,
    pub scroll: ScrollContainer,
}
