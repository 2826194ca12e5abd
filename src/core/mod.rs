pub mod geometry;
pub mod period;
pub mod types;

pub use geometry::{
    UsableWindow, compute_delta, ease_out_cubic, leading_alignment_delta, right_edge_overlap,
};
pub use period::{Granularity, PeriodKey, TargetDescriptor};
pub use types::{
    Axis, AxisId, ContainerKey, ContainerMetrics, FrameId, Millis, Rect, ScrollContainer, Span,
};
