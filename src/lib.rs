//! timeline-viewport: headless viewport synchronization for timeline dashboards.
//!
//! Keeps a selected or targeted document visible across a horizontal axis of
//! period columns and per-column vertical lists, while overlay panels take
//! width away from the right edge. The host implements
//! [`layout::LayoutTree`] and drives [`ViewportEngine::tick`] from its
//! display-refresh callback.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod layout;
pub mod telemetry;

pub use api::{ViewportEngine, ViewportEngineConfig};
pub use error::{ViewportError, ViewportResult};
