//! Observer hooks for hosts that want to watch the engine without touching
//! its internals (diagnostics overlays, analytics, test recorders).

mod plugins;

pub use plugins::{ViewportContext, ViewportEvent, ViewportPlugin};
